//! HTTP handler functions for the hazard map API.

use actix_web::{HttpResponse, web};
use hazard_map_ai::prompt;
use hazard_map_geometry::{BoundingBox, GeometryError, Polygon};
use hazard_map_hazard_models::SeverityTier;
use hazard_map_server_models::{
    AnalyzeRequest, AnalyzeResponse, ApiHealth, RecommendationsRequest, RecommendationsResponse,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/analyze`
///
/// Validates the drawn polygon and magnitude, runs the concurrent area
/// aggregation, classifies severity, and assembles the structured report.
/// Validation failures are fatal to the request (400); data-source
/// failures degrade the report; a narrative failure degrades only the
/// `analysis` field.
pub async fn analyze(state: web::Data<AppState>, body: web::Json<AnalyzeRequest>) -> HttpResponse {
    let request = body.into_inner();

    let severity = match SeverityTier::classify(request.magnitude) {
        Ok(severity) => severity,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let bbox = match resolve_bbox(&request) {
        Ok(bbox) => bbox,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let polygon = Polygon::from_pairs(&request.polygon_coordinates);
    log::info!(
        "Analyzing {} ({:.2} km² drawn area, magnitude {:.1})",
        request.place_name.as_deref().unwrap_or("unnamed area"),
        polygon.shoelace_area_km2(),
        request.magnitude
    );

    let analysis = state.analyzer.analyze(bbox).await;
    let report = hazard_map_report::assemble(
        analysis,
        severity,
        request.place_name.as_deref(),
        request.magnitude,
    );

    let narrative = match &state.narrative {
        Some(provider) => match provider.generate(&prompt::assessment_prompt(&report)).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Narrative generation failed, returning report only: {e}");
                None
            }
        },
        None => None,
    };

    HttpResponse::Ok().json(AnalyzeResponse {
        success: true,
        analysis: narrative,
        report,
    })
}

/// `POST /api/recommendations`
pub async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<RecommendationsRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    if let Err(e) = SeverityTier::classify(request.magnitude) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    let Some(provider) = &state.narrative else {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "No text provider configured"
        }));
    };

    let prompt = prompt::recommendations_prompt(
        request.disaster_type.as_deref(),
        request.magnitude,
        request.location.as_deref(),
    );

    match provider.generate(&prompt).await {
        Ok(text) => HttpResponse::Ok().json(RecommendationsResponse {
            success: true,
            recommendations: text,
        }),
        Err(e) => {
            log::error!("Failed to generate recommendations: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to generate recommendations"
            }))
        }
    }
}

/// Resolves the request's bounding box: the explicit one when provided,
/// otherwise derived from the polygon. Either way the result must satisfy
/// the `south < north` / `west < east` invariant before any network call
/// is made.
fn resolve_bbox(request: &AnalyzeRequest) -> Result<BoundingBox, GeometryError> {
    let polygon = Polygon::from_pairs(&request.polygon_coordinates);

    if !polygon.has_min_vertices() {
        return Err(GeometryError::InvalidGeometry {
            message: format!(
                "polygon needs at least 3 distinct vertices, got {}",
                polygon.distinct_vertex_count()
            ),
        });
    }

    let bbox = match request.bounding_box {
        Some(bbox) => bbox,
        None => polygon
            .bounding_box()
            .ok_or_else(|| GeometryError::InvalidGeometry {
                message: "empty polygon".to_string(),
            })?,
    };

    bbox.validate()?;
    Ok(bbox)
}
