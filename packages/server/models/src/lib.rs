#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the hazard map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the internal analysis types to allow independent evolution of the
//! API contract.

use hazard_map_geometry::BoundingBox;
use hazard_map_report::Report;
use serde::{Deserialize, Serialize};

/// Request body for the analyze endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Drawn polygon as `[lon, lat]` pairs.
    pub polygon_coordinates: Vec<[f64; 2]>,
    /// Disaster magnitude on the 0-10 scale.
    pub magnitude: f64,
    /// Polygon center as `[lon, lat]`, when the client computed one.
    pub center: Option<[f64; 2]>,
    /// Human-readable place name for the drawn area.
    pub place_name: Option<String>,
    /// Explicit bounding box; derived from the polygon when omitted.
    pub bounding_box: Option<BoundingBox>,
}

/// Response body for the analyze endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Whether the request was processed.
    pub success: bool,
    /// Generated narrative assessment; `null` when the text provider is
    /// unconfigured or failed (the report is still returned).
    pub analysis: Option<String>,
    /// The structured report the narrative was generated from.
    pub report: Report,
}

/// Request body for the recommendations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    /// Kind of disaster (earthquake, flood, ...), when known.
    pub disaster_type: Option<String>,
    /// Disaster magnitude on the 0-10 scale.
    pub magnitude: f64,
    /// Affected location, when known.
    pub location: Option<String>,
}

/// Response body for the recommendations endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    /// Whether the request was processed.
    pub success: bool,
    /// Generated recommendations text.
    pub recommendations: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_request_deserializes_camel_case() {
        let json = serde_json::json!({
            "polygonCoordinates": [[15.29, -4.33], [15.31, -4.33], [15.30, -4.31]],
            "magnitude": 7.4,
            "center": [15.30, -4.32],
            "placeName": "Kinshasa",
            "boundingBox": { "south": -4.33, "west": 15.29, "north": -4.31, "east": 15.31 }
        });

        let request: AnalyzeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.polygon_coordinates.len(), 3);
        assert!((request.magnitude - 7.4).abs() < f64::EPSILON);
        assert_eq!(request.place_name.as_deref(), Some("Kinshasa"));
        let bbox = request.bounding_box.unwrap();
        assert!((bbox.south - -4.33).abs() < f64::EPSILON);
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let json = serde_json::json!({
            "polygonCoordinates": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            "magnitude": 2.0
        });

        let request: AnalyzeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.center, None);
        assert_eq!(request.place_name, None);
        assert!(request.bounding_box.is_none());
    }
}
