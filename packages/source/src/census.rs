//! Alternate population source: Census tract area-weighting.
//!
//! Resolves the bounding box centroid to its census tract via the TIGERweb
//! ArcGIS REST endpoint (`GEOID` + `AREALAND`), looks the tract's
//! population up in the Census ACS 5-year API, then weights the tract
//! population by `min(bbox_area / tract_area, 1.0)` so a box smaller than
//! its tract never claims the whole tract's residents.
//!
//! When tract resolution or the population lookup fails the source falls
//! back to a flat people-per-km² assumption. The fallback is flagged via
//! [`EstimationMethod::FlatDensity`] and an explanatory `error_detail` so
//! downstream consumers know confidence is low.
//!
//! See <https://tigerweb.geo.census.gov/tigerwebmain/TIGERweb_restmapservice.html>
//! and <https://www.census.gov/data/developers/data-sets/acs-5year.html>

use std::time::Duration;

use async_trait::async_trait;
use hazard_map_geometry::BoundingBox;
use hazard_map_source_models::{EstimationMethod, PopulationResult};

use crate::{PopulationSource, SourceError};

/// TIGERweb census tract query endpoint (ArcGIS REST, `f=json`).
pub const DEFAULT_TIGERWEB_URL: &str =
    "https://tigerweb.geo.census.gov/arcgis/rest/services/TIGERweb/Tracts_Blocks/MapServer/0/query";

/// Census ACS 5-year estimates endpoint.
pub const DEFAULT_ACS_URL: &str = "https://api.census.gov/data/2021/acs/acs5";

/// ACS variable for total population.
const ACS_TOTAL_POPULATION: &str = "B01003_001E";

/// Flat-density fallback when tract resolution fails (people per km²).
pub const FALLBACK_DENSITY_PER_KM2: f64 = 300.0;

/// Client-side ceiling on any single census request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Population source backed by census tract statistics.
#[derive(Debug, Clone)]
pub struct CensusTractPopulation {
    client: reqwest::Client,
    tigerweb_url: String,
    acs_url: String,
}

/// A resolved census tract: identifier plus land area.
#[derive(Debug, Clone, PartialEq)]
struct TractInfo {
    geoid: String,
    land_area_km2: f64,
}

impl TractInfo {
    /// State FIPS: first 2 characters of the tract GEOID.
    fn state_fips(&self) -> Option<&str> {
        self.geoid.get(..2)
    }

    /// County FIPS: characters 2-5 of the tract GEOID.
    fn county_fips(&self) -> Option<&str> {
        self.geoid.get(2..5)
    }

    /// Tract code: the remaining 6 characters.
    fn tract_code(&self) -> Option<&str> {
        self.geoid.get(5..11)
    }
}

impl CensusTractPopulation {
    /// Creates the source against the public TIGERweb and ACS endpoints.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed (TLS
    /// backend initialization failure).
    #[must_use]
    pub fn new() -> Self {
        Self::with_urls(DEFAULT_TIGERWEB_URL, DEFAULT_ACS_URL)
    }

    /// Creates the source against specific endpoints.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn with_urls(tigerweb_url: impl Into<String>, acs_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build census HTTP client");
        Self {
            client,
            tigerweb_url: tigerweb_url.into(),
            acs_url: acs_url.into(),
        }
    }

    /// Resolves the tract containing the given point.
    async fn resolve_tract(&self, lon: f64, lat: f64) -> Result<Option<TractInfo>, SourceError> {
        let body = self
            .client
            .get(&self.tigerweb_url)
            .query(&[
                ("geometry", format!("{lon},{lat}")),
                ("geometryType", "esriGeometryPoint".to_string()),
                ("inSR", "4326".to_string()),
                ("spatialRel", "esriSpatialRelIntersects".to_string()),
                ("outFields", "GEOID,AREALAND".to_string()),
                ("returnGeometry", "false".to_string()),
                ("f", "json".to_string()),
            ])
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        parse_tract_response(&body)
    }

    /// Looks up the tract's total population in the ACS.
    async fn tract_population(&self, tract: &TractInfo) -> Result<u64, SourceError> {
        let (Some(state), Some(county), Some(code)) = (
            tract.state_fips(),
            tract.county_fips(),
            tract.tract_code(),
        ) else {
            return Err(SourceError::parse(format!(
                "malformed tract GEOID: {}",
                tract.geoid
            )));
        };

        let body = self
            .client
            .get(&self.acs_url)
            .query(&[
                ("get", ACS_TOTAL_POPULATION.to_string()),
                ("for", format!("tract:{code}")),
                ("in", format!("state:{state} county:{county}")),
            ])
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        parse_acs_population(&body)
    }

    async fn fetch_inner(&self, bbox: &BoundingBox) -> Result<(u64, String), SourceError> {
        let center = bbox.center();
        let tract = self
            .resolve_tract(center.lon, center.lat)
            .await?
            .ok_or_else(|| SourceError::parse("no census tract at bbox centroid"))?;

        let tract_population = self.tract_population(&tract).await?;
        let weight = area_weight(bbox.haversine_area_km2(), tract.land_area_km2);

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let weighted = (tract_population as f64 * weight).round() as u64;

        Ok((weighted, tract.geoid))
    }
}

impl Default for CensusTractPopulation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PopulationSource for CensusTractPopulation {
    async fn fetch_population(&self, bbox: &BoundingBox) -> PopulationResult {
        let area_km2 = bbox.haversine_area_km2();

        match self.fetch_inner(bbox).await {
            Ok((total_population, geoid)) => {
                log::debug!("Tract {geoid} weighted population: {total_population}");
                let density_per_km2 = if area_km2 > 0.0 {
                    #[allow(clippy::cast_precision_loss)]
                    let total = total_population as f64;
                    total / area_km2
                } else {
                    0.0
                };

                PopulationResult {
                    total_population,
                    places: Vec::new(),
                    area_km2,
                    density_per_km2,
                    estimation_method: EstimationMethod::TractWeighted,
                    success: true,
                    error_detail: None,
                }
            }
            Err(e) => {
                // Degrade to the flat-density assumption rather than
                // reporting nothing; the method flag marks it low-confidence.
                log::warn!("Tract resolution failed for {bbox:?}, using flat density: {e}");

                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss
                )]
                let total_population = (FALLBACK_DENSITY_PER_KM2 * area_km2).round() as u64;

                PopulationResult {
                    total_population,
                    places: Vec::new(),
                    area_km2,
                    density_per_km2: FALLBACK_DENSITY_PER_KM2,
                    estimation_method: EstimationMethod::FlatDensity,
                    success: true,
                    error_detail: Some(format!(
                        "tract resolution failed ({e}); assuming {FALLBACK_DENSITY_PER_KM2} people/km²"
                    )),
                }
            }
        }
    }
}

/// Parses the TIGERweb feature response into a tract, if any.
fn parse_tract_response(body: &serde_json::Value) -> Result<Option<TractInfo>, SourceError> {
    let features = body["features"]
        .as_array()
        .ok_or_else(|| SourceError::parse("missing features array in TIGERweb response"))?;

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let attributes = &first["attributes"];
    let geoid = attributes["GEOID"]
        .as_str()
        .ok_or_else(|| SourceError::parse("missing GEOID attribute"))?
        .to_string();

    // AREALAND is square metres.
    let land_area_m2 = attributes["AREALAND"]
        .as_f64()
        .ok_or_else(|| SourceError::parse("missing AREALAND attribute"))?;

    Ok(Some(TractInfo {
        geoid,
        land_area_km2: land_area_m2 / 1_000_000.0,
    }))
}

/// Parses the ACS response: a header row followed by one data row whose
/// first column is the population estimate.
fn parse_acs_population(body: &serde_json::Value) -> Result<u64, SourceError> {
    let rows = body
        .as_array()
        .ok_or_else(|| SourceError::parse("ACS response is not an array"))?;

    let data_row = rows
        .get(1)
        .and_then(|row| row.as_array())
        .ok_or_else(|| SourceError::parse("ACS response has no data row"))?;

    data_row
        .first()
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| SourceError::parse("ACS population column is not a number"))
}

/// Fraction of the tract population attributable to the box.
///
/// Clamped at 1.0 so a box larger than its centroid tract never
/// over-counts; a non-positive tract area claims the whole tract.
fn area_weight(bbox_area_km2: f64, tract_area_km2: f64) -> f64 {
    if tract_area_km2 <= 0.0 {
        return 1.0;
    }
    (bbox_area_km2 / tract_area_km2).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tigerweb_feature() {
        let body = serde_json::json!({
            "features": [{
                "attributes": { "GEOID": "17031839100", "AREALAND": 2_500_000.0 }
            }]
        });

        let tract = parse_tract_response(&body).unwrap().unwrap();
        assert_eq!(tract.geoid, "17031839100");
        assert!((tract.land_area_km2 - 2.5).abs() < 1e-9);
        assert_eq!(tract.state_fips(), Some("17"));
        assert_eq!(tract.county_fips(), Some("031"));
        assert_eq!(tract.tract_code(), Some("839100"));
    }

    #[test]
    fn empty_feature_list_resolves_to_none() {
        let body = serde_json::json!({ "features": [] });
        assert_eq!(parse_tract_response(&body).unwrap(), None);
    }

    #[test]
    fn missing_features_is_a_parse_error() {
        let body = serde_json::json!({ "error": { "code": 400 } });
        assert!(parse_tract_response(&body).is_err());
    }

    #[test]
    fn parses_acs_rows() {
        let body = serde_json::json!([
            ["B01003_001E", "state", "county", "tract"],
            ["4321", "17", "031", "839100"]
        ]);
        assert_eq!(parse_acs_population(&body).unwrap(), 4321);
    }

    #[test]
    fn acs_without_data_row_is_a_parse_error() {
        let body = serde_json::json!([["B01003_001E", "state", "county", "tract"]]);
        assert!(parse_acs_population(&body).is_err());
    }

    #[test]
    fn weight_clamps_at_one() {
        assert!((area_weight(1.0, 4.0) - 0.25).abs() < 1e-9);
        assert!((area_weight(8.0, 4.0) - 1.0).abs() < 1e-9);
        assert!((area_weight(1.0, 0.0) - 1.0).abs() < 1e-9);
    }
}
