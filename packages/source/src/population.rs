//! Primary population source: Overpass place/population point records.
//!
//! Queries every `place`-tagged node carrying a `population` tag inside the
//! bounding box and sums the tagged counts. This is the live-data strategy;
//! [`crate::census`] provides the tract-weighted alternate.

use async_trait::async_trait;
use hazard_map_geometry::BoundingBox;
use hazard_map_source_models::{EstimationMethod, PlaceRecord, PopulationResult};

use crate::{PopulationSource, SourceError, overpass, overpass::OverpassClient};

/// Population source backed by Overpass place tags.
#[derive(Debug, Clone, Default)]
pub struct OverpassPopulation {
    client: OverpassClient,
}

impl OverpassPopulation {
    /// Creates the source over an existing interpreter client.
    #[must_use]
    pub const fn new(client: OverpassClient) -> Self {
        Self { client }
    }

    async fn fetch_inner(&self, bbox: &BoundingBox) -> Result<Vec<PlaceRecord>, SourceError> {
        let body = self.client.query(&place_query(bbox)).await?;
        parse_places(&body)
    }
}

#[async_trait]
impl PopulationSource for OverpassPopulation {
    async fn fetch_population(&self, bbox: &BoundingBox) -> PopulationResult {
        match self.fetch_inner(bbox).await {
            Ok(places) => {
                let total_population: u64 = places.iter().map(|p| p.population).sum();
                let area_km2 = bbox.haversine_area_km2();
                let density_per_km2 = if area_km2 > 0.0 {
                    #[allow(clippy::cast_precision_loss)]
                    let total = total_population as f64;
                    total / area_km2
                } else {
                    0.0
                };

                PopulationResult {
                    total_population,
                    places,
                    area_km2,
                    density_per_km2,
                    estimation_method: EstimationMethod::LivePlaces,
                    success: true,
                    error_detail: None,
                }
            }
            Err(e) => {
                log::warn!("Population source failed for {bbox:?}: {e}");
                PopulationResult::failure(e.to_string())
            }
        }
    }
}

/// Builds the interpreter query for place/population nodes in the box.
fn place_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:25];\
         (node[\"place\"][\"population\"]({},{},{},{}););\
         out;",
        bbox.south, bbox.west, bbox.north, bbox.east
    )
}

/// Normalizes the interpreter response into place records.
///
/// Nodes with an unparseable `population` tag contribute zero rather than
/// poisoning the sum.
fn parse_places(body: &serde_json::Value) -> Result<Vec<PlaceRecord>, SourceError> {
    let elements = overpass::elements(body)?;

    let mut places = Vec::with_capacity(elements.len());
    for el in elements {
        let (Some(lat), Some(lon)) = (el["lat"].as_f64(), el["lon"].as_f64()) else {
            continue;
        };

        let tags = &el["tags"];
        let population = tags["population"]
            .as_str()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        places.push(PlaceRecord {
            name: tags["name"].as_str().map(String::from),
            population,
            lat,
            lon,
        });
    }

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_embeds_the_box_in_overpass_order() {
        let bbox = BoundingBox::new(-4.33, 15.29, -4.31, 15.31);
        let query = place_query(&bbox);
        assert!(query.contains("(-4.33,15.29,-4.31,15.31)"));
        assert!(query.contains("[\"place\"][\"population\"]"));
    }

    #[test]
    fn parses_place_nodes() {
        let body = serde_json::json!({
            "elements": [
                {
                    "type": "node",
                    "lat": -4.32,
                    "lon": 15.30,
                    "tags": { "name": "Kinshasa", "place": "city", "population": "16316000" }
                },
                {
                    "type": "node",
                    "lat": -4.31,
                    "lon": 15.29,
                    "tags": { "place": "suburb", "population": "not-a-number" }
                }
            ]
        });

        let places = parse_places(&body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_deref(), Some("Kinshasa"));
        assert_eq!(places[0].population, 16_316_000);
        // Unparseable tag degrades to zero instead of failing the record.
        assert_eq!(places[1].population, 0);
        assert_eq!(places[1].name, None);
    }

    #[test]
    fn skips_elements_without_coordinates() {
        let body = serde_json::json!({
            "elements": [
                { "type": "way", "tags": { "population": "100" } }
            ]
        });
        assert!(parse_places(&body).unwrap().is_empty());
    }

    #[test]
    fn malformed_response_is_a_parse_error() {
        let body = serde_json::json!({ "remark": "timed out" });
        assert!(parse_places(&body).is_err());
    }
}
