//! Building and amenity source: Overpass tagged footprints and points.
//!
//! Issues two independent interpreter queries concurrently (one for every
//! `building`-tagged element, one for amenities on the allow-list), then
//! aggregates counts per tag value and rolls specific types into the
//! shared summary buckets. Generic `building=yes` footprints count toward
//! the total but never toward a specific category.

use std::collections::BTreeMap;

use async_trait::async_trait;
use hazard_map_geometry::BoundingBox;
use hazard_map_source_models::{BuildingResult, BuildingSummary};

use crate::{
    BuildingSource, SourceError, overpass,
    overpass::OverpassClient,
    type_mapping::{self, BuildingBucket},
};

/// Building/amenity source backed by the Overpass interpreter.
#[derive(Debug, Clone, Default)]
pub struct OverpassBuildings {
    client: OverpassClient,
}

impl OverpassBuildings {
    /// Creates the source over an existing interpreter client.
    #[must_use]
    pub const fn new(client: OverpassClient) -> Self {
        Self { client }
    }

    async fn fetch_inner(
        &self,
        bbox: &BoundingBox,
    ) -> Result<(BTreeMap<String, u64>, u64, BTreeMap<String, u64>), SourceError> {
        // Both sub-queries are independent; dispatch them together and join.
        let buildings_q = buildings_query(bbox);
        let services_q = services_query(bbox);
        let (buildings_body, services_body) = futures::join!(
            self.client.query(&buildings_q),
            self.client.query(&services_q),
        );

        let (building_type_counts, total_buildings) = count_building_types(&buildings_body?)?;
        let service_type_counts = count_service_types(&services_body?)?;

        Ok((building_type_counts, total_buildings, service_type_counts))
    }
}

#[async_trait]
impl BuildingSource for OverpassBuildings {
    async fn fetch_buildings(&self, bbox: &BoundingBox) -> BuildingResult {
        match self.fetch_inner(bbox).await {
            Ok((building_type_counts, total_buildings, service_type_counts)) => {
                let area_km2 = bbox.haversine_area_km2();
                let summary = summarize(
                    &building_type_counts,
                    &service_type_counts,
                    total_buildings,
                    area_km2,
                );

                BuildingResult {
                    total_buildings,
                    building_type_counts,
                    service_type_counts,
                    summary,
                    area_km2,
                    success: true,
                    error_detail: None,
                }
            }
            Err(e) => {
                log::warn!("Building source failed for {bbox:?}: {e}");
                BuildingResult::failure(e.to_string())
            }
        }
    }
}

/// Query for every building-tagged node, way, and relation in the box.
fn buildings_query(bbox: &BoundingBox) -> String {
    let bounds = bounds(bbox);
    format!(
        "[out:json][timeout:30];\
         (way[\"building\"]({bounds});\
          node[\"building\"]({bounds});\
          relation[\"building\"]({bounds}););\
         out tags;"
    )
}

/// Query for allow-listed amenity nodes and ways in the box.
fn services_query(bbox: &BoundingBox) -> String {
    let bounds = bounds(bbox);
    let pattern = type_mapping::amenity_filter_pattern();
    format!(
        "[out:json][timeout:30];\
         (node[\"amenity\"~\"{pattern}\"]({bounds});\
          way[\"amenity\"~\"{pattern}\"]({bounds}););\
         out tags;"
    )
}

fn bounds(bbox: &BoundingBox) -> String {
    format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east)
}

/// Counts elements per `building` tag value, returning the counts and the
/// overall element total. Untagged elements count as `unknown`.
fn count_building_types(
    body: &serde_json::Value,
) -> Result<(BTreeMap<String, u64>, u64), SourceError> {
    let elements = overpass::elements(body)?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for el in elements {
        let building_type = el["tags"]["building"].as_str().unwrap_or("unknown");
        *counts.entry(building_type.to_string()).or_insert(0) += 1;
    }

    let total = u64::try_from(elements.len()).unwrap_or(u64::MAX);
    Ok((counts, total))
}

/// Counts elements per `amenity` tag value.
fn count_service_types(body: &serde_json::Value) -> Result<BTreeMap<String, u64>, SourceError> {
    let elements = overpass::elements(body)?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for el in elements {
        if let Some(amenity) = el["tags"]["amenity"].as_str() {
            *counts.entry(amenity.to_string()).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

/// Rolls specific building types and amenities into the summary buckets
/// via the shared type-mapping table.
fn summarize(
    building_type_counts: &BTreeMap<String, u64>,
    service_type_counts: &BTreeMap<String, u64>,
    total_buildings: u64,
    area_km2: f64,
) -> BuildingSummary {
    let mut summary = BuildingSummary::default();

    for (building_type, count) in building_type_counts {
        if let Some(bucket) = type_mapping::building_bucket(building_type) {
            add_to_bucket(&mut summary, bucket, *count);
        }
    }

    for (amenity, count) in service_type_counts {
        if let Some(bucket) = type_mapping::amenity_bucket(amenity) {
            add_to_bucket(&mut summary, bucket, *count);
        }
    }

    summary.density_per_km2 = if area_km2 > 0.0 {
        #[allow(clippy::cast_precision_loss)]
        let total = total_buildings as f64;
        total / area_km2
    } else {
        0.0
    };

    summary
}

const fn add_to_bucket(summary: &mut BuildingSummary, bucket: BuildingBucket, count: u64) {
    match bucket {
        BuildingBucket::Residential => summary.residential += count,
        BuildingBucket::Commercial => summary.commercial += count,
        BuildingBucket::Educational => summary.educational += count,
        BuildingBucket::Healthcare => summary.healthcare += count,
        BuildingBucket::EmergencyServices => summary.emergency_services += count,
        BuildingBucket::Infrastructure => summary.infrastructure += count,
    }
}
