#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed result records produced by the geographic data sources.
//!
//! Every external service response is normalized into these exhaustive
//! records before it reaches the aggregation layer, so a consumer can never
//! read an absent field as valid data. Failure is part of the record
//! (`success` / `error_detail`), not an exception: the aggregator must keep
//! working with whichever sources did answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a population figure was obtained.
///
/// Lets downstream consumers distinguish a confident answer from a best
/// guess without re-parsing `error_detail`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimationMethod {
    /// Summed from live place/population point records inside the box.
    LivePlaces,
    /// Census tract population, area-weighted by the bbox/tract overlap.
    TractWeighted,
    /// Fixed people-per-km² assumption used when tract resolution failed.
    /// Low confidence.
    FlatDensity,
}

/// A populated place returned by the population source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Place name, when the source tagged one.
    pub name: Option<String>,
    /// Tagged population count.
    pub population: u64,
    /// Latitude of the place point.
    pub lat: f64,
    /// Longitude of the place point.
    pub lon: f64,
}

/// Normalized population data for a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationResult {
    /// Total population inside the box.
    pub total_population: u64,
    /// Individual place records contributing to the total.
    pub places: Vec<PlaceRecord>,
    /// Bounding-box surface in km² (haversine approximation).
    pub area_km2: f64,
    /// People per km² over the box surface.
    pub density_per_km2: f64,
    /// How the population figure was obtained.
    pub estimation_method: EstimationMethod,
    /// Whether the source call produced usable data.
    pub success: bool,
    /// What went wrong, or why confidence is degraded.
    pub error_detail: Option<String>,
}

impl PopulationResult {
    /// A zeroed failure record carrying the error detail.
    #[must_use]
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            total_population: 0,
            places: Vec::new(),
            area_km2: 0.0,
            density_per_km2: 0.0,
            estimation_method: EstimationMethod::LivePlaces,
            success: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Roll-up of specific building/amenity types into impact categories.
///
/// Populated from the shared type-mapping table so every source variant
/// categorizes identically.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSummary {
    /// Apartments, houses, terraces and other dwellings.
    pub residential: u64,
    /// Commercial, retail, and office buildings.
    pub commercial: u64,
    /// Schools and universities (buildings and amenity points).
    pub educational: u64,
    /// Hospitals, clinics, and pharmacies.
    pub healthcare: u64,
    /// Fire and police stations.
    pub emergency_services: u64,
    /// Garages, sheds, warehouses.
    pub infrastructure: u64,
    /// Buildings per km² over the box surface.
    pub density_per_km2: f64,
}

/// Normalized building and amenity data for a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingResult {
    /// Every building element inside the box, generic tags included.
    pub total_buildings: u64,
    /// Count per building tag value (including generic `yes`).
    pub building_type_counts: BTreeMap<String, u64>,
    /// Count per amenity tag value from the allow-list.
    pub service_type_counts: BTreeMap<String, u64>,
    /// Category roll-up of the specific types.
    pub summary: BuildingSummary,
    /// Bounding-box surface in km² (haversine approximation).
    pub area_km2: f64,
    /// Whether both sub-queries produced usable data.
    pub success: bool,
    /// What went wrong, when `success` is false.
    pub error_detail: Option<String>,
}

impl BuildingResult {
    /// A zeroed failure record carrying the error detail.
    #[must_use]
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            total_buildings: 0,
            building_type_counts: BTreeMap::new(),
            service_type_counts: BTreeMap::new(),
            summary: BuildingSummary::default(),
            area_km2: 0.0,
            success: false,
            error_detail: Some(detail.into()),
        }
    }

    /// Sum of the specifically-typed buildings (generic `yes`/`unknown`
    /// excluded).
    #[must_use]
    pub fn specific_building_count(&self) -> u64 {
        self.building_type_counts
            .iter()
            .filter(|(tag, _)| tag.as_str() != "yes" && tag.as_str() != "unknown")
            .map(|(_, count)| count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_records_are_zeroed_and_flagged() {
        let population = PopulationResult::failure("connect timeout");
        assert!(!population.success);
        assert_eq!(population.total_population, 0);
        assert_eq!(population.error_detail.as_deref(), Some("connect timeout"));

        let buildings = BuildingResult::failure("HTTP 504");
        assert!(!buildings.success);
        assert_eq!(buildings.total_buildings, 0);
        assert!(buildings.building_type_counts.is_empty());
    }

    #[test]
    fn specific_count_excludes_generic_tags() {
        let mut counts = BTreeMap::new();
        counts.insert("yes".to_string(), 40);
        counts.insert("unknown".to_string(), 3);
        counts.insert("house".to_string(), 10);
        counts.insert("school".to_string(), 2);

        let result = BuildingResult {
            total_buildings: 55,
            building_type_counts: counts,
            service_type_counts: BTreeMap::new(),
            summary: BuildingSummary::default(),
            area_km2: 1.0,
            success: true,
            error_detail: None,
        };

        assert_eq!(result.specific_building_count(), 12);
    }

    #[test]
    fn estimation_method_serializes_screaming_snake() {
        let json = serde_json::to_string(&EstimationMethod::TractWeighted).unwrap();
        assert_eq!(json, "\"TRACT_WEIGHTED\"");
    }
}
