#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Merged area-analysis types produced by the aggregation layer.
//!
//! An [`AreaAnalysis`] carries both per-source results verbatim and the
//! cross-referenced summary derived from them, so consumers can inspect
//! either level. Everything here is a transient request-scoped value.

use hazard_map_geometry::BoundingBox;
use hazard_map_source_models::{BuildingResult, PopulationResult};
use serde::{Deserialize, Serialize};

/// Counts of the critical facilities inside the analyzed box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalFacilities {
    /// Hospitals.
    pub hospitals: u64,
    /// Schools.
    pub schools: u64,
    /// Fire stations.
    pub fire_stations: u64,
    /// Police stations.
    pub police_stations: u64,
}

/// Coarse indicator of how much the building data can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingDataCoverage {
    /// At least one specifically-typed building was observed.
    Good,
    /// Only generic footprints (or none); type breakdowns are weak.
    Limited,
}

/// How well-grounded the merged summary is, per data category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Number of individual place records behind the population figure.
    pub population_data_points: u64,
    /// Confidence indicator for the building type breakdown.
    pub building_data_coverage: BuildingDataCoverage,
}

/// Cross-referenced summary of both data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Bounding-box surface in km² (haversine approximation).
    pub area_km2: f64,
    /// Registry-reported population inside the box.
    pub total_population: u64,
    /// People per km².
    pub population_density: f64,
    /// Building elements inside the box.
    pub total_buildings: u64,
    /// Buildings per km².
    pub building_density: f64,
    /// Hospitals, schools, fire and police stations.
    pub critical_facilities: CriticalFacilities,
    /// Residential building count from the category roll-up.
    pub residential_buildings: u64,
    /// People exposed: the occupancy-based estimate floored by the
    /// registry population (see the aggregator's floor rule).
    pub estimated_affected_people: f64,
    /// Per-category confidence indicators.
    pub data_quality: DataQuality,
    /// Whether every contributing source succeeded.
    pub success: bool,
}

/// The merged analysis for one bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAnalysis {
    /// The box the sources were queried with.
    pub bbox: BoundingBox,
    /// Population source output, verbatim.
    pub population: PopulationResult,
    /// Building source output, verbatim.
    pub buildings: BuildingResult,
    /// Cross-referenced summary of both.
    pub summary: AnalysisSummary,
}
