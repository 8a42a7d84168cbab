#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Structured incident report assembly.
//!
//! Combines the merged area analysis, the severity classification, and the
//! request's place metadata into the final [`Report`] consumed by the
//! presentation layer and the narrative-generation step. Assembly is a pure
//! data merge: no I/O, and in particular no text-generation calls. The
//! narrative collaborator is invoked *with* this report, never from it.

use chrono::{DateTime, Utc};
use hazard_map_analysis_models::AreaAnalysis;
use hazard_map_geometry::BoundingBox;
use hazard_map_hazard_models::SeverityTier;
use serde::{Deserialize, Serialize};

/// Report metadata block for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// The magnitude the report was generated for.
    pub magnitude: f64,
    /// Classified severity tier.
    pub severity: SeverityTier,
    /// One-line tier description.
    pub severity_description: String,
    /// Display color tag for the tier.
    pub severity_color: String,
    /// Analyzed bounding-box surface in km².
    pub area_size_km2: f64,
    /// The box the analysis covers.
    pub bounding_box: BoundingBox,
    /// When the data sources were queried.
    pub data_fetch_timestamp: DateTime<Utc>,
}

/// The final structured report for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Human-readable place name from the request.
    pub place_name: String,
    /// The reported disaster magnitude.
    pub magnitude: f64,
    /// Classified severity tier.
    pub severity: SeverityTier,
    /// The merged area analysis, verbatim.
    pub analysis: AreaAnalysis,
    /// Presentation metadata.
    pub metadata: ReportMetadata,
}

/// Assembles the final report from its parts.
///
/// `None` for `place_name` renders as "Unspecified location", matching how
/// the narrative layer labels unnamed areas.
#[must_use]
pub fn assemble(
    analysis: AreaAnalysis,
    severity: SeverityTier,
    place_name: Option<&str>,
    magnitude: f64,
) -> Report {
    let metadata = ReportMetadata {
        magnitude,
        severity,
        severity_description: severity.description().to_string(),
        severity_color: severity.color().to_string(),
        area_size_km2: analysis.summary.area_km2,
        bounding_box: analysis.bbox,
        data_fetch_timestamp: Utc::now(),
    };

    Report {
        place_name: place_name.unwrap_or("Unspecified location").to_string(),
        magnitude,
        severity,
        analysis,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hazard_map_analysis_models::{
        AnalysisSummary, BuildingDataCoverage, CriticalFacilities, DataQuality,
    };
    use hazard_map_source_models::{
        BuildingResult, BuildingSummary, EstimationMethod, PopulationResult,
    };

    use super::*;

    fn sample_analysis() -> AreaAnalysis {
        let bbox = BoundingBox::new(-4.33, 15.29, -4.31, 15.31);
        AreaAnalysis {
            bbox,
            population: PopulationResult {
                total_population: 1200,
                places: Vec::new(),
                area_km2: 4.9,
                density_per_km2: 244.9,
                estimation_method: EstimationMethod::LivePlaces,
                success: true,
                error_detail: None,
            },
            buildings: BuildingResult {
                total_buildings: 300,
                building_type_counts: BTreeMap::new(),
                service_type_counts: BTreeMap::new(),
                summary: BuildingSummary::default(),
                area_km2: 4.9,
                success: true,
                error_detail: None,
            },
            summary: AnalysisSummary {
                area_km2: 4.9,
                total_population: 1200,
                population_density: 244.9,
                total_buildings: 300,
                building_density: 61.2,
                critical_facilities: CriticalFacilities::default(),
                residential_buildings: 80,
                estimated_affected_people: 1200.0,
                data_quality: DataQuality {
                    population_data_points: 0,
                    building_data_coverage: BuildingDataCoverage::Limited,
                },
                success: true,
            },
        }
    }

    #[test]
    fn assembles_metadata_from_the_analysis() {
        let analysis = sample_analysis();
        let report = assemble(analysis.clone(), SeverityTier::Severe, Some("Kinshasa"), 7.4);

        assert_eq!(report.place_name, "Kinshasa");
        assert_eq!(report.severity, SeverityTier::Severe);
        assert_eq!(report.metadata.severity_description, "Major catastrophe");
        assert_eq!(report.metadata.severity_color, "red");
        assert!((report.metadata.area_size_km2 - 4.9).abs() < f64::EPSILON);
        assert_eq!(report.metadata.bounding_box, analysis.bbox);
        assert_eq!(report.analysis, analysis);
    }

    #[test]
    fn missing_place_name_gets_a_label() {
        let report = assemble(sample_analysis(), SeverityTier::Low, None, 1.0);
        assert_eq!(report.place_name, "Unspecified location");
    }
}
