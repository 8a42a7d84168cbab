#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Concurrent scatter-gather aggregation of the geographic data sources.
//!
//! Dispatches the population and building sources against the same
//! bounding box in parallel, waits for both to settle, and merges their
//! outputs into one cross-referenced [`AreaAnalysis`]. A failing source
//! degrades the summary's `success` flag but never blocks or discards the
//! other source's data; the caller decides how to present degraded
//! confidence.

use std::sync::Arc;

use hazard_map_analysis_models::{
    AnalysisSummary, AreaAnalysis, BuildingDataCoverage, CriticalFacilities, DataQuality,
};
use hazard_map_geometry::BoundingBox;
use hazard_map_source::{
    BuildingSource, PopulationSource, buildings::OverpassBuildings, census::CensusTractPopulation,
    overpass::OverpassClient, population::OverpassPopulation,
};
use hazard_map_source_models::{BuildingResult, PopulationResult};

/// Average household occupancy applied per residential building.
pub const PEOPLE_PER_RESIDENTIAL_UNIT: f64 = 2.5;

/// Runs both data sources against a bounding box and merges the results.
pub struct Analyzer {
    population: Arc<dyn PopulationSource>,
    buildings: Arc<dyn BuildingSource>,
}

impl Analyzer {
    /// Creates an analyzer over explicit source implementations.
    #[must_use]
    pub fn new(population: Arc<dyn PopulationSource>, buildings: Arc<dyn BuildingSource>) -> Self {
        Self {
            population,
            buildings,
        }
    }

    /// Default wiring: both sources against the shared Overpass
    /// interpreter.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn overpass() -> Self {
        let client = OverpassClient::new();
        Self::new(
            Arc::new(OverpassPopulation::new(client.clone())),
            Arc::new(OverpassBuildings::new(client)),
        )
    }

    /// Alternate wiring: census-tract-weighted population alongside the
    /// Overpass building source.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP clients cannot be constructed.
    #[must_use]
    pub fn census_tract() -> Self {
        Self::new(
            Arc::new(CensusTractPopulation::new()),
            Arc::new(OverpassBuildings::new(OverpassClient::new())),
        )
    }

    /// Builds the analyzer selected by the `POPULATION_SOURCE` environment
    /// variable: `census` for the tract-weighted alternate, anything else
    /// (or unset) for the Overpass place-tag default.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP clients cannot be constructed.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("POPULATION_SOURCE").as_deref() {
            Ok("census") => {
                log::info!("Using census-tract population source");
                Self::census_tract()
            }
            _ => Self::overpass(),
        }
    }

    /// Queries both sources concurrently and merges their outputs.
    ///
    /// The sources are mutually independent, so both calls are dispatched
    /// before either is awaited; the join is a barrier, not a pipeline. A
    /// source that fails (or times out) settles into its failure record
    /// without aborting its sibling.
    pub async fn analyze(&self, bbox: BoundingBox) -> AreaAnalysis {
        log::info!(
            "Analyzing area {:.4},{:.4},{:.4},{:.4}",
            bbox.south,
            bbox.west,
            bbox.north,
            bbox.east
        );

        let (population, buildings) = futures::join!(
            self.population.fetch_population(&bbox),
            self.buildings.fetch_buildings(&bbox),
        );

        let summary = build_summary(&bbox, &population, &buildings);

        if !summary.success {
            log::warn!(
                "Partial analysis for {bbox:?}: population success={}, buildings success={}",
                population.success,
                buildings.success
            );
        }

        AreaAnalysis {
            bbox,
            population,
            buildings,
            summary,
        }
    }
}

/// Merges the two source results into the cross-referenced summary.
///
/// The merge is commutative: everything is keyed by logical category, so
/// source arrival order never matters.
fn build_summary(
    bbox: &BoundingBox,
    population: &PopulationResult,
    buildings: &BuildingResult,
) -> AnalysisSummary {
    let area_km2 = bbox.haversine_area_km2();
    let residential_buildings = buildings.summary.residential;

    let critical_facilities = CriticalFacilities {
        hospitals: service_count(buildings, "hospital"),
        schools: service_count(buildings, "school"),
        fire_stations: service_count(buildings, "fire_station"),
        police_stations: service_count(buildings, "police"),
    };

    let building_data_coverage = if buildings.specific_building_count() > 0 {
        BuildingDataCoverage::Good
    } else {
        BuildingDataCoverage::Limited
    };

    AnalysisSummary {
        area_km2,
        total_population: population.total_population,
        population_density: population.density_per_km2,
        total_buildings: buildings.total_buildings,
        building_density: buildings.summary.density_per_km2,
        critical_facilities,
        residential_buildings,
        estimated_affected_people: estimated_affected_people(
            population.total_population,
            residential_buildings,
        ),
        data_quality: DataQuality {
            population_data_points: u64::try_from(population.places.len()).unwrap_or(u64::MAX),
            building_data_coverage,
        },
        success: population.success && buildings.success,
    }
}

/// People exposed in the analyzed area.
///
/// The occupancy-based estimate (residential units times
/// [`PEOPLE_PER_RESIDENTIAL_UNIT`]) is floored by the registry-reported
/// population: sparse population tags must not understate a built-up
/// area's exposure.
#[must_use]
pub fn estimated_affected_people(total_population: u64, residential_buildings: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let occupancy_estimate = residential_buildings as f64 * PEOPLE_PER_RESIDENTIAL_UNIT;
    #[allow(clippy::cast_precision_loss)]
    let registry = total_population as f64;
    occupancy_estimate.max(registry)
}

fn service_count(buildings: &BuildingResult, amenity: &str) -> u64 {
    buildings
        .service_type_counts
        .get(amenity)
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use hazard_map_source_models::{BuildingSummary, EstimationMethod};

    use super::*;

    fn test_bbox() -> BoundingBox {
        BoundingBox::new(-4.33, 15.29, -4.31, 15.31)
    }

    fn population_result(total: u64) -> PopulationResult {
        PopulationResult {
            total_population: total,
            places: Vec::new(),
            area_km2: 4.9,
            density_per_km2: 100.0,
            estimation_method: EstimationMethod::LivePlaces,
            success: true,
            error_detail: None,
        }
    }

    fn building_result(residential: u64) -> BuildingResult {
        let mut services = BTreeMap::new();
        services.insert("hospital".to_string(), 2);
        services.insert("school".to_string(), 5);
        services.insert("police".to_string(), 1);

        BuildingResult {
            total_buildings: residential + 40,
            building_type_counts: BTreeMap::from([
                ("yes".to_string(), 40),
                ("house".to_string(), residential),
            ]),
            service_type_counts: services,
            summary: BuildingSummary {
                residential,
                ..BuildingSummary::default()
            },
            area_km2: 4.9,
            success: true,
            error_detail: None,
        }
    }

    /// A mock source that waits, then returns a canned result.
    struct SlowPopulation {
        delay: Duration,
        result: PopulationResult,
    }

    #[async_trait]
    impl PopulationSource for SlowPopulation {
        async fn fetch_population(&self, _bbox: &BoundingBox) -> PopulationResult {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    struct SlowBuildings {
        delay: Duration,
        result: BuildingResult,
    }

    #[async_trait]
    impl BuildingSource for SlowBuildings {
        async fn fetch_buildings(&self, _bbox: &BoundingBox) -> BuildingResult {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn analyzer(population: PopulationResult, buildings: BuildingResult) -> Analyzer {
        Analyzer::new(
            Arc::new(SlowPopulation {
                delay: Duration::ZERO,
                result: population,
            }),
            Arc::new(SlowBuildings {
                delay: Duration::ZERO,
                result: buildings,
            }),
        )
    }

    #[tokio::test]
    async fn merges_both_sources() {
        let analysis = analyzer(population_result(1000), building_result(200))
            .analyze(test_bbox())
            .await;

        assert!(analysis.summary.success);
        assert_eq!(analysis.summary.total_population, 1000);
        assert_eq!(analysis.summary.total_buildings, 240);
        assert_eq!(analysis.summary.critical_facilities.hospitals, 2);
        assert_eq!(analysis.summary.critical_facilities.schools, 5);
        assert_eq!(analysis.summary.critical_facilities.fire_stations, 0);
        assert_eq!(analysis.summary.critical_facilities.police_stations, 1);
    }

    #[tokio::test]
    async fn population_failure_degrades_but_keeps_building_data() {
        let analysis = analyzer(
            PopulationResult::failure("connect timeout"),
            building_result(200),
        )
        .analyze(test_bbox())
        .await;

        assert!(!analysis.summary.success);
        assert!(!analysis.population.success);
        assert!(analysis.buildings.success);
        assert_eq!(analysis.buildings.total_buildings, 240);
        assert_eq!(analysis.summary.total_buildings, 240);
    }

    #[tokio::test]
    async fn building_failure_degrades_but_keeps_population_data() {
        let analysis = analyzer(population_result(1000), BuildingResult::failure("HTTP 504"))
            .analyze(test_bbox())
            .await;

        assert!(!analysis.summary.success);
        assert!(analysis.population.success);
        assert_eq!(analysis.summary.total_population, 1000);
        assert_eq!(analysis.summary.total_buildings, 0);
    }

    #[tokio::test]
    async fn occupancy_estimate_floors_at_registry_population() {
        // 200 residential units * 2.5 = 500 > 100 reported.
        let analysis = analyzer(population_result(100), building_result(200))
            .analyze(test_bbox())
            .await;
        assert!((analysis.summary.estimated_affected_people - 500.0).abs() < f64::EPSILON);

        // 10 units * 2.5 = 25 < 100 reported; the registry wins.
        let analysis = analyzer(population_result(100), building_result(10))
            .analyze(test_bbox())
            .await;
        assert!((analysis.summary.estimated_affected_people - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn coverage_is_limited_without_specific_types() {
        let mut buildings = building_result(0);
        buildings.building_type_counts = BTreeMap::from([("yes".to_string(), 40)]);

        let analysis = analyzer(population_result(50), buildings)
            .analyze(test_bbox())
            .await;
        assert_eq!(
            analysis.summary.data_quality.building_data_coverage,
            BuildingDataCoverage::Limited
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sources_run_concurrently_not_sequentially() {
        let slow = Duration::from_millis(500);
        let fast = Duration::from_millis(100);

        let analyzer = Analyzer::new(
            Arc::new(SlowPopulation {
                delay: slow,
                result: population_result(1000),
            }),
            Arc::new(SlowBuildings {
                delay: fast,
                result: building_result(200),
            }),
        );

        let started = tokio::time::Instant::now();
        let analysis = analyzer.analyze(test_bbox()).await;
        let elapsed = started.elapsed();

        // Parallel dispatch joins in ~max(latencies); sequential would be
        // the sum (600ms).
        assert!(elapsed >= slow);
        assert!(elapsed < slow + fast);
        assert!(analysis.summary.success);
    }
}
