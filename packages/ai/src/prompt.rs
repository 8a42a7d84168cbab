//! Prompt construction for the narrative provider.
//!
//! The assessment prompt feeds the structured report into a fixed
//! emergency-analyst template. Prompts are plain strings; the provider
//! layer neither knows nor cares what they describe.

use hazard_map_report::Report;

/// Builds the rapid incident assessment prompt from a finished report.
#[must_use]
pub fn assessment_prompt(report: &Report) -> String {
    let summary = &report.analysis.summary;
    let center = report.metadata.bounding_box.center();
    let severity = report.severity;

    format!(
        "You are an emergency response analyst. Provide a rapid incident assessment \
         in EXACTLY 250-300 words.\n\
         \n\
         INCIDENT DATA:\n\
         Location: {place}\n\
         Coordinates: {lat:.4}°N, {lon:.4}°E\n\
         Area: {area:.2} km²\n\
         Magnitude: {magnitude:.1}/10 ({level})\n\
         Estimated Population: {population}\n\
         Estimated Affected People: {affected:.0}\n\
         Buildings: {buildings} total, {residential} residential\n\
         Critical Facilities: {hospitals} hospitals, {schools} schools, \
         {fire} fire stations, {police} police stations\n\
         \n\
         FORMAT REQUIREMENTS:\n\
         - PLAIN TEXT ONLY - absolutely NO asterisks, NO markdown, NO special formatting\n\
         - Use specific percentages and numbers, not vague terms\n\
         - Combine related items into single lines\n\
         - Maximum 250-300 words total\n\
         - Short, scannable sentences\n\
         \n\
         ANALYSIS STRUCTURE:\n\
         \n\
         SEVERITY ASSESSMENT\n\
         Threat Level: {level}\n\
         Estimated Casualties: [Give specific range based on magnitude and area]\n\
         Time Window: [State hours/days for critical response]\n\
         Infrastructure Damage: [Use percentages for power, water, transport combined]\n\
         Economic Impact: [Single dollar range estimate]\n\
         \n\
         AFFECTED POPULATION\n\
         Total Impact: [Work from the {affected:.0} affected-people estimate]\n\
         Priority Groups: [Maximum 3 vulnerable categories in one line]\n\
         Shelter Required: [Specific number or percentage]\n\
         Immediate Hazards: [Top 3 combined in one line]\n\
         \n\
         PRIORITY RESPONSE (48 Hours)\n\
         1. [Single most urgent action with specific metric]\n\
         2. [Second priority with clear deliverable]\n\
         3. [Third priority with resource number]\n\
         \n\
         RESOURCE DEPLOYMENT\n\
         Teams Required: [Use ranges like 5-8 SAR teams, 10-15 medical units]\n\
         Critical Supplies: [Top 3-4 items only]\n\
         Coordination: [One sentence on command structure]\n\
         \n\
         TIMELINE\n\
         Recovery Estimate: [Single realistic timeframe]\n\
         \n\
         CRITICAL NOTES:\n\
         - Be hyper-specific with numbers\n\
         - No lists longer than 3 items\n\
         - Combine utilities/infrastructure into percentages\n\
         - One hazard type per mention only\n\
         - Ruthlessly eliminate repetition",
        place = report.place_name,
        lat = center.lat,
        lon = center.lon,
        area = report.metadata.area_size_km2,
        magnitude = report.magnitude,
        level = severity,
        population = summary.total_population,
        affected = summary.estimated_affected_people,
        buildings = summary.total_buildings,
        residential = summary.residential_buildings,
        hospitals = summary.critical_facilities.hospitals,
        schools = summary.critical_facilities.schools,
        fire = summary.critical_facilities.fire_stations,
        police = summary.critical_facilities.police_stations,
    )
}

/// Builds the disaster-recommendations prompt.
#[must_use]
pub fn recommendations_prompt(
    disaster_type: Option<&str>,
    magnitude: f64,
    location: Option<&str>,
) -> String {
    format!(
        "As a disaster management expert, provide specific recommendations for:\n\
         - Disaster type: {disaster_type}\n\
         - Magnitude: {magnitude}/10\n\
         - Location: {location}\n\
         \n\
         Provide 5 actionable recommendations focusing on:\n\
         1. Immediate safety measures\n\
         2. Resource allocation priorities\n\
         3. Communication strategies\n\
         4. Evacuation considerations\n\
         5. Recovery planning\n\
         \n\
         Format as a numbered list. Keep it practical and concise.",
        disaster_type = disaster_type.unwrap_or("General catastrophe"),
        location = location.unwrap_or("Unspecified"),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hazard_map_analysis_models::{
        AnalysisSummary, AreaAnalysis, BuildingDataCoverage, CriticalFacilities, DataQuality,
    };
    use hazard_map_geometry::BoundingBox;
    use hazard_map_hazard_models::SeverityTier;
    use hazard_map_source_models::{
        BuildingResult, BuildingSummary, EstimationMethod, PopulationResult,
    };

    use super::*;

    fn sample_report() -> Report {
        let bbox = BoundingBox::new(-4.33, 15.29, -4.31, 15.31);
        let analysis = AreaAnalysis {
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
                critical_facilities: CriticalFacilities {
                    hospitals: 2,
                    schools: 5,
                    fire_stations: 1,
                    police_stations: 1,
                },
                residential_buildings: 80,
                estimated_affected_people: 1200.0,
                data_quality: DataQuality {
                    population_data_points: 3,
                    building_data_coverage: BuildingDataCoverage::Good,
                },
                success: true,
            },
        };
        hazard_map_report::assemble(analysis, SeverityTier::Severe, Some("Kinshasa"), 7.4)
    }

    #[test]
    fn assessment_prompt_embeds_the_report() {
        let prompt = assessment_prompt(&sample_report());

        assert!(prompt.contains("Location: Kinshasa"));
        assert!(prompt.contains("Magnitude: 7.4/10 (SEVERE)"));
        assert!(prompt.contains("Area: 4.90 km²"));
        assert!(prompt.contains("2 hospitals, 5 schools"));
        assert!(prompt.contains("Coordinates: -4.3200°N, 15.3000°E"));
    }

    #[test]
    fn recommendations_prompt_defaults_missing_fields() {
        let prompt = recommendations_prompt(None, 6.0, None);
        assert!(prompt.contains("Disaster type: General catastrophe"));
        assert!(prompt.contains("Location: Unspecified"));
        assert!(prompt.contains("Magnitude: 6/10"));

        let prompt = recommendations_prompt(Some("Earthquake"), 8.0, Some("Tokyo"));
        assert!(prompt.contains("Disaster type: Earthquake"));
        assert!(prompt.contains("Location: Tokyo"));
    }
}
