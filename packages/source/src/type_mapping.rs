//! Building and amenity type mapping.
//!
//! Maps raw tag values from the building/amenity source onto the summary
//! categories used in impact reporting. The mapping lives in this single
//! table so every source variant categorizes identically; no call site
//! re-derives its own buckets.

/// Impact category for a specific building or amenity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingBucket {
    /// Dwellings: apartments, houses, terraces.
    Residential,
    /// Commercial, retail, and office space.
    Commercial,
    /// Schools and universities.
    Educational,
    /// Hospitals, clinics, pharmacies.
    Healthcare,
    /// Fire and police stations.
    EmergencyServices,
    /// Garages, sheds, warehouses.
    Infrastructure,
}

/// Amenity tag values the services query asks for.
///
/// Anything outside this allow-list is not requested from the service and
/// never appears in `service_type_counts`.
pub const AMENITY_FILTER: &[&str] = &[
    "hospital",
    "school",
    "university",
    "clinic",
    "pharmacy",
    "fire_station",
    "police",
    "bank",
    "restaurant",
    "cafe",
    "fuel",
    "atm",
    "post_office",
    "library",
    "theatre",
    "cinema",
];

/// Amenity tag values counted as critical facilities in the merged summary.
pub const CRITICAL_AMENITIES: &[&str] = &["hospital", "school", "fire_station", "police"];

/// Maps a specific `building` tag value to its summary bucket.
///
/// Generic values (`yes`, `unknown`) and unmapped types return `None`;
/// they count toward the building total but not toward any category.
#[must_use]
pub fn building_bucket(building_type: &str) -> Option<BuildingBucket> {
    match building_type {
        "apartments" | "residential" | "house" | "terrace" => Some(BuildingBucket::Residential),
        "commercial" | "retail" | "office" => Some(BuildingBucket::Commercial),
        "school" | "university" => Some(BuildingBucket::Educational),
        "hospital" => Some(BuildingBucket::Healthcare),
        "garage" | "shed" | "warehouse" => Some(BuildingBucket::Infrastructure),
        _ => None,
    }
}

/// Maps an `amenity` tag value to its summary bucket.
///
/// Amenities outside the mapped set (banks, restaurants, ...) are counted
/// in `service_type_counts` but contribute to no category.
#[must_use]
pub fn amenity_bucket(amenity: &str) -> Option<BuildingBucket> {
    match amenity {
        "school" | "university" => Some(BuildingBucket::Educational),
        "hospital" | "clinic" | "pharmacy" => Some(BuildingBucket::Healthcare),
        "fire_station" | "police" => Some(BuildingBucket::EmergencyServices),
        _ => None,
    }
}

/// The amenity allow-list as the `a|b|c` pattern the services query embeds.
#[must_use]
pub fn amenity_filter_pattern() -> String {
    AMENITY_FILTER.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residential_types_map_to_residential() {
        for t in ["apartments", "residential", "house", "terrace"] {
            assert_eq!(building_bucket(t), Some(BuildingBucket::Residential));
        }
    }

    #[test]
    fn generic_tags_map_to_no_bucket() {
        assert_eq!(building_bucket("yes"), None);
        assert_eq!(building_bucket("unknown"), None);
        assert_eq!(building_bucket("greenhouse"), None);
    }

    #[test]
    fn amenities_split_between_buckets() {
        assert_eq!(amenity_bucket("clinic"), Some(BuildingBucket::Healthcare));
        assert_eq!(
            amenity_bucket("fire_station"),
            Some(BuildingBucket::EmergencyServices)
        );
        assert_eq!(amenity_bucket("school"), Some(BuildingBucket::Educational));
        // Allow-listed but uncategorized amenities roll into no bucket.
        assert_eq!(amenity_bucket("restaurant"), None);
        assert_eq!(amenity_bucket("bank"), None);
    }

    #[test]
    fn critical_amenities_are_a_subset_of_the_filter() {
        for a in CRITICAL_AMENITIES {
            assert!(AMENITY_FILTER.contains(a));
        }
    }

    #[test]
    fn filter_pattern_joins_with_pipes() {
        let pattern = amenity_filter_pattern();
        assert!(pattern.starts_with("hospital|school"));
        assert!(pattern.contains("|fire_station|"));
        assert!(!pattern.ends_with('|'));
    }
}
