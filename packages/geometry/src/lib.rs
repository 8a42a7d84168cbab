#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure polygon and bounding-box math for hazard-area analysis.
//!
//! Reduces a drawn polygon to an axis-aligned bounding box, estimates the
//! polygon's surface with the shoelace formula, and computes bounding-box
//! surface with a haversine-style approximation. No I/O; every downstream
//! crate (sources, aggregation, server) builds on these primitives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kilometres per degree of latitude (flat-earth approximation).
///
/// Acceptable at the city-to-metro scales this system analyzes; not valid
/// at continental scale.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors from geometry validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The input polygon or bounding box does not describe a usable area.
    #[error("invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of what went wrong.
        message: String,
    },
}

/// A longitude/latitude coordinate pair in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LonLat {
    /// Creates a coordinate pair from longitude and latitude.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// An ordered sequence of vertices describing a drawn area.
///
/// A closed ring (first vertex repeated at the end) is permitted but not
/// required by any of the math routines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// The polygon vertices in draw order.
    pub vertices: Vec<LonLat>,
}

impl Polygon {
    /// Creates a polygon from a vertex sequence.
    #[must_use]
    pub const fn new(vertices: Vec<LonLat>) -> Self {
        Self { vertices }
    }

    /// Creates a polygon from `[lon, lat]` pairs as they arrive on the wire.
    #[must_use]
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self::new(pairs.iter().copied().map(LonLat::from).collect())
    }

    /// Number of distinct vertices (a closed ring's repeated first vertex
    /// counts once).
    #[must_use]
    pub fn distinct_vertex_count(&self) -> usize {
        let mut seen: Vec<LonLat> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !seen.contains(v) {
                seen.push(*v);
            }
        }
        seen.len()
    }

    /// Whether the polygon has the minimum 3 distinct vertices required to
    /// describe an area.
    #[must_use]
    pub fn has_min_vertices(&self) -> bool {
        self.distinct_vertex_count() >= 3
    }

    /// Reduces the vertices to their min/max longitude/latitude envelope.
    ///
    /// Returns `None` for an empty vertex list so callers can short-circuit
    /// with a request-validation failure instead of working with a
    /// meaningless box.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.vertices.first()?;
        let mut bbox = BoundingBox::new(first.lat, first.lon, first.lat, first.lon);

        for v in &self.vertices[1..] {
            bbox.south = bbox.south.min(v.lat);
            bbox.north = bbox.north.max(v.lat);
            bbox.west = bbox.west.min(v.lon);
            bbox.east = bbox.east.max(v.lon);
        }

        Some(bbox)
    }

    /// Planar shoelace-formula area in square kilometres.
    ///
    /// Sums `x_i * y_{i+1} - x_{i+1} * y_i` over consecutive vertex pairs
    /// (the last-to-first edge is only included when the caller closed the
    /// ring), halves, takes the absolute value, and scales degrees² to km²
    /// with [`KM_PER_DEGREE`]². Valid only for small areas; not
    /// interchangeable with [`BoundingBox::haversine_area_km2`].
    #[must_use]
    pub fn shoelace_area_km2(&self) -> f64 {
        let mut area = 0.0;
        for pair in self.vertices.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            area += a.lon * b.lat - b.lon * a.lat;
        }
        (area / 2.0).abs() * KM_PER_DEGREE * KM_PER_DEGREE
    }
}

/// An axis-aligned bounding box in degrees.
///
/// Invariant: `south < north` and `west < east`. Callers must canonicalize
/// min/max before construction; [`BoundingBox::validate`] reports boxes that
/// violate the invariant. Ephemeral: derived per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude boundary.
    pub south: f64,
    /// Western longitude boundary.
    pub west: f64,
    /// Northern latitude boundary.
    pub north: f64,
    /// Eastern longitude boundary.
    pub east: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Checks the `south < north` / `west < east` invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGeometry`] for a degenerate box.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.south >= self.north {
            return Err(GeometryError::InvalidGeometry {
                message: format!(
                    "degenerate bounding box: south ({}) must be below north ({})",
                    self.south, self.north
                ),
            });
        }
        if self.west >= self.east {
            return Err(GeometryError::InvalidGeometry {
                message: format!(
                    "degenerate bounding box: west ({}) must be left of east ({})",
                    self.west, self.east
                ),
            });
        }
        Ok(())
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> LonLat {
        LonLat::new(
            f64::midpoint(self.west, self.east),
            f64::midpoint(self.south, self.north),
        )
    }

    /// Approximate surface of the box in square kilometres.
    ///
    /// `R² * Δlat(rad) * Δlon(rad) * cos(avgLat(rad))` with
    /// `R =` [`EARTH_RADIUS_KM`]. Used for density normalization of
    /// bounding-box-shaped data; not interchangeable with
    /// [`Polygon::shoelace_area_km2`].
    #[must_use]
    pub fn haversine_area_km2(&self) -> f64 {
        let lat_diff = (self.north - self.south).abs().to_radians();
        let lon_diff = (self.east - self.west).abs().to_radians();
        let avg_lat = f64::midpoint(self.south, self.north).to_radians();
        EARTH_RADIUS_KM * EARTH_RADIUS_KM * lat_diff * lon_diff * avg_lat.cos()
    }
}
