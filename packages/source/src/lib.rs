#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic data source clients and normalization logic.
//!
//! Each external service gets a client that issues its query for a bounding
//! box and normalizes the response into the typed records from
//! [`hazard_map_source_models`]. Transport and parse failures are captured
//! into the record (`success: false` + `error_detail`) at this boundary:
//! the aggregator above never sees an `Err` from a source, only degraded
//! data.

pub mod buildings;
pub mod census;
pub mod overpass;
pub mod population;
pub mod type_mapping;

use async_trait::async_trait;
use hazard_map_geometry::BoundingBox;
use hazard_map_source_models::{BuildingResult, PopulationResult};

/// Errors that can occur while talking to an external geographic service.
///
/// These never escape a source client; they are rendered into the result
/// record's `error_detail` before the aggregator sees them.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed or timed out.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response was valid JSON but not the shape the service documents.
    #[error("unexpected response: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

impl SourceError {
    /// Shorthand for a [`SourceError::Parse`] with the given message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// A source of population figures for a bounding box.
///
/// Implementations must return a failure record rather than panic or hang:
/// the aggregator runs sources concurrently and needs every one of them to
/// settle.
#[async_trait]
pub trait PopulationSource: Send + Sync {
    /// Fetches and normalizes population data for the box.
    async fn fetch_population(&self, bbox: &BoundingBox) -> PopulationResult;
}

/// A source of building and amenity counts for a bounding box.
#[async_trait]
pub trait BuildingSource: Send + Sync {
    /// Fetches and normalizes building/amenity data for the box.
    async fn fetch_buildings(&self, bbox: &BoundingBox) -> BuildingResult;
}
