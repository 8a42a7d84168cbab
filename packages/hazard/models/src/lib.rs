#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard severity taxonomy.
//!
//! Maps a continuous disaster magnitude on the 0-10 scale to a discrete
//! severity tier with display metadata. Classification is a pure threshold
//! lookup: stateless, recomputed on every call, nothing persisted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity tier for a hazard, from 1 (low) to 5 (critical).
///
/// Derived from a magnitude in `[0, 10]` via fixed thresholds at 3, 5, 7,
/// and 9. Boundary values resolve to the upper tier (a magnitude of exactly
/// 3.0 is [`SeverityTier::Moderate`]).
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
pub enum SeverityTier {
    /// Magnitude below 3: minor incident
    Low = 1,
    /// Magnitude 3 to below 5: notable concern
    Moderate = 2,
    /// Magnitude 5 to below 7: serious threat
    High = 3,
    /// Magnitude 7 to below 9: major catastrophe
    Severe = 4,
    /// Magnitude 9 and above: extreme disaster
    Critical = 5,
}

impl SeverityTier {
    /// Classifies a magnitude into its severity tier.
    ///
    /// Total over `[0, 10]`. Out-of-range and non-finite magnitudes are
    /// rejected rather than clamped: they indicate a caller contract
    /// violation, and clamping would silently launder it into a valid
    /// answer.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMagnitudeError`] if the magnitude is not a finite
    /// number in `[0, 10]`.
    pub fn classify(magnitude: f64) -> Result<Self, InvalidMagnitudeError> {
        if !magnitude.is_finite() || !(0.0..=10.0).contains(&magnitude) {
            return Err(InvalidMagnitudeError { magnitude });
        }

        Ok(if magnitude < 3.0 {
            Self::Low
        } else if magnitude < 5.0 {
            Self::Moderate
        } else if magnitude < 7.0 {
            Self::High
        } else if magnitude < 9.0 {
            Self::Severe
        } else {
            Self::Critical
        })
    }

    /// Returns the numeric value of this tier (1-5).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Display color tag for map and report styling.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "yellow",
            Self::High => "orange",
            Self::Severe => "red",
            Self::Critical => "darkred",
        }
    }

    /// One-line description of the tier.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Low => "Minor incident",
            Self::Moderate => "Notable concern",
            Self::High => "Serious threat",
            Self::Severe => "Major catastrophe",
            Self::Critical => "Extreme disaster",
        }
    }
}

/// Error returned when classifying a magnitude outside the 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidMagnitudeError {
    /// The invalid magnitude that was provided.
    pub magnitude: f64,
}

impl std::fmt::Display for InvalidMagnitudeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid magnitude {}: expected a finite value in 0-10",
            self.magnitude
        )
    }
}

impl std::error::Error for InvalidMagnitudeError {}
