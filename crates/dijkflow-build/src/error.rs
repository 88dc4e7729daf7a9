//! Error types for geometry construction.
//!
//! Failures split into two families. [`ConfigError`] means the run setup is
//! wrong (bad settings, a soil code missing from the parameter table) and
//! aborts a whole batch. Everything else in [`BuildError`] is a per-scenario
//! data problem: the builder reports it in the build log and moves on.

use thiserror::Error;

use dijkflow_model::ModelError;
use dijkflow_profile::{CrosssectionPointType, ProfileError};

/// Errors in run configuration. Fatal for the whole batch.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A soil code used by a profile has no entry in the parameter table.
    #[error("soil type '{0}' is not present in the soil parameter table")]
    UnknownSoil(String),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Errors raised while building one scenario's geometry.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A landmark the builder needs was not surveyed.
    #[error("missing required profile point {0}")]
    MissingPoint(CrosssectionPointType),

    /// The three ditch landmarks are not in left-to-right order.
    #[error(
        "degenerate ditch: expected x order bottom-left < bottom-right < top-right, \
         got {bottom_left} / {bottom_right} / {top_right}"
    )]
    DegenerateDitch {
        /// x of the dikeward ditch bottom (Sloot_1d).
        bottom_left: f64,
        /// x of the landward ditch bottom (Sloot_1c).
        bottom_right: f64,
        /// x of the landward ditch top (Sloot_1a).
        top_right: f64,
    },

    /// The soil profile has no designated aquifer layer.
    #[error("soil profile {0} has no designated aquifer")]
    NoAquifer(i64),

    /// Cross-section or soil-profile data failed an operation.
    #[error("profile data error: {0}")]
    Profile(#[from] ProfileError),

    /// The raised ditch bank does not intersect the aquifer top.
    #[error("cannot intersect the ditch bank with the aquifer top: {0}")]
    BankIntersection(String),

    /// The logarithmic head fit could not be made or evaluated.
    #[error("head fit failed: {0}")]
    HeadFit(String),

    /// The entry/exit x positions make the head fit impossible.
    #[error("entry/exit x must be positive for the head fit, got {x_entry} / {x_exit}")]
    NonPositiveFitSample {
        /// x of the entry point.
        x_entry: f64,
        /// x of the exit point.
        x_exit: f64,
    },

    /// The assembled model failed its own validation.
    #[error("assembled model failed validation: {0}")]
    Model(#[from] ModelError),

    /// Run configuration error; aborts the batch instead of being logged.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BuildError {
    /// Whether this error should abort the whole batch rather than just
    /// fail the current scenario.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BuildError::Config(_))
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
