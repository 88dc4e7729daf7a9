//! Error types for survey and borehole data.

use thiserror::Error;

/// Errors raised by cross-section and soil-profile operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Cross-section has no points (either empty input or a truncation
    /// that removed everything).
    #[error("cross-section has no points")]
    EmptyCrosssection,

    /// A truncation would leave fewer than two points.
    #[error("truncating at x={0} leaves no usable cross-section")]
    TruncationOutsideProfile(f64),

    /// Soil profile has no layers.
    #[error("soil profile {0} has no layers")]
    EmptySoilProfile(i64),

    /// A soil layer with its top below its bottom.
    #[error("soil layer '{name}' has top {top} below bottom {bottom}")]
    InvertedLayer {
        /// Full soil name of the offending layer.
        name: String,
        /// Top elevation (m).
        top: f64,
        /// Bottom elevation (m).
        bottom: f64,
    },

    /// A survey label that is not part of the landmark vocabulary.
    #[error("unknown survey point label '{0}'")]
    UnknownLabel(String),
}

/// Result type for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
