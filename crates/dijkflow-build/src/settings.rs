//! Geometry settings and per-run build options.
//!
//! [`GeometrySettings`] holds the layout constants of the model frame and
//! rarely changes between runs; overrides come from a settings file.
//! [`BuildOptions`] holds the hydraulic knobs that are varied per batch
//! (sand conductivity, anisotropy, sea level rise) and map onto CLI flags.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layout constants of the model frame. All lengths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Distance the model extends landward of the ditch top (Sloot_1a).
    pub right_margin: f64,
    /// Width of the polder-level boundary window on the ditch bottom.
    pub polder_boundary_width: f64,
    /// Offset landward of the ditch top where the surface boundary starts.
    pub ditch_boundary_offset: f64,
    /// Default layer thickness when a borehole log omits a bottom.
    pub bottom_offset: f64,
    /// Left survey truncation applied before scenario assembly.
    pub survey_limit_left: f64,
    /// Right survey truncation applied before scenario assembly.
    pub survey_limit_right: f64,
    /// Minimum finite-element size (m).
    pub min_mesh_size: f64,
    /// Element size along the erosion pipe (m).
    pub pipe_mesh_size: f64,
    /// Representative aquifer grain size D70 (µm).
    pub d70_um: f64,
    /// Substring that marks sand layers in borehole soil names, used by the
    /// name-based aquifer cross-check.
    pub aquifer_name_marker: String,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            right_margin: 40.0,
            polder_boundary_width: 1.0,
            ditch_boundary_offset: 1.0,
            bottom_offset: 10.0,
            survey_limit_left: -50.0,
            survey_limit_right: 100.0,
            min_mesh_size: 2.0,
            pipe_mesh_size: 0.5,
            d70_um: 100.0,
            aquifer_name_marker: "zand".to_string(),
        }
    }
}

impl GeometrySettings {
    /// Check the settings describe a usable model frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.right_margin <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "right_margin must be positive, got {}",
                self.right_margin
            )));
        }
        if self.polder_boundary_width <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "polder_boundary_width must be positive, got {}",
                self.polder_boundary_width
            )));
        }
        if self.ditch_boundary_offset < 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "ditch_boundary_offset must not be negative, got {}",
                self.ditch_boundary_offset
            )));
        }
        if self.bottom_offset <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "bottom_offset must be positive, got {}",
                self.bottom_offset
            )));
        }
        if self.survey_limit_left >= self.survey_limit_right {
            return Err(ConfigError::InvalidSettings(format!(
                "survey limits must satisfy left < right, got {} / {}",
                self.survey_limit_left, self.survey_limit_right
            )));
        }
        if self.min_mesh_size <= 0.0 || self.pipe_mesh_size <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "mesh sizes must be positive, got {} / {}",
                self.min_mesh_size, self.pipe_mesh_size
            )));
        }
        if self.d70_um <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "d70_um must be positive, got {}",
                self.d70_um
            )));
        }
        if self.aquifer_name_marker.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "aquifer_name_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hydraulic knobs varied per batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Horizontal conductivity assigned to sand soils and the aquifer
    /// (m/day).
    pub k_sand: f64,
    /// Anisotropy of the sand conductivity, horizontal : vertical. The
    /// vertical conductivity is `k_sand / anisotropy_factor`.
    pub anisotropy_factor: f64,
    /// Sea level rise added to the fitted and measured river-side heads (m).
    pub sea_level_rise: f64,
    /// Add the fixed-head boundary on the ground surface landward of the
    /// ditch.
    pub use_surface_boundary: bool,
    /// Apply the 0.3d head correction over the polder window: when the
    /// ditch cuts `d` meters into the covering layers above the aquifer,
    /// the polder head is raised by `0.3 * d`.
    pub apply_03d_rule: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        // tidal-sand calibration: k = 6 m/day at anisotropy 2
        Self {
            k_sand: 6.0,
            anisotropy_factor: 2.0,
            sea_level_rise: 0.0,
            use_surface_boundary: true,
            apply_03d_rule: true,
        }
    }
}

impl BuildOptions {
    /// Check the options are physically meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k_sand <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "k_sand must be positive, got {}",
                self.k_sand
            )));
        }
        if self.anisotropy_factor <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "anisotropy_factor must be positive, got {}",
                self.anisotropy_factor
            )));
        }
        if !self.sea_level_rise.is_finite() || self.sea_level_rise < 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "sea_level_rise must be a non-negative number, got {}",
                self.sea_level_rise
            )));
        }
        Ok(())
    }

    /// Vertical sand conductivity implied by the anisotropy factor (m/day).
    pub fn k_sand_vertical(&self) -> f64 {
        self.k_sand / self.anisotropy_factor
    }
}

// ====== tests ======
