//! Hydraulic soil parameter table.
//!
//! Conductivities and display colors per borehole soil code, plus the set
//! of sand codes whose conductivity is replaced by the calibrated sand
//! value of the run. The built-in table covers the soil vocabulary of the
//! regional borehole logs; a settings file may replace it wholesale.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Soil code of the dedicated aquifer entry added to every model.
pub const AQUIFER_SOIL_CODE: &str = "aquifer";

/// Display color of the dedicated aquifer entry.
pub const AQUIFER_COLOR: &str = "#d8e35f";

/// Hydraulic parameters of one soil code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilParameters {
    /// Horizontal conductivity (m/day).
    pub k_hor: f64,
    /// Vertical conductivity (m/day).
    pub k_ver: f64,
    /// Display color as `#rrggbb`.
    pub color: String,
}

/// The soil parameter table of a run.
///
/// Iteration order is alphabetical by code, so models built from the same
/// inputs list their soil types identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLibrary {
    /// Parameters per soil code.
    soils: BTreeMap<String, SoilParameters>,
    /// Codes whose conductivity is overridden by the calibrated sand value.
    sand_codes: BTreeSet<String>,
}

impl Default for SoilLibrary {
    fn default() -> Self {
        // regional table: (code, k_hor, k_ver, color), conductivities m/day
        const TABLE: &[(&str, f64, f64, &str)] = &[
            ("AA", 5.0, 5.0, "#b5aeae"),
            ("AV", 0.001, 0.001, "#b5aeae"),
            ("BV", 0.001, 0.001, "#996d22"),
            ("CK", 0.001, 0.001, "#a2e69c"),
            ("CK14", 0.001, 0.001, "#a2e69c"),
            ("CK16", 0.001, 0.001, "#38ab6c"),
            ("CK18", 0.001, 0.001, "#1df00a"),
            ("CZ", 0.01, 0.01, "#b5aeae"),
            ("DK", 0.001, 0.001, "#73c99a"),
            ("DK14", 0.001, 0.001, "#73c99a"),
            ("DK16", 0.001, 0.001, "#098742"),
            ("DK18", 0.001, 0.001, "#b5aeae"),
            ("DZ", 5.0, 5.0, "#07e86c"),
            ("HV", 0.001, 0.001, "#c29904"),
            ("Kla", 0.01, 0.01, "#1b6936"),
            ("PL", 2.0, 2.0, "#eaff00"),
            ("PLa", 2.0, 2.0, "#eaff00"),
            ("ZA", 2.0, 2.0, "#d8e35f"),
            ("ZAa", 2.0, 2.0, "#d8e35f"),
        ];
        const SAND: &[&str] = &["AA", "DZ", "PL", "PLa", "ZA", "ZAa", "CZ"];

        let soils = TABLE
            .iter()
            .map(|(code, k_hor, k_ver, color)| {
                (
                    code.to_string(),
                    SoilParameters {
                        k_hor: *k_hor,
                        k_ver: *k_ver,
                        color: color.to_string(),
                    },
                )
            })
            .collect();
        let sand_codes = SAND.iter().map(|c| c.to_string()).collect();
        Self { soils, sand_codes }
    }
}

impl SoilLibrary {
    /// An empty table, for tests and fully file-driven runs.
    pub fn empty() -> Self {
        Self {
            soils: BTreeMap::new(),
            sand_codes: BTreeSet::new(),
        }
    }

    /// Parameters for a soil code. A miss is a configuration error: the
    /// borehole vocabulary and the table are maintained together.
    pub fn get(&self, code: &str) -> Result<&SoilParameters, ConfigError> {
        self.soils
            .get(code)
            .ok_or_else(|| ConfigError::UnknownSoil(code.to_string()))
    }

    /// Whether this code takes the calibrated sand conductivity.
    pub fn is_sand(&self, code: &str) -> bool {
        self.sand_codes.contains(code)
    }

    /// Insert or replace a soil entry.
    pub fn set(&mut self, code: impl Into<String>, params: SoilParameters) {
        self.soils.insert(code.into(), params);
    }

    /// Mark a code as sand.
    pub fn mark_sand(&mut self, code: impl Into<String>) {
        self.sand_codes.insert(code.into());
    }

    /// All codes, alphabetical.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.soils.keys().map(String::as_str)
    }

    /// Number of soil entries.
    pub fn len(&self) -> usize {
        self.soils.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.soils.is_empty()
    }
}

// ====== tests ======
