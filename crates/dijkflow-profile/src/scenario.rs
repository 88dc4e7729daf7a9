//! Assessment scenarios.
//!
//! A scenario bundles one prepared cross-section, one soil profile and the
//! hydraulic boundary values for one piping assessment. Field names follow
//! the upstream assessment sheets, which are in Dutch: `sloot` is the
//! drainage ditch, `peil` a controlled water level, `intredepunt` and
//! `uittredepunt` the seepage entry and exit points, and `sth` a measured
//! piezometric head (stijghoogte).

use serde::{Deserialize, Serialize};

use crate::crosssection::Crosssection;
use crate::soil::SoilProfile;

/// Input for a single seepage assessment.
///
/// The scenario owns deep copies of its cross-section and soil profile, so
/// scenarios never share mutable state and can be processed in parallel.
/// The cross-section is expected to be in the landward frame and truncated
/// to the survey window before the scenario is formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, used for file naming and logging.
    pub name: String,
    /// Prepared surveyed cross-section.
    pub crosssection: Crosssection,
    /// Borehole soil profile for this location.
    pub soilprofile: SoilProfile,
    /// Identifier of the assessed ditch.
    pub slootnummer: String,
    /// Maximum of summer and winter target levels (m).
    pub max_zp_wp: f64,
    /// Polder level applied in the assessment (m).
    pub gehanteerd_polderpeil: f64,
    /// Upper bound of the ditch water level (m).
    pub bovengrens_slootpeil: f64,
    /// Lower bound of the ditch water level (m).
    pub ondergrens_slootpeil: f64,
    /// Ditch water level (m).
    pub slootpeil: f64,
    /// Design river water level at the safety norm (m).
    pub waterstand_bij_norm: f64,
    /// x of the seepage entry point (m); doubles as the left model limit.
    pub x_intredepunt: f64,
    /// x of the seepage exit point (m).
    pub x_uittredepunt: f64,
    /// Piezometric head at the entry point (m).
    pub sth_intredepunt: f64,
    /// Piezometric head at the exit point (m).
    pub sth_uittredepunt: f64,
}
