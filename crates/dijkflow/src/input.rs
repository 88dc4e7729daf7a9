//! Input records: the flat exchange format scenarios arrive in.
//!
//! Upstream assessment tooling exports one JSON document per study area:
//! scenario rows (ditch levels, heads, entry/exit coordinates, a soil
//! profile reference) with their surveyed landmark points, plus borehole
//! soil profiles as ordered layer records. This module parses that document
//! and assembles [`Scenario`] values ready for the geometry builder.
//!
//! Assembly follows the survey conventions: points are put in canonical
//! survey order, mirrored into the model frame (water side left), and
//! truncated to the survey window. Each scenario receives its own deep copy
//! of the referenced soil profile, so later destructive truncation never
//! leaks between scenarios.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dijkflow_build::GeometrySettings;
use dijkflow_profile::{
    Crosssection, CrosssectionPoint, CrosssectionPointType, ProfileError, Scenario, SoilLayer,
    SoilProfile,
};

/// Errors raised while parsing input records into scenarios.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input document is not valid JSON for the exchange format.
    #[error("failed to parse input JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A survey point carries a label outside the landmark vocabulary.
    #[error("scenario '{scenario}': unknown survey label '{label}'")]
    UnknownLabel {
        /// Scenario the point belongs to.
        scenario: String,
        /// The offending label.
        label: String,
    },

    /// A scenario references a soil profile id that is not in the document.
    #[error("scenario '{scenario}': no soil profile with id {id}")]
    UnknownProfile {
        /// Scenario with the dangling reference.
        scenario: String,
        /// The referenced profile id.
        id: i64,
    },

    /// Two profile records share the same id.
    #[error("duplicate soil profile id {0}")]
    DuplicateProfile(i64),

    /// Layer records within one profile disagree on the aquifer number.
    #[error("soil profile {0}: layer records disagree on the aquifer number")]
    InconsistentAquifer(i64),

    /// The assembled profile or cross-section is invalid.
    #[error("profile data error: {0}")]
    Profile(#[from] ProfileError),
}

/// One surveyed landmark point. `y` is the elevation column of the survey
/// file (model `z`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPointRecord {
    /// Landmark label, e.g. `"Sloot_1d"`.
    pub label: String,
    /// Horizontal survey coordinate (m).
    pub x: f64,
    /// Elevation (m NAP).
    pub y: f64,
}

/// One scenario row of the exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario name, unique within the document.
    pub name: String,
    /// Referenced soil profile id.
    pub ondergrond: i64,
    /// Ditch identifier.
    pub slootnummer: String,
    /// Maximum of summer and winter target levels (m NAP).
    pub max_zp_wp: f64,
    /// Applied polder level (m NAP).
    pub gehanteerd_polderpeil: f64,
    /// Upper bound of the ditch level (m NAP).
    pub bovengrens_slootpeil: f64,
    /// Lower bound of the ditch level (m NAP).
    pub ondergrens_slootpeil: f64,
    /// Ditch water level (m NAP).
    pub slootpeil: f64,
    /// Design river level at the norm frequency (m NAP).
    pub waterstand_bij_norm: f64,
    /// x of the seepage entry point (m).
    pub x_intredepunt: f64,
    /// x of the seepage exit point (m).
    pub x_uittredepunt: f64,
    /// Hydraulic head at the entry point (m NAP).
    pub sth_intredepunt: f64,
    /// Hydraulic head at the exit point (m NAP).
    pub sth_uittredepunt: f64,
    /// Surveyed landmark points, any order.
    pub points: Vec<SurveyPointRecord>,
}

/// One borehole layer record, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayerRecord {
    /// Full soil name, e.g. `"Kla_zware klei"`.
    pub soil_name: String,
    /// Top elevation (m NAP).
    pub top_level: f64,
    /// Bottom elevation (m NAP); missing for the deepest layer.
    #[serde(default)]
    pub botm_level: Option<f64>,
    /// Aquifer flag of this layer.
    pub is_aquifer: i32,
    /// Aquifer number; must agree across the profile's records.
    pub aq_nr: i32,
}

/// One borehole soil profile of the exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfileRecord {
    /// Profile id scenarios refer to.
    pub profile: i64,
    /// Layer records, top to bottom.
    pub layers: Vec<SoilLayerRecord>,
}

/// The full exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InputSet {
    /// Scenario rows.
    pub scenarios: Vec<ScenarioRecord>,
    /// Borehole soil profiles.
    pub soilprofiles: Vec<SoilProfileRecord>,
}

impl SoilProfileRecord {
    /// Assemble the domain soil profile. A missing bottom level defaults to
    /// `top − bottom_offset`; the per-record aquifer numbers must agree and
    /// become the profile's aquifer number.
    pub fn to_profile(&self, settings: &GeometrySettings) -> Result<SoilProfile, InputError> {
        if self.layers.is_empty() {
            return Err(ProfileError::EmptySoilProfile(self.profile).into());
        }
        let aquifer_number = self.layers[0].aq_nr;
        if self.layers.iter().any(|l| l.aq_nr != aquifer_number) {
            return Err(InputError::InconsistentAquifer(self.profile));
        }
        let mut soillayers = Vec::with_capacity(self.layers.len());
        for record in &self.layers {
            let bottom = record
                .botm_level
                .unwrap_or(record.top_level - settings.bottom_offset);
            soillayers.push(SoilLayer::new(
                record.soil_name.clone(),
                record.top_level,
                bottom,
                record.is_aquifer,
            )?);
        }
        Ok(SoilProfile::new(self.profile, soillayers, aquifer_number))
    }
}

impl ScenarioRecord {
    /// Assemble the domain scenario: points in survey order, mirrored into
    /// the model frame and truncated to the survey window, with a private
    /// copy of the referenced soil profile.
    pub fn to_scenario(
        &self,
        profiles: &HashMap<i64, SoilProfile>,
        settings: &GeometrySettings,
    ) -> Result<Scenario, InputError> {
        let soilprofile = profiles
            .get(&self.ondergrond)
            .cloned()
            .ok_or_else(|| InputError::UnknownProfile {
                scenario: self.name.clone(),
                id: self.ondergrond,
            })?;

        let mut points = Vec::with_capacity(self.points.len());
        for record in &self.points {
            let point_type = CrosssectionPointType::from_label(&record.label).map_err(|_| {
                InputError::UnknownLabel {
                    scenario: self.name.clone(),
                    label: record.label.clone(),
                }
            })?;
            points.push(CrosssectionPoint::new(record.x, record.y, point_type));
        }
        points.sort_by_key(|p| p.point_type.survey_rank().unwrap_or(usize::MAX));

        let mut crosssection = Crosssection::new(points);
        crosssection.mirror();
        crosssection.limit_left(settings.survey_limit_left)?;
        crosssection.limit_right(settings.survey_limit_right)?;

        Ok(Scenario {
            name: self.name.clone(),
            crosssection,
            soilprofile,
            slootnummer: self.slootnummer.clone(),
            max_zp_wp: self.max_zp_wp,
            gehanteerd_polderpeil: self.gehanteerd_polderpeil,
            bovengrens_slootpeil: self.bovengrens_slootpeil,
            ondergrens_slootpeil: self.ondergrens_slootpeil,
            slootpeil: self.slootpeil,
            waterstand_bij_norm: self.waterstand_bij_norm,
            x_intredepunt: self.x_intredepunt,
            x_uittredepunt: self.x_uittredepunt,
            sth_intredepunt: self.sth_intredepunt,
            sth_uittredepunt: self.sth_uittredepunt,
        })
    }
}

impl InputSet {
    /// Parse the exchange document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the exchange document from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Assemble every scenario in the document. Records that cannot be
    /// assembled are skipped and their errors collected, so one bad row
    /// never hides the rest of the batch.
    pub fn scenarios(&self, settings: &GeometrySettings) -> (Vec<Scenario>, Vec<InputError>) {
        let mut errors = Vec::new();

        let mut profiles = HashMap::new();
        for record in &self.soilprofiles {
            if profiles.contains_key(&record.profile) {
                errors.push(InputError::DuplicateProfile(record.profile));
                continue;
            }
            match record.to_profile(settings) {
                Ok(profile) => {
                    profiles.insert(record.profile, profile);
                }
                Err(e) => errors.push(e),
            }
        }

        let mut scenarios = Vec::with_capacity(self.scenarios.len());
        for record in &self.scenarios {
            match record.to_scenario(&profiles, settings) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => errors.push(e),
            }
        }
        (scenarios, errors)
    }
}

// ====== tests ======

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> &'static str {
        r#"{
            "scenarios": [
                {
                    "name": "A1_0.4",
                    "ondergrond": 14,
                    "slootnummer": "SL-1",
                    "max_zp_wp": 1.5,
                    "gehanteerd_polderpeil": -0.5,
                    "bovengrens_slootpeil": -0.8,
                    "ondergrens_slootpeil": -1.0,
                    "slootpeil": -0.9,
                    "waterstand_bij_norm": 3.2,
                    "x_intredepunt": 2.0,
                    "x_uittredepunt": 14.0,
                    "sth_intredepunt": 2.5,
                    "sth_uittredepunt": 1.0,
                    "points": [
                        {"label": "MV_bui", "x": 45.0, "y": 1.0},
                        {"label": "MV_bin", "x": 0.0, "y": 1.0},
                        {"label": "Sloot_1a", "x": 20.0, "y": 1.0},
                        {"label": "Sloot_1c", "x": 27.0, "y": -2.0},
                        {"label": "Sloot_1d", "x": 30.0, "y": -2.0},
                        {"label": "Sloot_1b", "x": 32.0, "y": 1.0},
                        {"label": "Kruin_1", "x": 36.0, "y": 5.0},
                        {"label": "Kruin_2", "x": 38.0, "y": 5.0}
                    ]
                }
            ],
            "soilprofiles": [
                {
                    "profile": 14,
                    "layers": [
                        {"soil_name": "Kla_zware klei", "top_level": 1.0, "botm_level": -3.0, "is_aquifer": 0, "aq_nr": 1},
                        {"soil_name": "ZA_zand matig grof", "top_level": -3.0, "is_aquifer": 1, "aq_nr": 1}
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn parse_and_assemble() {
        let set = InputSet::from_json(document()).expect("valid document");
        let settings = GeometrySettings::default();
        let (scenarios, errors) = set.scenarios(&settings);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(scenarios.len(), 1);

        let s = &scenarios[0];
        assert_eq!(s.name, "A1_0.4");
        assert_eq!(s.soilprofile.id, 14);
        assert_eq!(s.soilprofile.aquifer_number, 1);

        // shuffled input points end up mirrored into the model frame,
        // outer ground leftmost
        let pts = &s.crosssection.points;
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[0].point_type, CrosssectionPointType::MvBuiten);
        assert_eq!(pts[0].x, -45.0);
        assert_eq!(pts[7].point_type, CrosssectionPointType::MvBinnen);
        assert_eq!(pts[7].x, 0.0);
        let ditch_bottom = s
            .crosssection
            .point_of_type(CrosssectionPointType::Sloot1D)
            .expect("ditch landmark");
        assert_eq!(ditch_bottom.x, -30.0);
        assert_eq!(ditch_bottom.z, -2.0);
        assert!(pts.windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn missing_bottom_level_defaults_to_offset() {
        let set = InputSet::from_json(document()).expect("valid document");
        let settings = GeometrySettings::default();
        let profile = set.soilprofiles[0].to_profile(&settings).expect("profile");
        let sand = &profile.soillayers[1];
        assert_eq!(sand.top, -3.0);
        assert_eq!(sand.bottom, -13.0);
    }

    #[test]
    fn unknown_label_is_collected() {
        let mut set = InputSet::from_json(document()).expect("valid document");
        set.scenarios[0].points[0].label = "Sloot_9x".to_string();
        let settings = GeometrySettings::default();
        let (scenarios, errors) = set.scenarios(&settings);
        assert!(scenarios.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            InputError::UnknownLabel { label, .. } if label == "Sloot_9x"
        ));
    }

    #[test]
    fn dangling_profile_reference_is_collected() {
        let mut set = InputSet::from_json(document()).expect("valid document");
        set.scenarios[0].ondergrond = 99;
        let settings = GeometrySettings::default();
        let (scenarios, errors) = set.scenarios(&settings);
        assert!(scenarios.is_empty());
        assert!(matches!(
            &errors[0],
            InputError::UnknownProfile { id: 99, .. }
        ));
    }

    #[test]
    fn inconsistent_aquifer_number_fails_profile_and_scenario() {
        let mut set = InputSet::from_json(document()).expect("valid document");
        set.soilprofiles[0].layers[1].aq_nr = 2;
        let settings = GeometrySettings::default();
        let (scenarios, errors) = set.scenarios(&settings);
        assert!(scenarios.is_empty());
        // one error for the profile, one for the scenario that needed it
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], InputError::InconsistentAquifer(14)));
        assert!(matches!(errors[1], InputError::UnknownProfile { .. }));
    }

    #[test]
    fn duplicate_profile_id_is_collected() {
        let mut set = InputSet::from_json(document()).expect("valid document");
        let copy = set.soilprofiles[0].clone();
        set.soilprofiles.push(copy);
        let settings = GeometrySettings::default();
        let (scenarios, errors) = set.scenarios(&settings);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], InputError::DuplicateProfile(14)));
    }

    #[test]
    fn profiles_are_deep_copied_per_scenario() {
        let mut set = InputSet::from_json(document()).expect("valid document");
        let twin = {
            let mut r = set.scenarios[0].clone();
            r.name = "A1_0.5".to_string();
            r
        };
        set.scenarios.push(twin);
        let settings = GeometrySettings::default();
        let (mut scenarios, errors) = set.scenarios(&settings);
        assert!(errors.is_empty());
        assert_eq!(scenarios.len(), 2);
        // truncating one scenario's profile must not touch the other's
        scenarios[0].soilprofile.cut_top_at_z(-5.0);
        assert_eq!(scenarios[0].soilprofile.soillayers.len(), 1);
        assert_eq!(scenarios[1].soilprofile.soillayers.len(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = InputSet::from_json("{ not json").unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }
}
