//! The geometry builder: from scenario to solver-ready model.
//!
//! The build runs in stages: locate the ditch landmarks, truncate the
//! cross-section to the model extent, prepare the soil profile, derive the
//! pipe start and the polder boundary window from the aquifer position,
//! clip the soil layers against the surface envelope, and finish with soil
//! types, boundary conditions, pipe trajectory and mesh sizing.
//!
//! Per-scenario data problems (a missing landmark, no aquifer, a degenerate
//! ditch) do not abort a batch: [`GeometryBuilder::build`] reports them as
//! a build log without a model. Only [`ConfigError`] propagates.

use dijkflow_math::{fit_log_linear, line_intersection, to_mm, Point2};
use dijkflow_model::{
    BoundaryCondition, CalculationMode, MeshProperties, ModelLayer, ModelPoint, PipeDirection,
    PipeTrajectory, SeepageModel, SoilType,
};
use dijkflow_profile::{Crosssection, CrosssectionPoint, CrosssectionPointType, Scenario};

use crate::clip::{clip, envelope_ring, rect_ring, ClipOutcome};
use crate::error::{BuildError, ConfigError, Result};
use crate::log::BuildLog;
use crate::settings::{BuildOptions, GeometrySettings};
use crate::soils::{SoilLibrary, AQUIFER_COLOR, AQUIFER_SOIL_CODE};

/// Outcome of one scenario build: the log always, the model only when the
/// geometry could be constructed.
#[derive(Debug)]
pub struct BuildReport {
    /// Human-readable build trace.
    pub log: Vec<String>,
    /// The assembled model, `None` when the scenario data defeated the
    /// builder.
    pub model: Option<SeepageModel>,
}

/// The four surveyed corners of the drainage ditch, in the landward frame.
#[derive(Debug, Clone, Copy)]
struct DitchCorners {
    /// Sloot_1d: dikeward bottom corner, leftmost of the four.
    bottom_left: CrosssectionPoint,
    /// Sloot_1c: landward bottom corner.
    bottom_right: CrosssectionPoint,
    /// Sloot_1a: landward top corner.
    top_right: CrosssectionPoint,
    /// Sloot_1b: dikeward top corner.
    top_left: CrosssectionPoint,
}

/// Builds a seepage model from one scenario.
pub struct GeometryBuilder<'a> {
    scenario: &'a Scenario,
    options: &'a BuildOptions,
    settings: &'a GeometrySettings,
    soils: &'a SoilLibrary,
}

impl<'a> GeometryBuilder<'a> {
    /// Create a builder over borrowed inputs. Nothing is mutated; the
    /// builder clones what it needs to rework.
    pub fn new(
        scenario: &'a Scenario,
        options: &'a BuildOptions,
        settings: &'a GeometrySettings,
        soils: &'a SoilLibrary,
    ) -> Self {
        Self {
            scenario,
            options,
            settings,
            soils,
        }
    }

    /// Run the build. Geometry failures land in the report's log with
    /// `model: None`; configuration errors abort with `Err`.
    pub fn build(&self) -> std::result::Result<BuildReport, ConfigError> {
        let mut log = BuildLog::new();
        match self.try_build(&mut log) {
            Ok(model) => Ok(BuildReport {
                log: log.into_lines(),
                model: Some(model),
            }),
            Err(BuildError::Config(e)) => Err(e),
            Err(e) => {
                log.push(format!("ERROR: {e}"));
                log.push(format!(
                    "no model could be created for scenario '{}'",
                    self.scenario.name
                ));
                Ok(BuildReport {
                    log: log.into_lines(),
                    model: None,
                })
            }
        }
    }

    fn try_build(&self, log: &mut BuildLog) -> Result<SeepageModel> {
        self.settings.validate()?;
        self.options.validate()?;

        let scenario = self.scenario;
        log.push(format!(
            "building seepage model for scenario '{}' (ditch {}, soil profile {})",
            scenario.name, scenario.slootnummer, scenario.soilprofile.id
        ));
        log.push(format!(
            "options: k_sand = {} m/day, anisotropy = {} (k_ver = k_hor / factor), sea level rise = {} m",
            self.options.k_sand, self.options.anisotropy_factor, self.options.sea_level_rise
        ));
        log.push(format!(
            "levels: polder = {}, ditch = {} [{} .. {}], norm water level = {}, max zp/wp = {}",
            scenario.gehanteerd_polderpeil,
            scenario.slootpeil,
            scenario.ondergrens_slootpeil,
            scenario.bovengrens_slootpeil,
            scenario.waterstand_bij_norm,
            scenario.max_zp_wp
        ));

        // ditch landmarks and ordering
        let ditch = self.ditch_corners()?;
        log.push(format!(
            "ditch corners: 1d ({:.3}, {:.3}), 1c ({:.3}, {:.3}), 1a ({:.3}, {:.3}), 1b ({:.3}, {:.3})",
            ditch.bottom_left.x,
            ditch.bottom_left.z,
            ditch.bottom_right.x,
            ditch.bottom_right.z,
            ditch.top_right.x,
            ditch.top_right.z,
            ditch.top_left.x,
            ditch.top_left.z
        ));
        if !(ditch.bottom_left.x < ditch.bottom_right.x
            && ditch.bottom_right.x < ditch.top_right.x)
        {
            return Err(BuildError::DegenerateDitch {
                bottom_left: ditch.bottom_left.x,
                bottom_right: ditch.bottom_right.x,
                top_right: ditch.top_right.x,
            });
        }

        // model extent
        let left_limit = scenario.x_intredepunt;
        let right_limit = ditch.top_right.x + self.settings.right_margin;
        log.push(format!(
            "model extent: x = {left_limit:.3} .. {right_limit:.3}"
        ));
        let mut section = scenario.crosssection.clone();
        section.limit_left(left_limit)?;
        section.limit_right(right_limit)?;

        // soil profile, cut at the surveyed surface top
        let mut profile = scenario.soilprofile.clone();
        let surface_top = section.top()?;
        let layers_before = profile.soillayers.len();
        profile.cut_top_at_z(surface_top);
        log.push(format!(
            "soil profile cut at surface top z = {:.3}; {} of {} layers remain",
            surface_top,
            profile.soillayers.len(),
            layers_before
        ));

        let aquifer = profile
            .aquifer()
            .cloned()
            .ok_or(BuildError::NoAquifer(profile.id))?;
        log.push(format!(
            "designated aquifer '{}', top = {:.3}, bottom = {:.3}",
            aquifer.soil_name, aquifer.top, aquifer.bottom
        ));

        // name-based cross-check against the designated aquifer
        let ditch_bottom_z = ditch.bottom_left.z;
        match profile.first_aquifer_below(ditch_bottom_z, &self.settings.aquifer_name_marker) {
            Some(named) if named.soil_name != aquifer.soil_name || named.top != aquifer.top => {
                log.push(format!(
                    "note: first '{}' layer below the ditch bottom is '{}' (top {:.3}), \
                     not the designated aquifer",
                    self.settings.aquifer_name_marker, named.soil_name, named.top
                ));
            }
            None => {
                log.push(format!(
                    "note: no '{}'-named layer below the ditch bottom z = {:.3}",
                    self.settings.aquifer_name_marker, ditch_bottom_z
                ));
            }
            _ => {}
        }

        // pipe start and polder boundary window
        let raised = aquifer.top >= ditch_bottom_z;
        let window_start = ditch.bottom_left.x;
        let (pipe_start, window_end) = if raised {
            let bank_a = Point2::new(ditch.top_left.x, ditch.top_left.z);
            let bank_b = Point2::new(ditch.bottom_left.x, ditch.bottom_left.z);
            let level_a = Point2::new(ditch.top_left.x, aquifer.top);
            let level_b = Point2::new(ditch.bottom_left.x, aquifer.top);
            let start = line_intersection(&bank_a, &bank_b, &level_a, &level_b).ok_or_else(|| {
                BuildError::BankIntersection(format!(
                    "bank ({:.3}, {:.3}) .. ({:.3}, {:.3}) is parallel to the aquifer top z = {:.3}",
                    bank_a.x, bank_a.y, bank_b.x, bank_b.y, aquifer.top
                ))
            })?;
            log.push(format!(
                "aquifer top z = {:.3} at or above ditch bottom z = {:.3}: \
                 ditch bottom raised to the aquifer top",
                aquifer.top, ditch_bottom_z
            ));
            if start.x < ditch.top_left.x - 1e-9 || start.x > ditch.bottom_left.x + 1e-9 {
                log.push(format!(
                    "warning: bank/aquifer intersection x = {:.3} lies outside the bank segment \
                     [{:.3} .. {:.3}]",
                    start.x, ditch.top_left.x, ditch.bottom_left.x
                ));
            }
            log.push(format!(
                "pipe starts on the ditch bank at ({:.3}, {:.3})",
                start.x, start.y
            ));
            let end = (window_start + self.settings.polder_boundary_width)
                .min(ditch.bottom_right.x);
            (start, end)
        } else {
            let start = Point2::new(ditch.bottom_left.x, aquifer.top);
            log.push(format!(
                "aquifer top z = {:.3} below ditch bottom z = {:.3}: \
                 pipe starts under the ditch at ({:.3}, {:.3})",
                aquifer.top, ditch_bottom_z, start.x, start.y
            ));
            let end = window_start + self.settings.polder_boundary_width;
            (start, end)
        };
        log.push(format!(
            "polder boundary window: x = {window_start:.3} .. {window_end:.3} at z = {:.3}",
            aquifer.top
        ));

        // surface envelope
        let surface = self.surface_polyline(&section, raised, aquifer.top, &pipe_start);
        let profile_bottom = profile.bottom()?;
        let envelope = envelope_ring(&surface, profile_bottom);
        log.push(format!(
            "surface envelope: {} points, bottom z = {profile_bottom:.3}",
            surface.len()
        ));

        let mut model = SeepageModel::new(scenario.name.clone());

        // the aquifer gets its own soil entry at the calibrated sand values
        model.add_soil_type(SoilType {
            code: AQUIFER_SOIL_CODE.to_string(),
            k_hor: self.options.k_sand,
            k_ver: self.options.k_sand_vertical(),
            color: AQUIFER_COLOR.to_string(),
        });
        log.push(format!(
            "aquifer soil '{}': k_hor = {} m/day, k_ver = {} m/day, assigned to '{}'",
            AQUIFER_SOIL_CODE,
            self.options.k_sand,
            self.options.k_sand_vertical(),
            aquifer.soil_name
        ));

        // soil polygons, top layer first
        let mut aquifer_seen = false;
        let mut polygon_count = 0usize;
        for (idx, layer) in profile.soillayers.iter().enumerate() {
            let code = layer.short_name();
            let params = self.soils.get(code)?;
            if !model.has_soil_type(code) {
                let (k_hor, k_ver) = if self.soils.is_sand(code) {
                    (self.options.k_sand, self.options.k_sand_vertical())
                } else {
                    (params.k_hor, params.k_ver)
                };
                if self.soils.is_sand(code) {
                    log.push(format!(
                        "sand conductivity override for '{code}': k_hor = {k_hor}, k_ver = {k_ver}"
                    ));
                }
                model.add_soil_type(SoilType {
                    code: code.to_string(),
                    k_hor,
                    k_ver,
                    color: params.color.clone(),
                });
            }

            let is_designated = !aquifer_seen && layer.is_aquifer == profile.aquifer_number;
            if is_designated {
                aquifer_seen = true;
            }
            let assigned = if is_designated { AQUIFER_SOIL_CODE } else { code };

            let rect = rect_ring(left_limit, right_limit, layer.bottom, layer.top);
            let outcome = clip(&rect, &envelope);
            match &outcome {
                ClipOutcome::Empty => {
                    log.push(format!(
                        "layer {} '{}' [{:.3} .. {:.3}] lies outside the model area; skipped",
                        idx + 1,
                        layer.soil_name,
                        layer.top,
                        layer.bottom
                    ));
                    continue;
                }
                ClipOutcome::Multiple(parts) => {
                    log.push(format!(
                        "layer {} '{}' split into {} parts by the surface",
                        idx + 1,
                        layer.soil_name,
                        parts.len()
                    ));
                }
                ClipOutcome::Single(_) => {}
            }

            let pieces = outcome.into_rings();
            let piece_count = pieces.len();
            for (part, mut ring) in pieces.into_iter().enumerate() {
                ring.make_clockwise();
                ring.start_at_top_left();
                ring.insert_vertices_at_x(window_start);
                ring.insert_vertices_at_x(window_end);
                ring.dedup_mm();
                if ring.len() < 3 {
                    log.push(format!(
                        "degenerate piece of layer '{}' discarded",
                        layer.soil_name
                    ));
                    continue;
                }
                let label = if piece_count == 1 {
                    format!("{}_{}", code, idx + 1)
                } else {
                    format!("{}_{}_{}", code, idx + 1, part + 1)
                };
                model.add_layer(ModelLayer {
                    label,
                    soil_code: assigned.to_string(),
                    ring: ring
                        .points
                        .iter()
                        .map(|p| ModelPoint::new(p.x, p.y))
                        .collect(),
                });
                polygon_count += 1;
            }
        }
        log.push(format!(
            "soil geometry: {} polygons from {} layers",
            polygon_count,
            profile.soillayers.len()
        ));

        // boundary conditions
        let head_zs = profile
            .entry_head_z_coordinates()
            .ok_or(BuildError::NoAquifer(profile.id))?;

        let entry_head = scenario.sth_intredepunt + self.options.sea_level_rise;
        model.add_boundary_condition(BoundaryCondition {
            label: "phi_ws".to_string(),
            head: entry_head,
            points: head_zs
                .iter()
                .map(|z| ModelPoint::new(left_limit, *z))
                .collect(),
        });
        log.push(format!(
            "entry head phi_ws = {:.3} m (measured {} + sea level rise {}) \
             at x = {:.3}, z = {:.3} .. {:.3}",
            entry_head,
            scenario.sth_intredepunt,
            self.options.sea_level_rise,
            left_limit,
            head_zs.first().copied().unwrap_or(profile_bottom),
            head_zs.last().copied().unwrap_or(aquifer.top)
        ));

        if scenario.x_intredepunt <= 0.0 || scenario.x_uittredepunt <= 0.0 {
            return Err(BuildError::NonPositiveFitSample {
                x_entry: scenario.x_intredepunt,
                x_exit: scenario.x_uittredepunt,
            });
        }
        let fit = fit_log_linear(
            [scenario.x_intredepunt, scenario.x_uittredepunt],
            [scenario.sth_intredepunt, scenario.sth_uittredepunt],
        )
        .ok_or_else(|| {
            BuildError::HeadFit(format!(
                "cannot fit through x = {} and x = {}",
                scenario.x_intredepunt, scenario.x_uittredepunt
            ))
        })?;
        let rear_fitted = fit.eval(right_limit).ok_or_else(|| {
            BuildError::HeadFit(format!("cannot evaluate the fit at x = {right_limit}"))
        })?;
        let rear_head = rear_fitted + self.options.sea_level_rise;
        log.push(format!(
            "head fit: phi(x) = {:.4} * ln(x) + {:.4} through ({}, {}) and ({}, {})",
            fit.slope,
            fit.intercept,
            scenario.x_intredepunt,
            scenario.sth_intredepunt,
            scenario.x_uittredepunt,
            scenario.sth_uittredepunt
        ));
        log.push(format!(
            "rear head phi_hinter = {rear_head:.3} m at x = {right_limit:.3}"
        ));
        model.add_boundary_condition(BoundaryCondition {
            label: "phi_hinter".to_string(),
            head: rear_head,
            points: head_zs
                .iter()
                .rev()
                .map(|z| ModelPoint::new(right_limit, *z))
                .collect(),
        });

        // polder level over the boundary window, with the 0.3d correction
        let cover_depth = ditch_bottom_z - aquifer.top;
        let polder_head = if self.options.apply_03d_rule && cover_depth > 0.0 {
            let correction = 0.3 * cover_depth;
            log.push(format!(
                "0.3d rule: ditch cuts {cover_depth:.3} m into the covering layers, \
                 polder head raised by {correction:.3} m"
            ));
            scenario.gehanteerd_polderpeil + correction
        } else {
            if self.options.apply_03d_rule {
                log.push(format!(
                    "0.3d rule not applied: ditch bottom z = {ditch_bottom_z:.3} \
                     at or below the aquifer top z = {:.3}",
                    aquifer.top
                ));
            } else {
                log.push("0.3d rule disabled".to_string());
            }
            scenario.gehanteerd_polderpeil
        };
        model.add_boundary_condition(BoundaryCondition {
            label: "polder level".to_string(),
            head: polder_head,
            points: vec![
                ModelPoint::new(window_start, aquifer.top),
                ModelPoint::new(window_end, aquifer.top),
            ],
        });
        log.push(format!("polder head = {polder_head:.3} m on the boundary window"));

        if self.options.use_surface_boundary {
            let x0 = ditch.top_right.x + self.settings.ditch_boundary_offset;
            if x0 < right_limit {
                model.add_boundary_condition(BoundaryCondition {
                    label: "surface level".to_string(),
                    head: scenario.gehanteerd_polderpeil,
                    points: vec![
                        ModelPoint::new(x0, ditch.top_right.z),
                        ModelPoint::new(right_limit, ditch.top_right.z),
                    ],
                });
                log.push(format!(
                    "surface boundary head = {} m from x = {x0:.3} to {right_limit:.3} \
                     at z = {:.3} (assumes level ground landward of the ditch)",
                    scenario.gehanteerd_polderpeil, ditch.top_right.z
                ));
            } else {
                log.push(format!(
                    "surface boundary skipped: start x = {x0:.3} beyond the model limit"
                ));
            }
        }

        // pipe, mesh, calculation
        model.set_pipe_trajectory(PipeTrajectory {
            start: ModelPoint::new(pipe_start.x, pipe_start.y),
            end: ModelPoint::new(left_limit, aquifer.top),
            d70_um: self.settings.d70_um,
            direction: PipeDirection::RightToLeft,
            element_size: self.settings.pipe_mesh_size,
        });
        log.push(format!(
            "pipe trajectory: ({:.3}, {:.3}) -> ({:.3}, {:.3}), d70 = {} um, element size {} m",
            pipe_start.x,
            pipe_start.y,
            left_limit,
            aquifer.top,
            self.settings.d70_um,
            self.settings.pipe_mesh_size
        ));
        model.set_mesh_properties(MeshProperties {
            min_element_size: self.settings.min_mesh_size,
        });
        model.set_calculation_mode(CalculationMode::PipeLength);

        model.validate()?;
        log.push(format!(
            "model complete: {} soil types, {} layers, {} boundary conditions",
            model.soil_types.len(),
            model.layers.len(),
            model.boundary_conditions.len()
        ));
        Ok(model)
    }

    /// Look up the four ditch corner landmarks on the scenario's
    /// cross-section.
    fn ditch_corners(&self) -> Result<DitchCorners> {
        let find = |t: CrosssectionPointType| -> Result<CrosssectionPoint> {
            self.scenario
                .crosssection
                .point_of_type(t)
                .copied()
                .ok_or(BuildError::MissingPoint(t))
        };
        Ok(DitchCorners {
            bottom_left: find(CrosssectionPointType::Sloot1D)?,
            bottom_right: find(CrosssectionPointType::Sloot1C)?,
            top_right: find(CrosssectionPointType::Sloot1A)?,
            top_left: find(CrosssectionPointType::Sloot1B)?,
        })
    }

    /// The truncated surface as a polyline, with the ditch bottom raised to
    /// the aquifer top when the aquifer outcrops in the ditch. The raised
    /// bank gets a vertex exactly at the pipe start so the trajectory lies
    /// on the geometry.
    fn surface_polyline(
        &self,
        section: &Crosssection,
        raised: bool,
        aquifer_top: f64,
        pipe_start: &Point2,
    ) -> Vec<Point2> {
        let mut surface = Vec::with_capacity(section.points.len() + 1);
        for p in &section.points {
            match p.point_type {
                CrosssectionPointType::Sloot1D if raised => {
                    if to_mm(pipe_start.x) != to_mm(p.x) {
                        surface.push(*pipe_start);
                    }
                    surface.push(Point2::new(p.x, aquifer_top));
                }
                CrosssectionPointType::Sloot1C if raised => {
                    surface.push(Point2::new(p.x, aquifer_top));
                }
                _ => surface.push(Point2::new(p.x, p.z)),
            }
        }
        surface
    }
}

/// Build a seepage model for one scenario.
///
/// Convenience entry point over [`GeometryBuilder`].
pub fn build_model(
    scenario: &Scenario,
    options: &BuildOptions,
    settings: &GeometrySettings,
    soils: &SoilLibrary,
) -> std::result::Result<BuildReport, ConfigError> {
    GeometryBuilder::new(scenario, options, settings, soils).build()
}

/// Scenario-side entry point: each scenario can turn itself into a solver
/// model given the run configuration.
pub trait ToModel {
    /// Build the seepage model for this scenario. Same contract as
    /// [`build_model`].
    fn to_model(
        &self,
        options: &BuildOptions,
        settings: &GeometrySettings,
        soils: &SoilLibrary,
    ) -> std::result::Result<BuildReport, ConfigError>;
}

impl ToModel for Scenario {
    fn to_model(
        &self,
        options: &BuildOptions,
        settings: &GeometrySettings,
        soils: &SoilLibrary,
    ) -> std::result::Result<BuildReport, ConfigError> {
        build_model(self, options, settings, soils)
    }
}

// ====== tests ======

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dijkflow_profile::{SoilLayer, SoilProfile};

    type Pt = CrosssectionPointType;

    fn section() -> Crosssection {
        Crosssection::new(vec![
            CrosssectionPoint::new(0.0, 1.0, Pt::MvBuiten),
            CrosssectionPoint::new(4.0, 5.0, Pt::Kruin1),
            CrosssectionPoint::new(6.0, 5.0, Pt::Kruin2),
            CrosssectionPoint::new(8.0, 1.0, Pt::Sloot1B),
            CrosssectionPoint::new(10.0, -2.0, Pt::Sloot1D),
            CrosssectionPoint::new(13.0, -2.0, Pt::Sloot1C),
            CrosssectionPoint::new(20.0, 1.0, Pt::Sloot1A),
            CrosssectionPoint::new(80.0, 1.0, Pt::MvBinnen),
        ])
    }

    fn profile(aquifer_top: f64) -> SoilProfile {
        SoilProfile::new(
            11,
            vec![
                SoilLayer::new("Kla_zware klei", 5.0, aquifer_top, 0).unwrap(),
                SoilLayer::new("ZA_zand matig grof", aquifer_top, -6.0, 1).unwrap(),
                SoilLayer::new("CK_kleiig", -6.0, -10.0, 0).unwrap(),
            ],
            1,
        )
    }

    fn scenario(aquifer_top: f64) -> Scenario {
        Scenario {
            name: "S_001".to_string(),
            crosssection: section(),
            soilprofile: profile(aquifer_top),
            slootnummer: "SL-7".to_string(),
            max_zp_wp: 1.5,
            gehanteerd_polderpeil: -0.5,
            bovengrens_slootpeil: -0.8,
            ondergrens_slootpeil: -1.0,
            slootpeil: -0.9,
            waterstand_bij_norm: 3.2,
            x_intredepunt: 2.0,
            x_uittredepunt: 14.0,
            sth_intredepunt: 2.5,
            sth_uittredepunt: 1.0,
        }
    }

    fn build(s: &Scenario) -> BuildReport {
        let options = BuildOptions::default();
        let settings = GeometrySettings::default();
        let soils = SoilLibrary::default();
        build_model(s, &options, &settings, &soils).expect("configuration is valid")
    }

    fn bc<'m>(model: &'m SeepageModel, label: &str) -> &'m BoundaryCondition {
        model
            .boundary_conditions
            .iter()
            .find(|b| b.label == label)
            .unwrap_or_else(|| panic!("missing boundary condition '{label}'"))
    }

    #[test]
    fn test_raised_ditch_worked_example() {
        // aquifer top at -1 is above the ditch bottom at -2
        let report = build(&scenario(-1.0));
        assert!(!report.log.is_empty());
        let model = report.model.expect("well-formed scenario builds");

        // polder window: starts at Sloot_1d x, capped a meter further
        let polder = bc(&model, "polder level");
        assert_eq!(polder.points.len(), 2);
        assert_relative_eq!(polder.points[0].x, 10.0);
        assert_relative_eq!(polder.points[1].x, 11.0);
        assert_relative_eq!(polder.points[0].z, -1.0);

        // ditch cuts 0 m below the aquifer top, so no 0.3d correction
        assert_relative_eq!(polder.head, -0.5);

        // pipe starts where the bank crosses the aquifer top and ends at
        // the entry point
        let pipe = model.pipe.as_ref().expect("pipe set");
        assert_relative_eq!(pipe.start.x, 8.0 + 2.0 / 3.0 * 2.0, epsilon = 1e-9);
        assert_relative_eq!(pipe.start.z, -1.0);
        assert_relative_eq!(pipe.end.x, 2.0);
        assert_relative_eq!(pipe.end.z, -1.0);
        assert_eq!(pipe.direction, PipeDirection::RightToLeft);

        // the raised ditch bottom pinches the clay layer in two
        let clay_parts = model
            .layers
            .iter()
            .filter(|l| l.soil_code == "Kla")
            .count();
        assert_eq!(clay_parts, 2);
        assert_eq!(model.layers.len(), 4);

        // three distinct layer codes plus the dedicated aquifer entry
        assert_eq!(model.soil_types.len(), 4);
        assert!(model.has_soil_type("aquifer"));
        let aquifer_polys: Vec<_> = model
            .layers
            .iter()
            .filter(|l| l.soil_code == "aquifer")
            .collect();
        assert_eq!(aquifer_polys.len(), 1);

        assert!(report
            .log
            .iter()
            .any(|l| l.contains("ditch bottom raised to the aquifer top")));
    }

    #[test]
    fn test_deep_aquifer_branch() {
        // aquifer top at -3 is below the ditch bottom at -2
        let report = build(&scenario(-3.0));
        let model = report.model.expect("well-formed scenario builds");

        // pipe starts directly under the ditch corner
        let pipe = model.pipe.as_ref().expect("pipe set");
        assert_relative_eq!(pipe.start.x, 10.0);
        assert_relative_eq!(pipe.start.z, -3.0);

        // window is not capped by the far ditch corner in this branch
        let polder = bc(&model, "polder level");
        assert_relative_eq!(polder.points[0].x, 10.0);
        assert_relative_eq!(polder.points[1].x, 11.0);
        assert_relative_eq!(polder.points[0].z, -3.0);

        // ditch cuts one meter into the cover: 0.3d raises the polder head
        assert_relative_eq!(polder.head, -0.5 + 0.3);

        // no split this time: one polygon per input layer
        assert_eq!(model.layers.len(), model.soil_types.len() - 1);
        assert_eq!(model.layers.len(), 3);
    }

    #[test]
    fn test_boundary_heads_and_lines() {
        let report = build(&scenario(-1.0));
        let model = report.model.expect("build");

        // entry head over ascending boundary elevations up to the aquifer top
        let entry = bc(&model, "phi_ws");
        assert_relative_eq!(entry.head, 2.5);
        let zs: Vec<f64> = entry.points.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![-10.0, -6.0, -1.0]);
        assert!(entry.points.iter().all(|p| p.x == 2.0));

        // rear head comes from the log-linear fit at the right limit
        let rear = bc(&model, "phi_hinter");
        let fit = fit_log_linear([2.0, 14.0], [2.5, 1.0]).expect("fit");
        assert_relative_eq!(rear.head, fit.eval(60.0).expect("eval"), epsilon = 1e-12);
        let rear_zs: Vec<f64> = rear.points.iter().map(|p| p.z).collect();
        assert_eq!(rear_zs, vec![-1.0, -6.0, -10.0]);
        assert!(rear.points.iter().all(|p| p.x == 60.0));

        // surface boundary starts one offset landward of the ditch top
        let surface = bc(&model, "surface level");
        assert_relative_eq!(surface.head, -0.5);
        assert_relative_eq!(surface.points[0].x, 21.0);
        assert_relative_eq!(surface.points[1].x, 60.0);
        assert_relative_eq!(surface.points[0].z, 1.0);
        assert_eq!(model.boundary_conditions.len(), 4);
    }

    #[test]
    fn test_sand_override_and_anisotropy() {
        let report = build(&scenario(-3.0));
        let model = report.model.expect("build");
        let aquifer = model
            .soil_types
            .iter()
            .find(|s| s.code == "aquifer")
            .expect("aquifer soil");
        assert_relative_eq!(aquifer.k_hor, 6.0);
        assert_relative_eq!(aquifer.k_ver, 3.0);
        // ZA is a sand code: its own entry is overridden too
        let za = model
            .soil_types
            .iter()
            .find(|s| s.code == "ZA")
            .expect("ZA soil");
        assert_relative_eq!(za.k_hor, 6.0);
        assert_relative_eq!(za.k_ver, 3.0);
        // clay keeps its table conductivity
        let kla = model
            .soil_types
            .iter()
            .find(|s| s.code == "Kla")
            .expect("Kla soil");
        assert_relative_eq!(kla.k_hor, 0.01);
    }

    #[test]
    fn test_surface_boundary_toggle() {
        let s = scenario(-1.0);
        let options = BuildOptions {
            use_surface_boundary: false,
            ..BuildOptions::default()
        };
        let settings = GeometrySettings::default();
        let soils = SoilLibrary::default();
        let report = build_model(&s, &options, &settings, &soils).expect("valid config");
        let model = report.model.expect("build");
        assert_eq!(model.boundary_conditions.len(), 3);
        assert!(model
            .boundary_conditions
            .iter()
            .all(|b| b.label != "surface level"));
    }

    #[test]
    fn test_sea_level_rise_shifts_river_heads() {
        let s = scenario(-1.0);
        let options = BuildOptions {
            sea_level_rise: 0.5,
            ..BuildOptions::default()
        };
        let settings = GeometrySettings::default();
        let soils = SoilLibrary::default();
        let report = build_model(&s, &options, &settings, &soils).expect("valid config");
        let model = report.model.expect("build");
        assert_relative_eq!(bc(&model, "phi_ws").head, 3.0);
        let fit = fit_log_linear([2.0, 14.0], [2.5, 1.0]).expect("fit");
        assert_relative_eq!(
            bc(&model, "phi_hinter").head,
            fit.eval(60.0).expect("eval") + 0.5,
            epsilon = 1e-12
        );
        // the polder level is a land-side head and is not shifted
        assert_relative_eq!(bc(&model, "polder level").head, -0.5);
    }

    #[test]
    fn test_degenerate_ditch_is_reported_not_raised() {
        let mut s = scenario(-1.0);
        // swap the ditch bottom corners so 1c is left of 1d
        for p in &mut s.crosssection.points {
            match p.point_type {
                Pt::Sloot1D => p.x = 13.0,
                Pt::Sloot1C => p.x = 10.0,
                _ => {}
            }
        }
        let report = build(&s);
        assert!(report.model.is_none());
        assert!(report
            .log
            .iter()
            .any(|l| l.contains("degenerate ditch") && l.contains("13") && l.contains("10")));
    }

    #[test]
    fn test_missing_landmark_is_reported() {
        let mut s = scenario(-1.0);
        s.crosssection
            .points
            .retain(|p| p.point_type != Pt::Sloot1A);
        let report = build(&s);
        assert!(report.model.is_none());
        assert!(report.log.iter().any(|l| l.contains("Sloot_1a")));
    }

    #[test]
    fn test_missing_aquifer_is_reported() {
        let mut s = scenario(-1.0);
        for l in &mut s.soilprofile.soillayers {
            l.is_aquifer = 0;
        }
        let report = build(&s);
        assert!(report.model.is_none());
        assert!(report.log.iter().any(|l| l.contains("no designated aquifer")));
    }

    #[test]
    fn test_unknown_soil_code_is_fatal() {
        let mut s = scenario(-1.0);
        s.soilprofile.soillayers[0].soil_name = "XX_onbekend".to_string();
        let options = BuildOptions::default();
        let settings = GeometrySettings::default();
        let soils = SoilLibrary::default();
        let err = build_model(&s, &options, &settings, &soils).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSoil(code) if code == "XX"));
    }

    #[test]
    fn test_non_positive_entry_x_is_reported() {
        let mut s = scenario(-1.0);
        s.x_uittredepunt = -14.0;
        let report = build(&s);
        assert!(report.model.is_none());
        assert!(report.log.iter().any(|l| l.contains("positive")));
    }

    #[test]
    fn test_build_is_deterministic() {
        let s = scenario(-1.0);
        let a = build(&s).model.expect("build");
        let b = build(&s).model.expect("build");
        assert_eq!(a.to_json().expect("json"), b.to_json().expect("json"));
    }

    #[test]
    fn test_scenario_to_model_matches_free_function() {
        let s = scenario(-1.0);
        let options = BuildOptions::default();
        let settings = GeometrySettings::default();
        let soils = SoilLibrary::default();
        let via_trait = s
            .to_model(&options, &settings, &soils)
            .expect("valid config")
            .model
            .expect("build");
        let via_fn = build_model(&s, &options, &settings, &soils)
            .expect("valid config")
            .model
            .expect("build");
        assert_eq!(
            via_trait.to_json().expect("json"),
            via_fn.to_json().expect("json")
        );
    }

    #[test]
    fn test_polder_window_vertices_exist_in_rings() {
        // the injected window vertices must appear in every polygon edge
        // that spans them, so boundary conditions land on mesh nodes
        let report = build(&scenario(-3.0));
        let model = report.model.expect("build");
        let aquifer_layer = model
            .layers
            .iter()
            .find(|l| l.soil_code == "aquifer")
            .expect("aquifer polygon");
        let on_start = aquifer_layer
            .ring
            .iter()
            .any(|p| (p.x - 10.0).abs() < 1e-9 && (p.z + 3.0).abs() < 1e-9);
        let on_end = aquifer_layer
            .ring
            .iter()
            .any(|p| (p.x - 11.0).abs() < 1e-9 && (p.z + 3.0).abs() < 1e-9);
        assert!(on_start, "pipe start vertex missing from the aquifer ring");
        assert!(on_end, "window end vertex missing from the aquifer ring");
    }

    #[test]
    fn test_rings_are_clockwise_from_top_left() {
        let report = build(&scenario(-3.0));
        let model = report.model.expect("build");
        for layer in &model.layers {
            let ring = crate::ring::Ring::new(
                layer
                    .ring
                    .iter()
                    .map(|p| Point2::new(p.x, p.z))
                    .collect(),
            );
            assert!(ring.is_clockwise(), "layer '{}' not clockwise", layer.label);
            let top = layer
                .ring
                .iter()
                .map(|p| to_mm(p.z))
                .max()
                .expect("non-empty ring");
            assert_eq!(
                to_mm(layer.ring[0].z),
                top,
                "layer '{}' does not start at its top",
                layer.label
            );
        }
    }
}
