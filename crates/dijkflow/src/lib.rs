#![warn(missing_docs)]

//! dijkflow — seepage model input generation for dike safety assessments
//!
//! Turns surveyed dike cross-sections and borehole soil profiles into
//! solver-ready 2D seepage models for piping (backward erosion)
//! assessment: soil polygons, hydraulic boundary conditions and the
//! erosion pipe trajectory, serialized as JSON for an external
//! finite-element solver.
//!
//! # Example
//!
//! ```rust,no_run
//! use dijkflow::{BuildOptions, GeometrySettings, InputSet, SoilLibrary, ToModel};
//!
//! let set = InputSet::read("input.json")?;
//! let settings = GeometrySettings::default();
//! let options = BuildOptions::default();
//! let soils = SoilLibrary::default();
//!
//! let (scenarios, errors) = set.scenarios(&settings);
//! for e in &errors {
//!     eprintln!("skipped: {e}");
//! }
//! for scenario in &scenarios {
//!     let report = scenario.to_model(&options, &settings, &soils)?;
//!     if let Some(model) = report.model {
//!         model.write(format!("{}.json", scenario.name))?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod input;

pub use input::{
    InputError, InputSet, ScenarioRecord, SoilLayerRecord, SoilProfileRecord, SurveyPointRecord,
};

pub use dijkflow_build::{
    build_model, BuildError, BuildOptions, BuildReport, ConfigError, GeometryBuilder,
    GeometrySettings, SoilLibrary, SoilParameters, ToModel,
};
pub use dijkflow_model::{
    BoundaryCondition, CalculationMode, MeshProperties, ModelError, ModelLayer, ModelPoint,
    PipeDirection, PipeTrajectory, SeepageModel, SoilType, SolverOutput,
};
pub use dijkflow_profile::{
    Crosssection, CrosssectionPoint, CrosssectionPointType, ProfileError, Scenario, SoilLayer,
    SoilProfile,
};

/// Geometry primitives and the millimeter tolerance model.
pub use dijkflow_math as math;
