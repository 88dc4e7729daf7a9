//! Seepage-model geometry construction.
//!
//! This crate turns one assessment scenario (a surveyed dike cross-section
//! plus a borehole soil profile) into a solver-ready
//! [`SeepageModel`](dijkflow_model::SeepageModel): soil polygons clipped
//! against the surface, hydraulic boundary conditions, and the erosion pipe
//! trajectory along the aquifer top.
//!
//! ```
//! use dijkflow_build::{build_model, BuildOptions, GeometrySettings, SoilLibrary};
//! use dijkflow_profile::{
//!     Crosssection, CrosssectionPoint, CrosssectionPointType as Pt, Scenario, SoilLayer,
//!     SoilProfile,
//! };
//!
//! let crosssection = Crosssection::new(vec![
//!     CrosssectionPoint::new(0.0, 1.0, Pt::MvBuiten),
//!     CrosssectionPoint::new(4.0, 5.0, Pt::Kruin1),
//!     CrosssectionPoint::new(6.0, 5.0, Pt::Kruin2),
//!     CrosssectionPoint::new(8.0, 1.0, Pt::Sloot1B),
//!     CrosssectionPoint::new(10.0, -2.0, Pt::Sloot1D),
//!     CrosssectionPoint::new(13.0, -2.0, Pt::Sloot1C),
//!     CrosssectionPoint::new(20.0, 1.0, Pt::Sloot1A),
//!     CrosssectionPoint::new(80.0, 1.0, Pt::MvBinnen),
//! ]);
//! let soilprofile = SoilProfile::new(
//!     1,
//!     vec![
//!         SoilLayer::new("Kla_klei", 5.0, -3.0, 0)?,
//!         SoilLayer::new("ZA_zand", -3.0, -10.0, 1)?,
//!     ],
//!     1,
//! );
//! let scenario = Scenario {
//!     name: "example".to_string(),
//!     crosssection,
//!     soilprofile,
//!     slootnummer: "SL-1".to_string(),
//!     max_zp_wp: 1.5,
//!     gehanteerd_polderpeil: -0.5,
//!     bovengrens_slootpeil: -0.8,
//!     ondergrens_slootpeil: -1.0,
//!     slootpeil: -0.9,
//!     waterstand_bij_norm: 3.2,
//!     x_intredepunt: 2.0,
//!     x_uittredepunt: 14.0,
//!     sth_intredepunt: 2.5,
//!     sth_uittredepunt: 1.0,
//! };
//!
//! let report = build_model(
//!     &scenario,
//!     &BuildOptions::default(),
//!     &GeometrySettings::default(),
//!     &SoilLibrary::default(),
//! )?;
//! let model = report.model.expect("scenario is well-formed");
//! assert!(model.pipe.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod clip;
pub mod error;
pub mod log;
pub mod ring;
pub mod settings;
pub mod soils;

pub use builder::{build_model, BuildReport, GeometryBuilder, ToModel};
pub use clip::{clip, envelope_ring, rect_ring, ClipOutcome};
pub use error::{BuildError, ConfigError, Result};
pub use log::BuildLog;
pub use ring::Ring;
pub use settings::{BuildOptions, GeometrySettings};
pub use soils::{SoilLibrary, SoilParameters, AQUIFER_SOIL_CODE};
