#![warn(missing_docs)]

//! Survey and borehole data model for dike seepage assessments.
//!
//! This crate holds the three input shapes of the pipeline: surveyed
//! [`Crosssection`] polylines keyed by dike landmarks, borehole
//! [`SoilProfile`] layer stacks, and the [`Scenario`] that pairs them with
//! hydraulic boundary values. All geometry lives in a vertical x-z plane
//! with x increasing landward.
//!
//! # Example
//!
//! ```
//! use dijkflow_profile::{Crosssection, CrosssectionPoint, CrosssectionPointType};
//!
//! let mut cs = Crosssection::new(vec![
//!     CrosssectionPoint::new(-20.0, 1.0, CrosssectionPointType::MvBinnen),
//!     CrosssectionPoint::new(-4.0, 5.0, CrosssectionPointType::Kruin1),
//!     CrosssectionPoint::new(8.0, 0.5, CrosssectionPointType::MvBuiten),
//! ]);
//! cs.mirror();
//! assert_eq!(cs.points[0].point_type, CrosssectionPointType::MvBuiten);
//! assert_eq!(cs.left().unwrap(), -8.0);
//! ```

pub mod crosssection;
pub mod error;
pub mod scenario;
pub mod soil;

pub use crosssection::{Crosssection, CrosssectionPoint, CrosssectionPointType};
pub use error::{ProfileError, Result};
pub use scenario::Scenario;
pub use soil::{SoilLayer, SoilProfile};
