//! Surveyed cross-section geometry.
//!
//! A cross-section is an ordered polyline of surveyed points in the x-z
//! plane, each tagged with the landmark it was measured at (dike crest,
//! berm, ditch corner, ...). Survey data arrives in the seaward frame;
//! [`Crosssection::mirror`] flips it so that x increases landward, which is
//! the frame every downstream operation assumes.

use serde::{Deserialize, Serialize};

use dijkflow_math::interpolate_z;

use crate::error::{ProfileError, Result};

/// The characteristic landmarks a surveyed dike profile is keyed by.
///
/// `Sloot` points describe the landward drainage ditch: `1A` is the far
/// (landward) top, `1B` the near top, `1C` the far bottom and `1D` the near
/// bottom. After mirroring, `1D` is the leftmost of the four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrosssectionPointType {
    /// Sentinel for points that carry no landmark.
    None,
    /// Surface level on the inward (landward) side.
    MvBinnen,
    /// Ditch 1, landward top.
    Sloot1A,
    /// Ditch 1, landward bottom.
    Sloot1C,
    /// Ditch 1, dikeward bottom.
    Sloot1D,
    /// Ditch 1, dikeward top.
    Sloot1B,
    /// Road 1.
    Weg1,
    /// Dike toe 1.
    Teen1,
    /// Berm 1, start.
    Berm1A,
    /// Berm 1, end.
    Berm1B,
    /// Dike crest 1.
    Kruin1,
    /// Dike crest 2.
    Kruin2,
    /// Berm 2, start.
    Berm2A,
    /// Berm 2, end.
    Berm2B,
    /// Dike toe 2.
    Teen2,
    /// Road 2.
    Weg2,
    /// Ditch 2.
    Sloot2,
    /// Surface level on the outward (seaward) side.
    MvBuiten,
}

impl CrosssectionPointType {
    /// The seventeen landmarks in survey (column) order, inward to outward.
    pub const SURVEY_ORDER: [CrosssectionPointType; 17] = [
        CrosssectionPointType::MvBinnen,
        CrosssectionPointType::Sloot1A,
        CrosssectionPointType::Sloot1C,
        CrosssectionPointType::Sloot1D,
        CrosssectionPointType::Sloot1B,
        CrosssectionPointType::Weg1,
        CrosssectionPointType::Teen1,
        CrosssectionPointType::Berm1A,
        CrosssectionPointType::Berm1B,
        CrosssectionPointType::Kruin1,
        CrosssectionPointType::Kruin2,
        CrosssectionPointType::Berm2A,
        CrosssectionPointType::Berm2B,
        CrosssectionPointType::Teen2,
        CrosssectionPointType::Weg2,
        CrosssectionPointType::Sloot2,
        CrosssectionPointType::MvBuiten,
    ];

    /// The survey label this landmark is keyed by in upstream data.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::MvBinnen => "MV_bin",
            Self::Sloot1A => "Sloot_1a",
            Self::Sloot1C => "Sloot_1c",
            Self::Sloot1D => "Sloot_1d",
            Self::Sloot1B => "Sloot_1b",
            Self::Weg1 => "Weg_1",
            Self::Teen1 => "Teen_1",
            Self::Berm1A => "Berm_1a",
            Self::Berm1B => "Berm_1b",
            Self::Kruin1 => "Kruin_1",
            Self::Kruin2 => "Kruin_2",
            Self::Berm2A => "Berm_2a",
            Self::Berm2B => "Berm_2b",
            Self::Teen2 => "Teen_2",
            Self::Weg2 => "Weg_2",
            Self::Sloot2 => "Sloot_2",
            Self::MvBuiten => "MV_bui",
        }
    }

    /// Parses a survey label. Fails on anything outside the vocabulary.
    pub fn from_label(label: &str) -> Result<Self> {
        Self::SURVEY_ORDER
            .iter()
            .copied()
            .find(|t| t.label() == label)
            .ok_or_else(|| ProfileError::UnknownLabel(label.to_string()))
    }

    /// Position of this landmark in survey order, `None` for the sentinel.
    pub fn survey_rank(&self) -> Option<usize> {
        Self::SURVEY_ORDER.iter().position(|t| t == self)
    }
}

impl std::fmt::Display for CrosssectionPointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single surveyed point in the cross-section plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosssectionPoint {
    /// Horizontal position (m), increasing landward after mirroring.
    pub x: f64,
    /// Elevation (m).
    pub z: f64,
    /// Landmark this point was surveyed at.
    pub point_type: CrosssectionPointType,
}

impl CrosssectionPoint {
    /// Creates a surveyed point.
    pub fn new(x: f64, z: f64, point_type: CrosssectionPointType) -> Self {
        Self { x, z, point_type }
    }
}

/// An ordered surveyed cross-section polyline.
///
/// Points are assumed ordered by increasing x. The truncation operations
/// walk segment pairs under that assumption; feeding them an unordered
/// polyline produces wrong geometry, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Crosssection {
    /// The surveyed points, left to right.
    pub points: Vec<CrosssectionPoint>,
}

impl Crosssection {
    /// Creates a cross-section from ordered points.
    pub fn new(points: Vec<CrosssectionPoint>) -> Self {
        Self { points }
    }

    /// Leftmost x coordinate.
    pub fn left(&self) -> Result<f64> {
        self.points
            .iter()
            .map(|p| p.x)
            .reduce(f64::min)
            .ok_or(ProfileError::EmptyCrosssection)
    }

    /// Rightmost x coordinate.
    pub fn right(&self) -> Result<f64> {
        self.points
            .iter()
            .map(|p| p.x)
            .reduce(f64::max)
            .ok_or(ProfileError::EmptyCrosssection)
    }

    /// Highest surveyed elevation.
    pub fn top(&self) -> Result<f64> {
        self.points
            .iter()
            .map(|p| p.z)
            .reduce(f64::max)
            .ok_or(ProfileError::EmptyCrosssection)
    }

    /// Lowest surveyed elevation.
    pub fn bottom(&self) -> Result<f64> {
        self.points
            .iter()
            .map(|p| p.z)
            .reduce(f64::min)
            .ok_or(ProfileError::EmptyCrosssection)
    }

    /// Horizontal extent.
    pub fn width(&self) -> Result<f64> {
        Ok(self.right()? - self.left()?)
    }

    /// First point surveyed at the given landmark, if present.
    pub fn point_of_type(&self, t: CrosssectionPointType) -> Option<&CrosssectionPoint> {
        self.points.iter().find(|p| p.point_type == t)
    }

    /// Mirrors the section through x = 0 and reverses the point order.
    ///
    /// Survey data runs seaward; the model frame runs landward. Mirroring
    /// keeps the polyline ordered by increasing x.
    pub fn mirror(&mut self) {
        for p in &mut self.points {
            p.x = -p.x;
        }
        self.points.reverse();
    }

    /// Drops everything left of `x_left`.
    ///
    /// A segment crossing the cut gets a synthetic point at the cut x with
    /// linearly interpolated elevation. The new leftmost point is always
    /// tagged [`CrosssectionPointType::MvBuiten`], even when the cut lands
    /// exactly on an existing point.
    pub fn limit_left(&mut self, x_left: f64) -> Result<()> {
        let mut kept: Vec<CrosssectionPoint> = Vec::with_capacity(self.points.len());
        for i in 1..self.points.len() {
            let p1 = self.points[i - 1];
            let p2 = self.points[i];
            if p2.x < x_left {
                continue;
            }
            if i == 1 && p1.x >= x_left {
                kept.push(p1);
            } else if p1.x < x_left && p2.x > x_left {
                if let Some(z) = interpolate_z(p1.x, p1.z, p2.x, p2.z, x_left) {
                    kept.push(CrosssectionPoint::new(
                        x_left,
                        z,
                        CrosssectionPointType::MvBuiten,
                    ));
                }
            }
            kept.push(p2);
        }
        match kept.first_mut() {
            Some(first) => first.point_type = CrosssectionPointType::MvBuiten,
            None => return Err(ProfileError::TruncationOutsideProfile(x_left)),
        }
        self.points = kept;
        Ok(())
    }

    /// Drops everything right of `x_right`.
    ///
    /// Mirror image of [`Crosssection::limit_left`]; the new rightmost
    /// point is always tagged [`CrosssectionPointType::MvBinnen`].
    pub fn limit_right(&mut self, x_right: f64) -> Result<()> {
        let mut kept: Vec<CrosssectionPoint> = Vec::with_capacity(self.points.len());
        for i in 1..self.points.len() {
            let p1 = self.points[i - 1];
            let p2 = self.points[i];
            if i == 1 && p1.x <= x_right {
                kept.push(p1);
            }
            if p2.x <= x_right {
                kept.push(p2);
            } else {
                if p1.x < x_right {
                    if let Some(z) = interpolate_z(p1.x, p1.z, p2.x, p2.z, x_right) {
                        kept.push(CrosssectionPoint::new(
                            x_right,
                            z,
                            CrosssectionPointType::MvBinnen,
                        ));
                    }
                }
                break;
            }
        }
        match kept.last_mut() {
            Some(last) => last.point_type = CrosssectionPointType::MvBinnen,
            None => return Err(ProfileError::TruncationOutsideProfile(x_right)),
        }
        self.points = kept;
        Ok(())
    }
}

// ====== tests ======

#[cfg(test)]
mod tests {
    use super::*;

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
            CrosssectionPoint::new(60.0, 1.0, Pt::MvBinnen),
        ])
    }

    #[test]
    fn test_label_round_trip() {
        for t in Pt::SURVEY_ORDER {
            assert_eq!(Pt::from_label(t.label()).unwrap(), t);
        }
        assert!(Pt::from_label("Sloot_9x").is_err());
        // the sentinel is not part of the survey vocabulary
        assert!(Pt::from_label("None").is_err());
        assert_eq!(Pt::MvBuiten.survey_rank(), Some(16));
        assert_eq!(Pt::None.survey_rank(), None);
    }

    #[test]
    fn test_derived_bounds() {
        let cs = section();
        assert_eq!(cs.left().unwrap(), 0.0);
        assert_eq!(cs.right().unwrap(), 60.0);
        assert_eq!(cs.top().unwrap(), 5.0);
        assert_eq!(cs.bottom().unwrap(), -2.0);
        assert_eq!(cs.width().unwrap(), 60.0);
    }

    #[test]
    fn test_bounds_are_reductions_not_endpoints() {
        // an unordered polyline still reports true min/max bounds
        let cs = Crosssection::new(vec![
            CrosssectionPoint::new(10.0, -2.0, Pt::Sloot1D),
            CrosssectionPoint::new(-5.0, 1.0, Pt::MvBuiten),
            CrosssectionPoint::new(25.0, 1.0, Pt::MvBinnen),
            CrosssectionPoint::new(4.0, 5.0, Pt::Kruin1),
        ]);
        assert_eq!(cs.left().unwrap(), -5.0);
        assert_eq!(cs.right().unwrap(), 25.0);
        assert_eq!(cs.width().unwrap(), 30.0);
    }

    #[test]
    fn test_empty_bounds_are_errors() {
        let cs = Crosssection::default();
        assert!(cs.left().is_err());
        assert!(cs.right().is_err());
        assert!(cs.top().is_err());
        assert!(cs.bottom().is_err());
        assert!(cs.width().is_err());
    }

    #[test]
    fn test_point_of_type() {
        let cs = section();
        let p = cs.point_of_type(Pt::Sloot1D).unwrap();
        assert_eq!((p.x, p.z), (10.0, -2.0));
        assert!(cs.point_of_type(Pt::Weg2).is_none());
    }

    #[test]
    fn test_mirror_is_involutive() {
        let mut cs = section();
        let original = cs.clone();
        cs.mirror();
        // mirrored: x negated, order reversed, still ascending
        assert_eq!(cs.points[0].x, -60.0);
        assert_eq!(cs.points[0].point_type, Pt::MvBinnen);
        for w in cs.points.windows(2) {
            assert!(w[0].x < w[1].x);
        }
        cs.mirror();
        assert_eq!(cs, original);
    }

    #[test]
    fn test_limit_left_interpolates() {
        let mut cs = section();
        cs.limit_left(2.0).unwrap();
        let first = cs.points[0];
        assert_eq!(first.x, 2.0);
        // halfway up the 0..4 slope from z=1 to z=5
        assert!((first.z - 3.0).abs() < 1e-12);
        assert_eq!(first.point_type, Pt::MvBuiten);
        assert_eq!(cs.points.len(), 8);
        assert_eq!(cs.points[1].point_type, Pt::Kruin1);
    }

    #[test]
    fn test_limit_right_interpolates() {
        let mut cs = section();
        cs.limit_right(30.0).unwrap();
        let last = *cs.points.last().unwrap();
        assert_eq!(last.x, 30.0);
        assert!((last.z - 1.0).abs() < 1e-12);
        assert_eq!(last.point_type, Pt::MvBinnen);
        assert_eq!(cs.points.len(), 8);
    }

    #[test]
    fn test_limit_at_existing_bounds_is_a_point_count_noop() {
        let mut cs = section();
        cs.limit_left(0.0).unwrap();
        cs.limit_right(60.0).unwrap();
        assert_eq!(cs.points.len(), section().points.len());
        // boundary endpoints get the sentinel types forced
        assert_eq!(cs.points[0].point_type, Pt::MvBuiten);
        assert_eq!(cs.points.last().unwrap().point_type, Pt::MvBinnen);
    }

    #[test]
    fn test_limit_onto_existing_point_forces_type() {
        let mut cs = section();
        cs.limit_left(8.0).unwrap();
        // the Sloot_1b point is now the boundary endpoint
        assert_eq!(cs.points[0].x, 8.0);
        assert_eq!(cs.points[0].point_type, Pt::MvBuiten);
        assert_eq!(cs.points.len(), 5);
    }

    #[test]
    fn test_limit_outside_profile_fails() {
        let mut cs = section();
        assert!(cs.limit_left(100.0).is_err());
        let mut cs = section();
        assert!(cs.limit_right(-10.0).is_err());
    }

    #[test]
    fn test_interior_points_survive_both_limits() {
        let mut cs = section();
        cs.limit_left(2.0).unwrap();
        cs.limit_right(30.0).unwrap();
        // every original point strictly inside (2, 30) is still there
        for t in [Pt::Kruin1, Pt::Kruin2, Pt::Sloot1B, Pt::Sloot1D, Pt::Sloot1C, Pt::Sloot1A] {
            assert!(cs.point_of_type(t).is_some(), "{t} lost by truncation");
        }
    }
}
