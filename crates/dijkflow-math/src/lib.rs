#![warn(missing_docs)]

//! Math primitives for dike cross-section geometry.
//!
//! Thin wrappers around nalgebra plus the handful of numeric routines the
//! geometry builder leans on: linear interpolation along survey segments,
//! line intersection, millimeter rounding, and the logarithmic head fit.
//!
//! All geometry lives in a vertical x-z plane: `x` runs horizontally along
//! the cross-section (increasing landward), and the second coordinate is the
//! elevation in meters. Where `Point2` is used, its `y` component carries
//! the elevation.

use nalgebra::Vector2;

/// A point in the vertical cross-section plane (`y` is elevation).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the cross-section plane.
pub type Vec2 = Vector2<f64>;

/// Geometric tolerance used when comparing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear tolerance in meters.
    pub linear: f64,
}

impl Tolerance {
    /// Millimeter tolerance, the resolution of surveyed elevations.
    pub const MM: Tolerance = Tolerance { linear: 1e-3 };

    /// Whether `a` and `b` are within the linear tolerance of each other.
    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }

    /// Whether `v` is within the linear tolerance of zero.
    pub fn is_zero(&self, v: f64) -> bool {
        v.abs() <= self.linear
    }

    /// Whether two points coincide within the linear tolerance.
    pub fn points_eq(&self, a: &Point2, b: &Point2) -> bool {
        self.eq(a.x, b.x) && self.eq(a.y, b.y)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::MM
    }
}

/// Rounds a coordinate to whole millimeters.
pub fn round_mm(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// A coordinate as an integer number of millimeters.
///
/// Used for ordering and equality tests where float comparison would be
/// unstable (vertex deduplication, ring start selection).
pub fn to_mm(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// Linearly interpolates the elevation at `x` on the segment from
/// `(x1, z1)` to `(x2, z2)`.
///
/// Returns `None` when the segment is vertical (no unique elevation at a
/// given `x`). `x` is not required to lie between the endpoints; callers
/// that need clamping do it themselves.
pub fn interpolate_z(x1: f64, z1: f64, x2: f64, z2: f64, x: f64) -> Option<f64> {
    let dx = x2 - x1;
    if dx.abs() < f64::EPSILON {
        return None;
    }
    Some(z1 + (x - x1) / dx * (z2 - z1))
}

/// Intersects the infinite line through `a1`-`a2` with the infinite line
/// through `b1`-`b2`.
///
/// Returns `None` for parallel or degenerate (zero-length) inputs.
pub fn line_intersection(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> Option<Point2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() < 1e-12 {
        return None;
    }
    let qp = b1 - a1;
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    Some(a1 + r * t)
}

/// A fitted head curve of the form `y = slope * ln(x) + intercept`.
///
/// Hydraulic heads along a seepage path decay roughly logarithmically with
/// distance from the entry point, so two piezometer readings pin down the
/// whole curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLinearFit {
    /// Coefficient of `ln(x)`.
    pub slope: f64,
    /// Constant term.
    pub intercept: f64,
}

impl LogLinearFit {
    /// Evaluates the fit at `x`. Returns `None` for `x <= 0`.
    pub fn eval(&self, x: f64) -> Option<f64> {
        if x <= 0.0 {
            return None;
        }
        Some(self.slope * x.ln() + self.intercept)
    }
}

/// Fits `y = slope * ln(x) + intercept` exactly through two samples.
///
/// Returns `None` when either `x` is non-positive or the two `x` values
/// coincide (the fit would be under-determined).
pub fn fit_log_linear(xs: [f64; 2], ys: [f64; 2]) -> Option<LogLinearFit> {
    if xs[0] <= 0.0 || xs[1] <= 0.0 {
        return None;
    }
    let (lx1, lx2) = (xs[0].ln(), xs[1].ln());
    let dlx = lx2 - lx1;
    if dlx.abs() < 1e-12 {
        return None;
    }
    let slope = (ys[1] - ys[0]) / dlx;
    let intercept = ys[0] - slope * lx1;
    Some(LogLinearFit { slope, intercept })
}

// ====== tests ======
