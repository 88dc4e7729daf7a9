//! Clipping soil-layer rectangles against the cross-section envelope.
//!
//! Each soil layer starts life as an axis-aligned rectangle spanning the
//! full model width; intersecting it with the envelope under the surface
//! polyline yields the actual soil polygons. A ditch can cut a shallow
//! layer clean in two, so the result is a sum type rather than a single
//! ring.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use dijkflow_math::Point2;

use crate::ring::Ring;

/// Pieces below this area (m²) are numerical slivers, not soil.
const MIN_PIECE_AREA: f64 = 1e-9;

/// Result of clipping one layer rectangle against the envelope.
#[derive(Debug, Clone)]
pub enum ClipOutcome {
    /// The layer lies entirely outside the envelope.
    Empty,
    /// The usual case: one polygon.
    Single(Ring),
    /// The surface (typically the ditch) split the layer into parts.
    Multiple(Vec<Ring>),
}

impl ClipOutcome {
    /// Number of polygon pieces.
    pub fn count(&self) -> usize {
        match self {
            ClipOutcome::Empty => 0,
            ClipOutcome::Single(_) => 1,
            ClipOutcome::Multiple(rings) => rings.len(),
        }
    }

    /// Whether no piece survived the clip.
    pub fn is_empty(&self) -> bool {
        matches!(self, ClipOutcome::Empty)
    }

    /// Consume the outcome, yielding its pieces.
    pub fn into_rings(self) -> Vec<Ring> {
        match self {
            ClipOutcome::Empty => Vec::new(),
            ClipOutcome::Single(ring) => vec![ring],
            ClipOutcome::Multiple(rings) => rings,
        }
    }
}

/// Axis-aligned rectangle ring, counter-clockwise.
pub fn rect_ring(x_left: f64, x_right: f64, bottom: f64, top: f64) -> Ring {
    Ring::new(vec![
        Point2::new(x_left, bottom),
        Point2::new(x_right, bottom),
        Point2::new(x_right, top),
        Point2::new(x_left, top),
    ])
}

/// The region under a left-to-right surface polyline, down to `bottom`,
/// closed along the model sides. Counter-clockwise.
pub fn envelope_ring(surface: &[Point2], bottom: f64) -> Ring {
    let mut points = surface.to_vec();
    if let (Some(first), Some(last)) = (surface.first(), surface.last()) {
        points.push(Point2::new(last.x, bottom));
        points.push(Point2::new(first.x, bottom));
    }
    let mut ring = Ring::new(points);
    ring.make_counter_clockwise();
    ring
}

fn to_geo(ring: &Ring) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring
        .points
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    Polygon::new(LineString::from(coords), vec![])
}

fn exterior_ring(poly: &Polygon<f64>) -> Ring {
    let mut points: Vec<Point2> = poly
        .exterior()
        .0
        .iter()
        .map(|c| Point2::new(c.x, c.y))
        .collect();
    // geo closes rings with a duplicate of the first vertex
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Ring::new(points)
}

/// Intersect `ring` with `envelope`.
///
/// Both operands here are vertically convex (one z interval per x), so the
/// intersection never has holes; interior rings of the boolean result are
/// ignored. Zero-area slivers from pinch points are dropped.
pub fn clip(ring: &Ring, envelope: &Ring) -> ClipOutcome {
    let result: MultiPolygon<f64> = to_geo(ring).intersection(&to_geo(envelope));
    let mut rings: Vec<Ring> = result
        .iter()
        .map(exterior_ring)
        .filter(|r| r.len() >= 3 && r.signed_area().abs() > MIN_PIECE_AREA)
        .collect();
    match rings.len() {
        0 => ClipOutcome::Empty,
        1 => match rings.pop() {
            Some(ring) => ClipOutcome::Single(ring),
            None => ClipOutcome::Empty,
        },
        _ => ClipOutcome::Multiple(rings),
    }
}

// ====== tests ======
