//! Closed polygon rings in the cross-section plane.
//!
//! A ring stores its vertices without a closing duplicate. Solver input
//! wants every soil polygon wound clockwise, starting at the top-left
//! vertex, with a vertex on each vertical line that later carries a
//! boundary condition; the operations here produce exactly that.

use dijkflow_math::{interpolate_z, to_mm, Point2};

/// A closed polygon ring (no closing duplicate vertex).
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Vertices in order.
    pub points: Vec<Point2>,
}

impl Ring {
    /// Create a ring from ordered vertices.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area of the ring.
    /// Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Is the ring wound clockwise?
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Ensure clockwise winding.
    pub fn make_clockwise(&mut self) {
        if !self.is_clockwise() {
            self.reverse();
        }
    }

    /// Ensure counter-clockwise winding.
    pub fn make_counter_clockwise(&mut self) {
        if self.is_clockwise() {
            self.reverse();
        }
    }

    /// Rotate the vertex order so the ring starts at its top-left vertex:
    /// highest elevation first, leftmost on a tie. Comparison is at
    /// millimeter resolution so float noise cannot flip the start between
    /// otherwise identical builds.
    pub fn start_at_top_left(&mut self) {
        let idx = self
            .points
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (std::cmp::Reverse(to_mm(p.y)), to_mm(p.x)))
            .map(|(i, _)| i);
        if let Some(i) = idx {
            self.points.rotate_left(i);
        }
    }

    /// Insert a vertex on every edge that strictly spans the vertical line
    /// at `x`, with linearly interpolated elevation. Edges that merely
    /// touch `x` at an endpoint are left alone.
    pub fn insert_vertices_at_x(&mut self, x: f64) {
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let mut out: Vec<Point2> = Vec::with_capacity(n + 2);
        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            out.push(p1);
            let spans = (p1.x < x && x < p2.x) || (p2.x < x && x < p1.x);
            if spans {
                if let Some(z) = interpolate_z(p1.x, p1.y, p2.x, p2.y, x) {
                    out.push(Point2::new(x, z));
                }
            }
        }
        self.points = out;
    }

    /// Remove consecutive vertices that coincide at millimeter resolution,
    /// including the wrap-around pair.
    pub fn dedup_mm(&mut self) {
        if self.points.len() < 2 {
            return;
        }
        let mm = |p: &Point2| (to_mm(p.x), to_mm(p.y));
        let mut kept: Vec<Point2> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            if kept.last().map(mm) != Some(mm(p)) {
                kept.push(*p);
            }
        }
        while kept.len() > 1 && mm(&kept[0]) == mm(&kept[kept.len() - 1]) {
            kept.pop();
        }
        self.points = kept;
    }
}

// ====== tests ======

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_ccw() -> Ring {
        Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_signed_area_and_winding() {
        let mut r = square_ccw();
        assert_relative_eq!(r.signed_area(), 100.0);
        assert!(!r.is_clockwise());
        r.make_clockwise();
        assert_relative_eq!(r.signed_area(), -100.0);
        assert!(r.is_clockwise());
        // idempotent
        r.make_clockwise();
        assert!(r.is_clockwise());
    }

    #[test]
    fn test_start_at_top_left() {
        let mut r = square_ccw();
        r.make_clockwise();
        r.start_at_top_left();
        assert_eq!(r.points[0], Point2::new(0.0, 10.0));
        // winding untouched by rotation
        assert!(r.is_clockwise());
    }

    #[test]
    fn test_start_at_top_left_mm_tie() {
        // two candidates whose elevations differ by less than a millimeter:
        // the leftmost wins
        let mut r = Ring::new(vec![
            Point2::new(5.0, 10.0001),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
        ]);
        r.start_at_top_left();
        assert_eq!(r.points[0], Point2::new(0.0, 10.0));
    }

    #[test]
    fn test_insert_vertices_at_x() {
        let mut r = square_ccw();
        r.insert_vertices_at_x(4.0);
        // one hit on the bottom edge, one on the top edge
        assert_eq!(r.len(), 6);
        assert!(r.points.contains(&Point2::new(4.0, 0.0)));
        assert!(r.points.contains(&Point2::new(4.0, 10.0)));
        // vertical edges at x=0 and x=10 untouched
        r.insert_vertices_at_x(0.0);
        assert_eq!(r.len(), 6);
    }

    #[test]
    fn test_insert_vertices_interpolates_sloped_edge() {
        let mut r = Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(10.0, -5.0),
        ]);
        r.insert_vertices_at_x(4.0);
        assert_eq!(r.len(), 5);
        assert!(r.points.contains(&Point2::new(4.0, 2.0)));
        assert!(r.points.contains(&Point2::new(4.0, -2.0)));
    }

    #[test]
    fn test_insert_at_existing_vertex_is_noop() {
        let mut r = square_ccw();
        r.insert_vertices_at_x(10.0);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn test_dedup_mm() {
        let mut r = Ring::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0004, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0003),
        ]);
        r.dedup_mm();
        // the near-duplicate after the first vertex and the wrap-around
        // duplicate both collapse
        assert_eq!(r.len(), 4);
        assert_eq!(r.points[0], Point2::new(0.0, 0.0));
    }
}
