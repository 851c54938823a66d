//! Closed contour type.

use crate::Point2;

/// A closed polygon in a slicing plane.
///
/// The closing edge from the last point back to the first is implicit; the
/// first point is never repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Vertices of the contour in order.
    pub points: Vec<Point2>,
}

impl Contour {
    /// Create a new contour from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Check if the contour is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First vertex, where printing of the loop starts and ends.
    pub fn start(&self) -> Option<&Point2> {
        self.points.first()
    }

    /// Signed area of the contour.
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

    /// Is the contour counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Closed perimeter length, including the implicit closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| (self.points[(i + 1) % n] - self.points[i]).norm())
            .sum()
    }

    /// Drop vertices that lie on the straight line through their neighbours.
    ///
    /// Neighbours wrap around, so a collinear first vertex is removed too.
    pub fn simplify_collinear(&mut self, tolerance: f64) {
        let mut changed = true;
        while changed && self.points.len() > 2 {
            changed = false;
            let n = self.points.len();
            for i in 0..n {
                let prev = self.points[(i + n - 1) % n];
                let cur = self.points[i];
                let next = self.points[(i + 1) % n];
                let a = cur - prev;
                let b = next - cur;
                let scale = a.norm() * b.norm();
                let cross = a.x * b.y - a.y * b.x;
                // Zero-length edges count as collinear.
                if scale <= f64::EPSILON || (cross.abs() <= tolerance * scale && a.dot(&b) > 0.0) {
                    self.points.remove(i);
                    changed = true;
                    break;
                }
            }
        }
    }
}
