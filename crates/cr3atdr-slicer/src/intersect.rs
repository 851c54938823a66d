//! Plane-triangle intersection.

use serde::{Deserialize, Serialize};

use crate::{Point2, Point3};

/// Points closer than this are the same intersection point.
const MERGE_EPSILON: f64 = 1e-9;

/// Mesh axis used as the slicing height.
///
/// The remaining two axes form the plane's 2D frame:
/// `Z → (x, y)`, `Y → (x, z)`, `X → (y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceAxis {
    /// Slice along X.
    X,
    /// Slice along Y (Y-up scenes).
    Y,
    /// Slice along Z.
    #[default]
    Z,
}

impl SliceAxis {
    /// Coordinate of `p` along the slicing axis.
    #[inline]
    pub fn height(self, p: &Point3) -> f64 {
        match self {
            SliceAxis::X => p.x,
            SliceAxis::Y => p.y,
            SliceAxis::Z => p.z,
        }
    }

    /// Project `p` into the plane's 2D frame.
    #[inline]
    pub fn project(self, p: &Point3) -> Point2 {
        match self {
            SliceAxis::X => Point2::new(p.y, p.z),
            SliceAxis::Y => Point2::new(p.x, p.z),
            SliceAxis::Z => Point2::new(p.x, p.y),
        }
    }
}

impl std::str::FromStr for SliceAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(SliceAxis::X),
            "y" => Ok(SliceAxis::Y),
            "z" => Ok(SliceAxis::Z),
            other => Err(format!("unknown slice axis '{other}', expected x, y or z")),
        }
    }
}

/// One triangle's crossing with a slicing plane, in plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub p0: Point2,
    /// Second endpoint.
    pub p1: Point2,
}

impl Segment {
    /// Create a segment.
    pub fn new(p0: Point2, p1: Point2) -> Self {
        Self { p0, p1 }
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).norm()
    }
}

/// Intersect a triangle with the plane `height == z` along `axis`.
///
/// Returns `None` unless the plane crosses the triangle in exactly two distinct
/// points. Coplanar triangles and triangles touching the plane only at a vertex
/// produce no segment.
pub fn triangle_plane_intersection(tri: &[Point3; 3], z: f64, axis: SliceAxis) -> Option<Segment> {
    let h = [
        axis.height(&tri[0]),
        axis.height(&tri[1]),
        axis.height(&tri[2]),
    ];

    if h.iter().all(|&v| v > z) || h.iter().all(|&v| v < z) {
        return None;
    }

    let mut points: [Point2; 3] = [Point2::origin(); 3];
    let mut count = 0;

    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        let (hs, he) = (h[i], h[j]);
        let straddles = (hs >= z && he <= z) || (hs <= z && he >= z);
        if !straddles || hs == he {
            continue;
        }
        let t = (z - hs) / (he - hs);
        let point = axis.project(&(tri[i] + (tri[j] - tri[i]) * t));

        if points[..count]
            .iter()
            .any(|p| (p - point).norm() < MERGE_EPSILON)
        {
            continue;
        }
        points[count] = point;
        count += 1;
    }

    (count == 2).then(|| Segment::new(points[0], points[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [Point3; 3] {
        [
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ]
    }

    #[test]
    fn test_triangle_above_and_below() {
        let t = tri([0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 3.0]);
        assert!(triangle_plane_intersection(&t, 0.5, SliceAxis::Z).is_none());
        assert!(triangle_plane_intersection(&t, 3.5, SliceAxis::Z).is_none());
    }

    #[test]
    fn test_straddling_triangle() {
        let t = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
        // Lies entirely in the plane y = 0.
        assert!(triangle_plane_intersection(&t, 0.0, SliceAxis::Y).is_none());

        let seg = triangle_plane_intersection(&t, 1.0, SliceAxis::Z).unwrap();
        let mut xs = [seg.p0.x, seg.p1.x];
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(xs[0], 0.0);
        assert_relative_eq!(xs[1], 1.0);
        assert_relative_eq!(seg.p0.y, 0.0);
        assert_relative_eq!(seg.length(), 1.0);
    }

    #[test]
    fn test_points_lie_on_distinct_edges() {
        let t = tri([0.0, 0.0, -1.0], [4.0, 0.0, 1.0], [0.0, 4.0, 3.0]);
        let seg = triangle_plane_intersection(&t, 0.0, SliceAxis::Z).unwrap();
        // Edge v0-v1 at t = 0.5 and edge v2-v0 at t = 0.75.
        assert_relative_eq!(seg.p0.x, 2.0);
        assert_relative_eq!(seg.p0.y, 0.0);
        assert_relative_eq!(seg.p1.x, 0.0);
        assert_relative_eq!(seg.p1.y, 1.0);
    }

    #[test]
    fn test_vertex_on_plane_with_crossing() {
        let t = tri([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 2.0, 1.0]);
        let seg = triangle_plane_intersection(&t, 0.0, SliceAxis::Z).unwrap();
        assert_relative_eq!(seg.p0.x, 1.0);
        assert_relative_eq!(seg.p1.y, 1.0);
    }

    #[test]
    fn test_vertex_touch_is_degenerate() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        assert!(triangle_plane_intersection(&t, 0.0, SliceAxis::Z).is_none());
    }

    #[test]
    fn test_coplanar_triangle() {
        let t = tri([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        assert!(triangle_plane_intersection(&t, 1.0, SliceAxis::Z).is_none());
    }

    #[test]
    fn test_edge_in_plane() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]);
        let seg = triangle_plane_intersection(&t, 0.0, SliceAxis::Z).unwrap();
        assert_relative_eq!(seg.length(), 1.0);
    }

    #[test]
    fn test_y_axis_frame() {
        let t = tri([0.0, -1.0, 5.0], [2.0, 1.0, 5.0], [0.0, 1.0, 7.0]);
        let seg = triangle_plane_intersection(&t, 0.0, SliceAxis::Y).unwrap();
        // Frame is (x, z)
        assert_relative_eq!(seg.p0.x, 1.0);
        assert_relative_eq!(seg.p0.y, 5.0);
        assert_relative_eq!(seg.p1.x, 0.0);
        assert_relative_eq!(seg.p1.y, 6.0);
    }

    #[test]
    fn test_parse_axis() {
        assert_eq!("Y".parse::<SliceAxis>().unwrap(), SliceAxis::Y);
        assert!("w".parse::<SliceAxis>().is_err());
    }
}
