#![warn(missing_docs)]

//! Planar mesh slicing for cr3atdr.
//!
//! This crate intersects a triangle mesh with evenly spaced planes along one
//! axis and stitches the resulting segments into closed contours, ready for
//! toolpath generation.
//!
//! # Example
//!
//! ```
//! use cr3atdr_slicer::{box_mesh, slice_mesh, Point3, SliceAxis};
//!
//! let mesh = box_mesh(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
//! let layers = slice_mesh(&mesh, 0.5, SliceAxis::Z).unwrap();
//!
//! assert_eq!(layers.len(), 4);
//! assert_eq!(layers[0].contours[0].len(), 4);
//! ```

pub mod contour;
pub mod error;
pub mod intersect;
pub mod mesh;
pub mod path;
pub mod slice;
pub mod stl;

pub use contour::{build_contours, ADJACENCY_TOLERANCE};
pub use error::{Result, SlicerError};
pub use intersect::{triangle_plane_intersection, Segment, SliceAxis};
pub use mesh::{box_mesh, Aabb, TriangleMesh};
pub use path::Contour;
pub use slice::{slice_mesh, Layer, Slicer};
pub use stl::{load_stl, parse_stl};

/// 2D point in a slicing plane.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point in mesh space.
pub type Point3 = nalgebra::Point3<f64>;
