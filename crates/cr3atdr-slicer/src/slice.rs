//! Mesh slicing - intersect a triangle mesh with evenly spaced planes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::contour::build_contours;
use crate::error::{Result, SlicerError};
use crate::intersect::{triangle_plane_intersection, Segment, SliceAxis};
use crate::mesh::TriangleMesh;
use crate::path::Contour;
use crate::Point3;

/// A single layer from slicing.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Position in the emitted layer list (empty planes are skipped).
    pub index: usize,
    /// Height of the slicing plane along the slicing axis.
    pub z: f64,
    /// Closed contours at this height, in discovery order.
    pub contours: Vec<Contour>,
}

/// Slicing configuration fixed for the lifetime of a slicer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slicer {
    /// Distance between consecutive slicing planes (mesh units).
    pub layer_height: f64,
    /// Mesh axis used as height.
    pub axis: SliceAxis,
}

impl Default for Slicer {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            axis: SliceAxis::Z,
        }
    }
}

/// A triangle with its extent along the slicing axis.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    vertices: [Point3; 3],
    h_min: f64,
    h_max: f64,
}

impl Slicer {
    /// Create a slicer, rejecting non-finite or non-positive layer heights.
    pub fn new(layer_height: f64, axis: SliceAxis) -> Result<Self> {
        if !layer_height.is_finite() || layer_height <= 0.0 {
            return Err(SlicerError::InvalidLayerHeight(layer_height));
        }
        Ok(Self { layer_height, axis })
    }

    /// Plane heights `min + k * layer_height` for `k` in `0..ceil((max - min) / layer_height)`.
    ///
    /// Empty when the extent is not positive.
    pub fn layer_heights(&self, min: f64, max: f64) -> Vec<f64> {
        let extent = max - min;
        if !(extent > 0.0) || !(self.layer_height > 0.0) {
            return Vec::new();
        }
        let total_layers = (extent / self.layer_height).ceil() as usize;
        (0..total_layers)
            .map(|k| min + k as f64 * self.layer_height)
            .filter(|&z| z <= max)
            .collect()
    }

    /// Collect the raw segments of every triangle crossing the plane at `z`.
    pub fn segments_at(&self, triangles: &[[Point3; 3]], z: f64) -> Vec<Segment> {
        triangles
            .iter()
            .filter_map(|tri| triangle_plane_intersection(tri, z, self.axis))
            .collect()
    }

    /// Slice `mesh` into layers, bottom to top.
    ///
    /// Layers without segments or without closed contours are dropped. An empty
    /// mesh or one with no extent along the slicing axis yields no layers.
    pub fn slice(&self, mesh: &TriangleMesh) -> Result<Vec<Layer>> {
        if !self.layer_height.is_finite() || self.layer_height <= 0.0 {
            return Err(SlicerError::InvalidLayerHeight(self.layer_height));
        }

        let Some(bounds) = mesh.bounds() else {
            return Ok(Vec::new());
        };
        let triangles = self.extract_triangles(mesh)?;
        if triangles.is_empty() {
            return Ok(Vec::new());
        }

        let (min, max) = bounds.axis_range(self.axis);
        let heights = self.layer_heights(min, max);

        info!(
            triangles = triangles.len(),
            planes = heights.len(),
            layer_height = self.layer_height,
            axis = ?self.axis,
            "Starting mesh slicing"
        );

        #[cfg(feature = "parallel")]
        let sliced: Vec<(f64, Vec<Contour>)> = heights
            .par_iter()
            .map(|&z| (z, self.slice_at(&triangles, z)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let sliced: Vec<(f64, Vec<Contour>)> = heights
            .iter()
            .map(|&z| (z, self.slice_at(&triangles, z)))
            .collect();

        let layers: Vec<Layer> = sliced
            .into_iter()
            .filter(|(_, contours)| !contours.is_empty())
            .enumerate()
            .map(|(index, (z, contours))| Layer { index, z, contours })
            .collect();

        info!(layers = layers.len(), "Slicing complete");
        Ok(layers)
    }

    fn extract_triangles(&self, mesh: &TriangleMesh) -> Result<Vec<Triangle>> {
        Ok(mesh
            .triangles()?
            .into_iter()
            .map(|vertices| {
                let h = vertices.map(|v| self.axis.height(&v));
                Triangle {
                    vertices,
                    h_min: h[0].min(h[1]).min(h[2]),
                    h_max: h[0].max(h[1]).max(h[2]),
                }
            })
            .collect())
    }

    fn slice_at(&self, triangles: &[Triangle], z: f64) -> Vec<Contour> {
        let segments: Vec<Segment> = triangles
            .iter()
            .filter(|tri| tri.h_min <= z && tri.h_max >= z)
            .filter_map(|tri| triangle_plane_intersection(&tri.vertices, z, self.axis))
            .collect();

        if segments.is_empty() {
            return Vec::new();
        }

        let contours = build_contours(&segments);
        debug!(
            z,
            segments = segments.len(),
            contours = contours.len(),
            "Sliced plane"
        );
        contours
    }
}

/// Slice `mesh` with `layer_height` along `axis`.
pub fn slice_mesh(mesh: &TriangleMesh, layer_height: f64, axis: SliceAxis) -> Result<Vec<Layer>> {
    Slicer::new(layer_height, axis)?.slice(mesh)
}
