//! Triangle mesh input and bounding boxes.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicerError};
use crate::{Point3, SliceAxis};

/// A triangle mesh with world-space vertex positions.
///
/// Vertices are stored flat as `[x0, y0, z0, x1, y1, z1, ...]`. When `indices`
/// is `None` every three consecutive vertices form one triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions (f32).
    pub vertices: Vec<f32>,
    /// Optional flat array of triangle indices.
    pub indices: Option<Vec<u32>>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from raw buffers, checking that they describe whole triangles
    /// and that every index is in range.
    pub fn from_parts(vertices: Vec<f32>, indices: Option<Vec<u32>>) -> Result<Self> {
        let mesh = Self { vertices, indices };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a non-indexed mesh from a list of triangles.
    pub fn from_triangles(triangles: &[[Point3; 3]]) -> Self {
        let mut vertices = Vec::with_capacity(triangles.len() * 9);
        for tri in triangles {
            for v in tri {
                vertices.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
            }
        }
        Self {
            vertices,
            indices: None,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Check buffer shapes and index ranges.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() % 3 != 0 {
            return Err(SlicerError::MalformedVertices(self.vertices.len()));
        }
        let vertex_count = self.vertex_count();
        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(SlicerError::MalformedIndices(indices.len()));
                }
                if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(SlicerError::IndexOutOfBounds {
                        index,
                        vertex_count,
                    });
                }
            }
            None => {
                if vertex_count % 3 != 0 {
                    return Err(SlicerError::MalformedIndices(vertex_count));
                }
            }
        }
        Ok(())
    }

    fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3] as f64,
            self.vertices[i * 3 + 1] as f64,
            self.vertices[i * 3 + 2] as f64,
        )
    }

    /// Resolve every triangle to its three vertex positions.
    pub fn triangles(&self) -> Result<Vec<[Point3; 3]>> {
        self.validate()?;
        let triangles = match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| {
                    [
                        self.vertex(t[0] as usize),
                        self.vertex(t[1] as usize),
                        self.vertex(t[2] as usize),
                    ]
                })
                .collect(),
            None => (0..self.triangle_count())
                .map(|t| {
                    [
                        self.vertex(t * 3),
                        self.vertex(t * 3 + 1),
                        self.vertex(t * 3 + 2),
                    ]
                })
                .collect(),
        };
        Ok(triangles)
    }

    /// Axis-aligned bounding box over all vertices, or `None` for an empty vertex buffer.
    pub fn bounds(&self) -> Option<Aabb> {
        if self.vertex_count() == 0 {
            return None;
        }
        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for i in 0..self.vertex_count() {
            let v = self.vertex(i);
            min = min.inf(&v);
            max = max.sup(&v);
        }
        Some(Aabb { min, max })
    }

    /// Bake a homogeneous transform into the vertex positions.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for i in 0..self.vertex_count() {
            let p = matrix.transform_point(&self.vertex(i));
            self.vertices[i * 3] = p.x as f32;
            self.vertices[i * 3 + 1] = p.y as f32;
            self.vertices[i * 3 + 2] = p.z as f32;
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Box dimensions.
    pub fn size(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    /// `(min, max)` along the slicing axis.
    pub fn axis_range(&self, axis: SliceAxis) -> (f64, f64) {
        (axis.height(&self.min), axis.height(&self.max))
    }

    /// `(min, max)` corners projected into the slicing plane frame.
    pub fn plane_rect(&self, axis: SliceAxis) -> ([f64; 2], [f64; 2]) {
        let lo = axis.project(&self.min);
        let hi = axis.project(&self.max);
        ([lo.x, lo.y], [hi.x, hi.y])
    }
}

/// Build an axis-aligned box mesh with 8 shared vertices and 12 triangles.
pub fn box_mesh(min: Point3, max: Point3) -> TriangleMesh {
    let (x0, y0, z0) = (min.x as f32, min.y as f32, min.z as f32);
    let (x1, y1, z1) = (max.x as f32, max.y as f32, max.z as f32);
    let vertices = vec![
        x0, y0, z0, x1, y0, z0, x1, y1, z0, x0, y1, z0, //
        x0, y0, z1, x1, y0, z1, x1, y1, z1, x0, y1, z1,
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        2, 3, 7, 2, 7, 6, // back
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    TriangleMesh {
        vertices,
        indices: Some(indices),
    }
}
