//! Error types for the slicer.

use thiserror::Error;

/// Errors that can occur while loading or slicing a mesh.
#[derive(Error, Debug)]
pub enum SlicerError {
    /// Vertex buffer length is not a multiple of three.
    #[error("vertex buffer has {0} floats, expected a multiple of 3")]
    MalformedVertices(usize),

    /// Index buffer (or vertex count for non-indexed meshes) does not describe whole triangles.
    #[error("{0} indices do not form whole triangles")]
    MalformedIndices(usize),

    /// A triangle references a vertex that does not exist.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Layer height must be finite and positive.
    #[error("invalid layer height: {0}")]
    InvalidLayerHeight(f64),

    /// STL data could not be parsed.
    #[error("invalid STL: {0}")]
    InvalidStl(String),

    /// Reading a mesh file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for slicer operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
