//! STL loading (binary and ASCII).

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SlicerError};
use crate::mesh::TriangleMesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Load a mesh from an STL file, detecting ASCII or binary encoding.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mesh = parse_stl(&data)?;
    debug!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        "Loaded STL"
    );
    Ok(mesh)
}

/// Parse STL bytes into a non-indexed mesh.
pub fn parse_stl(data: &[u8]) -> Result<TriangleMesh> {
    if is_binary(data) {
        parse_binary(data)
    } else {
        let text = std::str::from_utf8(data)
            .map_err(|_| SlicerError::InvalidStl("ASCII STL is not valid UTF-8".into()))?;
        parse_ascii(text)
    }
}

/// Some binary files start with "solid" too, so trust the size field when it matches.
fn is_binary(data: &[u8]) -> bool {
    if data.len() >= HEADER_LEN + 4 {
        let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
        if data.len() == HEADER_LEN + 4 + count * FACET_LEN {
            return true;
        }
    }
    let head = &data[..data.len().min(HEADER_LEN)];
    !String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

fn parse_binary(data: &[u8]) -> Result<TriangleMesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(SlicerError::InvalidStl(
            "file too small for header and triangle count".into(),
        ));
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let expected = HEADER_LEN + 4 + count * FACET_LEN;
    if data.len() < expected {
        return Err(SlicerError::InvalidStl(format!(
            "truncated: expected {} bytes for {} triangles, got {}",
            expected,
            count,
            data.len()
        )));
    }

    let mut vertices = Vec::with_capacity(count * 9);
    for facet in data[HEADER_LEN + 4..expected].chunks_exact(FACET_LEN) {
        // Skip the 12-byte normal and trailing 2-byte attribute count.
        for value in facet[12..48].chunks_exact(4) {
            vertices.push(f32::from_le_bytes([value[0], value[1], value[2], value[3]]));
        }
    }

    Ok(TriangleMesh {
        vertices,
        indices: None,
    })
}

fn parse_ascii(text: &str) -> Result<TriangleMesh> {
    let mut vertices = Vec::new();
    let mut facet: Vec<f32> = Vec::with_capacity(9);

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("vertex") => {
                for _ in 0..3 {
                    let value = parts
                        .next()
                        .and_then(|v| v.parse::<f32>().ok())
                        .ok_or_else(|| {
                            SlicerError::InvalidStl(format!("bad vertex on line {}", line_no + 1))
                        })?;
                    facet.push(value);
                }
            }
            Some("endfacet") => {
                if facet.len() != 9 {
                    return Err(SlicerError::InvalidStl(format!(
                        "facet ending on line {} has {} vertices",
                        line_no + 1,
                        facet.len() / 3
                    )));
                }
                vertices.append(&mut facet);
            }
            _ => {}
        }
    }

    Ok(TriangleMesh {
        vertices,
        indices: None,
    })
}
