//! Contour reconstruction - stitch unordered segments into closed loops.
//!
//! Segments are chained greedily: starting from the first unused segment, the
//! chain repeatedly takes the first unused segment (in discovery order) that
//! has an endpoint within [`ADJACENCY_TOLERANCE`] of the chain's trailing
//! point. There is no geometric tie-break, so dense nearly-coincident segments
//! can be stitched in the wrong order.
//!
//! A plane lying exactly on a ring of mesh edges above the bottom (an
//! octahedron equator, say) receives every edge twice, once from the triangle
//! above and once from the one below. When the duplicates are interleaved the
//! chains close after two points and the layer comes out empty.

use tracing::trace;

use crate::intersect::Segment;
use crate::path::Contour;
use crate::Point2;

/// Maximum distance between two endpoints considered the same vertex (mesh units).
pub const ADJACENCY_TOLERANCE: f64 = 1e-3;

/// Relative cross-product tolerance for dropping collinear vertices.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

#[inline]
fn points_close(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() < ADJACENCY_TOLERANCE
}

/// Chain segments into closed contours.
///
/// Open chains and chains of fewer than three points are discarded. Chain
/// length is capped at twice the segment count.
pub fn build_contours(segments: &[Segment]) -> Vec<Contour> {
    let max_len = segments.len() * 2;
    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let seed = segments[start];
        let mut chain = vec![seed.p0];
        let mut cursor = seed.p1;
        let mut closed = false;

        while chain.len() < max_len {
            chain.push(cursor);

            let next = segments
                .iter()
                .enumerate()
                .find(|(i, seg)| {
                    !used[*i] && (points_close(&cursor, &seg.p0) || points_close(&cursor, &seg.p1))
                })
                .map(|(i, seg)| (i, *seg));

            let Some((i, seg)) = next else {
                break;
            };
            used[i] = true;
            cursor = if points_close(&cursor, &seg.p0) {
                seg.p1
            } else {
                seg.p0
            };

            if points_close(&cursor, &chain[0]) {
                closed = true;
                break;
            }
        }

        if !closed || chain.len() < 3 {
            trace!(points = chain.len(), closed, "dropping open chain");
            continue;
        }

        let mut contour = Contour::new(chain);
        contour.simplify_collinear(COLLINEAR_TOLERANCE);
        if contour.len() >= 3 {
            contours.push(contour);
        }
    }

    contours
}
