//! Hole seed estimation
//!
//! The engine marks a region as a hole when it is handed one point inside
//! it. Finding a point that is guaranteed to be inside an arbitrary ring is
//! expensive; this is a heuristic instead. Walk the ring until an edge is
//! long enough on one axis, then step from that edge's midpoint a fixed
//! distance to its right. With holes wound so their interior lies to the
//! right of each edge, and parallel edges further apart than the offset, the
//! point lands inside the hole.
//!
//! Pathological holes (all edges short, very thin, non-convex near the chosen
//! edge) can get a wrong seed. The seed is not verified.

use glam::Vec2;

use crate::error::{Result, TriangulationError};

/// Heuristic interior point finder for hole rings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleSeedEstimator {
    /// Distance from the edge midpoint towards the interior
    pub offset: f32,
    /// Extent on either axis that makes an edge long enough to stop at
    pub min_edge: f32,
}

impl HoleSeedEstimator {
    pub fn new(offset: f32, min_edge: f32) -> Self {
        Self { offset, min_edge }
    }

    /// Estimate a point inside the hole bounded by `ring`
    ///
    /// The closing edge (last point back to first) is never considered. When
    /// no edge is long enough the last edge walked is used.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if the ring has fewer than two points, the chosen
    /// edge has zero length, or the seed is not finite.
    pub fn estimate(&self, ring: &[Vec2]) -> Result<Vec2> {
        let (&first, rest) = ring.split_first().ok_or_else(|| {
            TriangulationError::InvalidGeometry("hole ring has no points".into())
        })?;
        if rest.is_empty() {
            return Err(TriangulationError::InvalidGeometry(
                "hole ring has a single point".into(),
            ));
        }

        let mut next = first;
        let mut cur = first;
        let mut edge = Vec2::ZERO;
        for &p in rest {
            cur = next;
            next = p;
            edge = next - cur;
            if edge.x.abs() > self.min_edge || edge.y.abs() > self.min_edge {
                break;
            }
        }

        let a = edge.length();
        if a == 0.0 {
            return Err(TriangulationError::InvalidGeometry(format!(
                "zero-length hole edge at ({}, {})",
                cur.x, cur.y
            )));
        }

        // left normal; the seed goes the other way
        let u = Vec2::new(-edge.y / a, edge.x / a);
        let seed = cur + edge / 2.0 - u * self.offset;
        if !seed.is_finite() {
            return Err(TriangulationError::InvalidGeometry(format!(
                "hole seed is not finite: {:?}",
                seed
            )));
        }

        log::trace!(
            "hole seed a: {} in:({:.2} {:.2}) cur:({:.2} {:.2}) next:({:.2} {:.2})",
            a,
            seed.x,
            seed.y,
            cur.x,
            cur.y,
            next.x,
            next.y
        );
        Ok(seed)
    }
}

impl Default for HoleSeedEstimator {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_HOLE_SEED_OFFSET,
            crate::config::DEFAULT_HOLE_SEED_MIN_EDGE,
        )
    }
}
