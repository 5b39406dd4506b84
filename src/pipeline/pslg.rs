//! Planar straight-line graph construction
//!
//! Turns normalized rings into the input the constrained triangulator
//! consumes: the point list, one closed cycle of boundary segments per ring,
//! and one seed point per hole.

use glam::Vec2;

use crate::error::{try_with_capacity, Result};
use crate::pipeline::hole_seed::HoleSeedEstimator;
use crate::ring::RingSet;

/// A boundary edge between two points of the PSLG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
}

impl Segment {
    /// Both endpoints are the same point
    #[inline]
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Points, boundary segments and hole seeds handed to the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pslg {
    pub points: Vec<Vec2>,
    pub segments: Vec<Segment>,
    pub holes: Vec<Vec2>,
}

impl Pslg {
    /// Log the graph in Triangle's `.poly` layout
    pub fn log_poly(&self, level: log::Level) {
        if !log::log_enabled!(level) {
            return;
        }
        log::log!(level, "{} 2 0 0", self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            log::log!(level, "{} {} {}", i, p.x, p.y);
        }
        log::log!(level, "{} 0", self.segments.len());
        for (i, s) in self.segments.iter().enumerate() {
            log::log!(level, "{} {} {}", i, s.from, s.to);
        }
        log::log!(level, "{} 0", self.holes.len());
        for (i, h) in self.holes.iter().enumerate() {
            log::log!(level, "{} {} {}", i, h.x, h.y);
        }
    }
}

/// Builds a [`Pslg`] from a ring set
#[derive(Debug, Clone, Copy, Default)]
pub struct PslgBuilder {
    seeds: HoleSeedEstimator,
}

impl PslgBuilder {
    pub fn new(seeds: HoleSeedEstimator) -> Self {
        Self { seeds }
    }

    /// Build the segment cycles and hole seeds for `rings`
    ///
    /// Each ring emits its closing segment (last, first) before the forward
    /// segments (i, i + 1); the remapper relies on this order.
    ///
    /// # Errors
    ///
    /// Propagates `InvalidGeometry` from the hole seed estimation, and
    /// `Allocation` for the temporary lists.
    pub fn build(&self, rings: RingSet) -> Result<Pslg> {
        let mut segments = try_with_capacity(rings.point_count(), "segments")?;
        let mut holes = try_with_capacity(rings.ring_count().saturating_sub(1), "hole seeds")?;

        for (index, ring) in rings.rings().enumerate() {
            if index > 0 {
                holes.push(self.seeds.estimate(&rings.points()[ring.start..ring.end()])?);
            }

            let Some(last) = ring.last() else {
                continue;
            };
            segments.push(Segment {
                from: last,
                to: ring.start,
            });
            segments.extend((ring.start..last).map(|p| Segment { from: p, to: p + 1 }));
        }

        let (points, _) = rings.into_parts();
        Ok(Pslg {
            points,
            segments,
            holes,
        })
    }
}
