//! Ring descriptors
//!
//! A parsed, owned view of the caller's flat `[x0, y0, x1, y1, ...]` point
//! buffer together with the per-ring point counts. Ring offsets are never
//! stored: they are derived from the cumulative counts, so removing a point
//! from one ring implicitly shifts every later ring.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{try_with_capacity, Result, TriangulationError};

/// Raw buffer units per point (x and y)
pub const COORDS_PER_POINT: usize = 2;

/// A contiguous run of points forming one implicitly closed polygon boundary
///
/// Ring 0 is the outer boundary, every following ring is a hole.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    /// Index of the ring's first point in the point list
    pub start: usize,
    /// Number of points in the ring
    pub len: usize,
}

impl Ring {
    /// One past the ring's last point
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Index of the ring's last point, if it has any
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.len.checked_sub(1).map(|l| self.start + l)
    }
}

/// Owned points plus per-ring point counts, in buffer order
#[derive(Debug, Clone, PartialEq)]
pub struct RingSet {
    points: Vec<Vec2>,
    counts: Vec<usize>,
}

impl RingSet {
    /// Parse the caller's buffers
    ///
    /// * `points` - flat coordinate buffer
    /// * `point_offset` - offset (in floats) of the first point
    /// * `point_count` - number of points available from `point_offset`
    /// * `ring_sizes` - per-ring sizes in raw units (2 per point)
    ///
    /// Only points covered by rings are copied; anything past the last ring
    /// is not part of the polygon.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the buffer is too short, a ring size is negative or
    ///   odd, there are no rings, or the rings need more points than available
    /// - `InvalidGeometry` if a ring point is not finite
    pub fn parse(
        points: &[f32],
        point_offset: usize,
        point_count: usize,
        ring_sizes: &[i32],
    ) -> Result<Self> {
        if ring_sizes.is_empty() {
            return Err(TriangulationError::InvalidInput("no rings given".into()));
        }

        let end = point_count
            .checked_mul(COORDS_PER_POINT)
            .and_then(|n| n.checked_add(point_offset))
            .ok_or_else(|| TriangulationError::InvalidInput("point range overflows".into()))?;
        if end > points.len() {
            return Err(TriangulationError::InvalidInput(format!(
                "point buffer holds {} floats, need {} (offset {} + {} points)",
                points.len(),
                end,
                point_offset,
                point_count
            )));
        }

        let mut counts = try_with_capacity(ring_sizes.len(), "ring counts")?;
        let mut total = 0usize;
        for (ring, &raw) in ring_sizes.iter().enumerate() {
            if raw < 0 || raw % 2 != 0 {
                return Err(TriangulationError::InvalidInput(format!(
                    "ring {} has invalid raw size {}",
                    ring, raw
                )));
            }
            let n = raw as usize / COORDS_PER_POINT;
            total += n;
            counts.push(n);
        }
        if total > point_count {
            return Err(TriangulationError::InvalidInput(format!(
                "rings need {} points, buffer provides {}",
                total, point_count
            )));
        }

        let coords = &points[point_offset..point_offset + total * COORDS_PER_POINT];
        let mut out = try_with_capacity(total, "points")?;
        for (i, c) in coords.chunks_exact(COORDS_PER_POINT).enumerate() {
            let p = Vec2::new(c[0], c[1]);
            if !p.is_finite() {
                return Err(TriangulationError::InvalidGeometry(format!(
                    "point {} is not finite: {:?}",
                    i, p
                )));
            }
            out.push(p);
        }

        Ok(Self {
            points: out,
            counts,
        })
    }

    /// Build a ring set from already separated rings (outer ring first)
    pub fn from_rings<R: AsRef<[Vec2]>>(rings: &[R]) -> Self {
        let mut points = Vec::new();
        let mut counts = Vec::with_capacity(rings.len());
        for ring in rings {
            let ring = ring.as_ref();
            points.extend_from_slice(ring);
            counts.push(ring.len());
        }
        Self { points, counts }
    }

    /// All ring points, ring after ring
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Point count of every ring
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of rings (outer ring included)
    #[inline]
    pub fn ring_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of points over all rings
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Rings with their start offsets derived from the cumulative counts
    pub fn rings(&self) -> impl Iterator<Item = Ring> + '_ {
        self.counts.iter().scan(0usize, |start, &len| {
            let ring = Ring { start: *start, len };
            *start += len;
            Some(ring)
        })
    }

    /// The ring at `index`, if present
    pub fn ring(&self, index: usize) -> Option<Ring> {
        self.rings().nth(index)
    }

    /// Points of the ring at `index`
    pub fn ring_points(&self, index: usize) -> Option<&[Vec2]> {
        self.ring(index).map(|r| &self.points[r.start..r.end()])
    }

    /// Write the ring sizes back in raw units (2 per point)
    pub fn write_raw_sizes(&self, ring_sizes: &mut [i32]) {
        for (raw, &n) in ring_sizes.iter_mut().zip(&self.counts) {
            *raw = (n * COORDS_PER_POINT) as i32;
        }
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Vec2>, &mut Vec<usize>) {
        (&mut self.points, &mut self.counts)
    }

    pub(crate) fn into_parts(self) -> (Vec<Vec2>, Vec<usize>) {
        (self.points, self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_offset() {
        // two garbage floats, then a triangle and a 4-point hole
        let buf = [
            9.0, 9.0, //
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, //
            2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 2.0,
        ];
        let set = RingSet::parse(&buf, 2, 7, &[6, 8]).unwrap();

        assert_eq!(set.ring_count(), 2);
        assert_eq!(set.point_count(), 7);
        assert_eq!(set.counts(), &[3, 4]);
        assert_eq!(set.points()[0], Vec2::new(0.0, 0.0));
        assert_eq!(set.ring(1), Some(Ring { start: 3, len: 4 }));
        assert_eq!(set.ring_points(1).unwrap()[0], Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_parse_ignores_points_past_last_ring() {
        let buf = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 5.0, 5.0];
        let set = RingSet::parse(&buf, 0, 4, &[6]).unwrap();
        assert_eq!(set.point_count(), 3);
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        let buf = [0.0; 6];
        let err = RingSet::parse(&buf, 2, 3, &[6]).unwrap_err();
        assert!(matches!(err, TriangulationError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_rejects_bad_ring_sizes() {
        let buf = [0.0; 8];
        assert!(RingSet::parse(&buf, 0, 4, &[]).is_err());
        assert!(RingSet::parse(&buf, 0, 4, &[5]).is_err());
        assert!(RingSet::parse(&buf, 0, 4, &[-2]).is_err());
        assert!(RingSet::parse(&buf, 0, 4, &[6, 4]).is_err());
    }

    #[test]
    fn test_parse_rejects_nan() {
        let buf = [0.0, 0.0, f32::NAN, 0.0, 1.0, 1.0];
        let err = RingSet::parse(&buf, 0, 3, &[6]).unwrap_err();
        assert!(matches!(err, TriangulationError::InvalidGeometry(_)));
    }

    #[test]
    fn test_rings_derive_offsets() {
        let set = RingSet::from_rings(&[
            vec![Vec2::ZERO; 5],
            vec![Vec2::ONE; 3],
            vec![Vec2::X; 4],
        ]);
        let rings: Vec<Ring> = set.rings().collect();
        assert_eq!(
            rings,
            vec![
                Ring { start: 0, len: 5 },
                Ring { start: 5, len: 3 },
                Ring { start: 8, len: 4 },
            ]
        );
        assert_eq!(rings[2].last(), Some(11));
        assert_eq!(Ring { start: 3, len: 0 }.last(), None);
    }

    #[test]
    fn test_write_raw_sizes() {
        let set = RingSet::from_rings(&[vec![Vec2::ZERO; 4], vec![Vec2::ONE; 3]]);
        let mut raw = [0i32; 2];
        set.write_raw_sizes(&mut raw);
        assert_eq!(raw, [8, 6]);
    }
}
