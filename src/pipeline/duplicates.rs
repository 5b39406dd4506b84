//! Duplicate vertex collapsing
//!
//! Coincident vertices make boundary segments zero-length or create
//! non-manifold junctions, both of which break constraint insertion. Every
//! later copy of a point is folded onto its earliest occurrence: segment
//! endpoints are redirected, the copy is removed from the point list, and the
//! resulting translation table lets the remapper restore the caller's layout
//! afterwards.
//!
//! Equality is exact (`==` on both coordinates), matching the closure check.

use glam::Vec2;

use crate::error::{try_with_capacity, Result, TriangulationError};
use crate::pipeline::pslg::Pslg;

/// A point coincident with an earlier one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicatePair {
    /// Position of the duplicate
    pub later: usize,
    /// Position of the earliest coincident point
    pub earlier: usize,
}

/// Duplicate pairs, ascending by `later`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateMap {
    pairs: Vec<DuplicatePair>,
}

#[inline]
pub(crate) fn coincident(a: Vec2, b: Vec2) -> bool {
    a.x == b.x && a.y == b.y
}

impl DuplicateMap {
    /// Find duplicates with the pairwise O(n²) scan
    pub fn scan(points: &[Vec2]) -> Result<Self> {
        let mut recorded: Vec<bool> = try_with_capacity(points.len(), "duplicate flags")?;
        recorded.resize(points.len(), false);
        let mut pairs = Vec::new();

        for (i, &p) in points.iter().enumerate() {
            if recorded[i] {
                continue;
            }
            for j in (i + 1)..points.len() {
                if !recorded[j] && coincident(points[j], p) {
                    pairs.try_reserve(1).map_err(|e| {
                        TriangulationError::Allocation(format!("duplicate map: {}", e))
                    })?;
                    pairs.push(DuplicatePair { later: j, earlier: i });
                    recorded[j] = true;
                }
            }
        }

        Ok(Self::from_discovered(pairs))
    }

    /// Find duplicates with the pairwise scan, or through a KD-tree when the
    /// point set is large enough and the `spatial-index` feature is enabled
    ///
    /// Both paths yield the same map.
    pub fn find(points: &[Vec2], spatial_threshold: usize) -> Result<Self> {
        #[cfg(feature = "spatial-index")]
        if points.len() >= spatial_threshold {
            let pairs = crate::spatial::CoincidenceIndex::new(points).duplicate_pairs()?;
            return Ok(Self::from_discovered(pairs));
        }
        #[cfg(not(feature = "spatial-index"))]
        let _ = spatial_threshold;

        Self::scan(points)
    }

    /// Bring pairs given in discovery order into ascending `later` order
    ///
    /// Two pairs are swapped if out of order, more than two are stable-sorted.
    pub fn from_discovered(mut pairs: Vec<DuplicatePair>) -> Self {
        match pairs.len() {
            0 | 1 => {}
            2 => {
                if pairs[0].later > pairs[1].later {
                    pairs.swap(0, 1);
                }
            }
            _ => pairs.sort_by_key(|p| p.later),
        }
        Self { pairs }
    }

    /// Recorded pairs, ascending by `later`
    #[inline]
    pub fn pairs(&self) -> &[DuplicatePair] {
        &self.pairs
    }

    /// Number of duplicates
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if no point is duplicated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Build the index translation table for `point_count` points
    pub fn translation(&self, point_count: usize) -> Result<IndexTranslation> {
        let mut replacement: Vec<Option<usize>> =
            try_with_capacity(point_count, "duplicate replacements")?;
        replacement.resize(point_count, None);
        for pair in &self.pairs {
            replacement[pair.later] = Some(pair.earlier);
        }

        let mut forward: Vec<usize> = try_with_capacity(point_count, "forward index table")?;
        let mut kept: Vec<usize> =
            try_with_capacity(point_count.saturating_sub(self.pairs.len()), "kept index table")?;
        for (p, repl) in replacement.iter().enumerate() {
            match *repl {
                // the earliest occurrence is never a duplicate itself and
                // precedes `p`, so its slot is already filled
                Some(earlier) => forward.push(forward[earlier]),
                None => {
                    forward.push(kept.len());
                    kept.push(p);
                }
            }
        }

        Ok(IndexTranslation { forward, kept })
    }
}

/// Mapping between the full point list and the list without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTranslation {
    forward: Vec<usize>,
    kept: Vec<usize>,
}

impl IndexTranslation {
    /// Translation for a point list without duplicates
    pub fn identity(point_count: usize) -> Self {
        let ids: Vec<usize> = (0..point_count).collect();
        Self {
            forward: ids.clone(),
            kept: ids,
        }
    }

    /// Compact index of an original point (duplicates map to their
    /// earliest occurrence)
    #[inline]
    pub fn compact(&self, original: usize) -> usize {
        self.forward[original]
    }

    /// Original position of a compact index
    #[inline]
    pub fn original(&self, compact: usize) -> usize {
        self.kept[compact]
    }

    /// Number of points left after collapsing
    #[inline]
    pub fn compact_len(&self) -> usize {
        self.kept.len()
    }

    /// Number of points before collapsing
    #[inline]
    pub fn original_len(&self) -> usize {
        self.forward.len()
    }
}

/// Redirect segment endpoints onto surviving points and drop the duplicates
/// from the PSLG point list
pub fn collapse(pslg: &mut Pslg, map: &DuplicateMap) -> Result<IndexTranslation> {
    if map.is_empty() {
        return Ok(IndexTranslation::identity(pslg.points.len()));
    }

    for pair in map.pairs() {
        log::debug!(
            "duplicate points at {}, {}: {},{}",
            pair.later,
            pair.earlier,
            pslg.points[pair.earlier].x,
            pslg.points[pair.earlier].y
        );
    }

    let table = map.translation(pslg.points.len())?;

    for seg in pslg.segments.iter_mut() {
        seg.from = table.compact(seg.from);
        seg.to = table.compact(seg.to);
    }

    let mut p = 0usize;
    pslg.points.retain(|_| {
        let keep = table.original(table.compact(p)) == p;
        p += 1;
        keep
    });

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pslg::Segment;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn ring_segments(n: usize) -> Vec<Segment> {
        let mut segs = vec![Segment { from: n - 1, to: 0 }];
        segs.extend((0..n - 1).map(|i| Segment { from: i, to: i + 1 }));
        segs
    }

    #[test]
    fn test_no_duplicates() {
        let points = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)];
        let map = DuplicateMap::scan(&points).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_single_pair() {
        let points = [v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(4.0, 0.0), v(0.0, 4.0)];
        let map = DuplicateMap::scan(&points).unwrap();
        assert_eq!(map.pairs(), &[DuplicatePair { later: 3, earlier: 1 }]);
    }

    #[test]
    fn test_two_pairs_are_swapped_into_order() {
        // discovery order: (5, 0) is found before (3, 1)
        let points = [
            v(0.0, 0.0),
            v(1.0, 0.0),
            v(2.0, 2.0),
            v(1.0, 0.0),
            v(0.0, 3.0),
            v(0.0, 0.0),
        ];
        let map = DuplicateMap::scan(&points).unwrap();
        assert_eq!(
            map.pairs(),
            &[
                DuplicatePair { later: 3, earlier: 1 },
                DuplicatePair { later: 5, earlier: 0 },
            ]
        );
    }

    #[test]
    fn test_many_pairs_sorted() {
        let pairs = vec![
            DuplicatePair { later: 9, earlier: 0 },
            DuplicatePair { later: 4, earlier: 1 },
            DuplicatePair { later: 7, earlier: 2 },
        ];
        let map = DuplicateMap::from_discovered(pairs);
        let laters: Vec<usize> = map.pairs().iter().map(|p| p.later).collect();
        assert_eq!(laters, vec![4, 7, 9]);
    }

    #[test]
    fn test_triple_point_recorded_against_earliest() {
        let p = v(2.0, 2.0);
        let points = [p, v(5.0, 0.0), p, v(5.0, 5.0), p];
        let map = DuplicateMap::scan(&points).unwrap();
        assert_eq!(
            map.pairs(),
            &[
                DuplicatePair { later: 2, earlier: 0 },
                DuplicatePair { later: 4, earlier: 0 },
            ]
        );
    }

    #[test]
    fn test_translation_tables() {
        let map = DuplicateMap::from_discovered(vec![
            DuplicatePair { later: 1, earlier: 0 },
            DuplicatePair { later: 5, earlier: 3 },
            DuplicatePair { later: 6, earlier: 4 },
        ]);
        let t = map.translation(8).unwrap();

        assert_eq!(t.original_len(), 8);
        assert_eq!(t.compact_len(), 5);
        // kept: 0, 2, 3, 4, 7
        assert_eq!((0..5).map(|c| t.original(c)).collect::<Vec<_>>(), vec![0, 2, 3, 4, 7]);
        assert_eq!(t.compact(1), 0);
        assert_eq!(t.compact(5), 2);
        assert_eq!(t.compact(6), 3);
        assert_eq!(t.compact(7), 4);
    }

    #[test]
    fn test_collapse_rewrites_segments() {
        // square with the second corner repeated
        let points = vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0)];
        let map = DuplicateMap::scan(&points).unwrap();
        let mut pslg = Pslg {
            points,
            segments: ring_segments(5),
            holes: Vec::new(),
        };

        let table = collapse(&mut pslg, &map).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(pslg.points.len(), 4);
        assert_eq!(table.compact_len(), 4);
        assert_eq!(
            pslg.segments,
            vec![
                Segment { from: 3, to: 0 },
                Segment { from: 0, to: 1 },
                Segment { from: 1, to: 1 },
                Segment { from: 1, to: 2 },
                Segment { from: 2, to: 3 },
            ]
        );
        assert!(pslg.segments.iter().all(|s| s.from < 4 && s.to < 4));
    }

    #[test]
    fn test_collapse_keeps_earliest_points() {
        let a = v(1.0, 1.0);
        let b = v(3.0, 3.0);
        let points = vec![a, b, v(0.0, 5.0), a, v(7.0, 0.0), b];
        let map = DuplicateMap::scan(&points).unwrap();
        let mut pslg = Pslg {
            points,
            segments: ring_segments(6),
            holes: Vec::new(),
        };

        collapse(&mut pslg, &map).unwrap();
        assert_eq!(pslg.points, vec![a, b, v(0.0, 5.0), v(7.0, 0.0)]);
        assert_eq!(pslg.segments[0], Segment { from: 1, to: 0 });
    }
}
