//! Spatial indexing for coincident point lookups
//!
//! This module is only available with the `spatial-index` feature. It
//! replaces the pairwise duplicate scan for large rings; the pairs it finds
//! are identical to the ones the scan finds.

use glam::Vec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::error::Result;
use crate::pipeline::duplicates::{coincident, DuplicatePair};

/// KD-tree over the ring points
///
/// Candidates returned by the tree are confirmed with exact equality, so
/// the squared-distance radius only has to be small enough to include
/// coincident points.
pub struct CoincidenceIndex<'a> {
    points: &'a [Vec2],
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

impl<'a> CoincidenceIndex<'a> {
    /// Build the index over `points`
    pub fn new(points: &'a [Vec2]) -> Self {
        let tree = if points.len() < 2 {
            None
        } else {
            let coords: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
            Some(ImmutableKdTree::new_from_slice(&coords))
        };
        Self { points, tree }
    }

    /// Positions of all points equal to `points[index]`, ascending
    pub fn coincident_with(&self, index: usize) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let p = self.points[index];
        let mut found: Vec<usize> = tree
            .within_unsorted::<SquaredEuclidean>(&[p.x, p.y], f32::MIN_POSITIVE)
            .into_iter()
            .map(|n| n.item as usize)
            .filter(|&i| i != index && coincident(self.points[i], p))
            .collect();
        found.sort_unstable();
        found
    }

    /// Every point coincident with an earlier one, paired with the earliest
    /// occurrence, in the pairwise scan's discovery order
    pub fn duplicate_pairs(&self) -> Result<Vec<DuplicatePair>> {
        let mut pairs = Vec::new();
        for later in 0..self.points.len() {
            if let Some(&earlier) = self.coincident_with(later).first() {
                if earlier < later {
                    pairs.push(DuplicatePair { later, earlier });
                }
            }
        }
        // the scan walks the earlier point in its outer loop
        pairs.sort_by_key(|p| (p.earlier, p.later));
        Ok(pairs)
    }
}
