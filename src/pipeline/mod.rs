//! Polygon preparation and output remapping
//!
//! Everything that happens around the triangulation engine: closure
//! normalization, duplicate detection, PSLG construction with hole seeds,
//! duplicate collapse, and mapping the engine's triangles back into the
//! caller's vertex buffer.

pub mod closure;
pub mod duplicates;
pub mod hole_seed;
pub mod pslg;
pub mod remap;

pub use closure::{is_explicitly_closed, normalize_closure};
pub use duplicates::{collapse, DuplicateMap, DuplicatePair, IndexTranslation};
pub use hole_seed::HoleSeedEstimator;
pub use pslg::{Pslg, PslgBuilder, Segment};
pub use remap::{scale_index, unscale_index, write_indices, IndexRemapper};

use crate::config::TriangulatorConfig;
use crate::error::Result;
use crate::ring::RingSet;

/// Engine input plus what is needed to map its output back
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Duplicate-free graph for the engine
    pub pslg: Pslg,
    /// Compact to original point indices
    pub translation: IndexTranslation,
    /// Normalized point count of every ring
    pub ring_counts: Vec<usize>,
}

/// Turn closure-normalized rings into engine input
///
/// Duplicates are detected on the ring points before the segments are
/// built, then collapsed out of the graph.
pub fn prepare(rings: RingSet, config: &TriangulatorConfig) -> Result<Prepared> {
    let ring_counts = rings.counts().to_vec();

    // Step 1: Find coincident points
    let duplicates = DuplicateMap::find(rings.points(), config.spatial_index_threshold)?;

    // Step 2: Boundary segments and hole seeds
    let seeds = HoleSeedEstimator::new(config.hole_seed_offset, config.hole_seed_min_edge);
    let mut pslg = PslgBuilder::new(seeds).build(rings)?;

    // Step 3: Fold duplicates onto their earliest occurrence
    let translation = collapse(&mut pslg, &duplicates)?;

    Ok(Prepared {
        pslg,
        translation,
        ring_counts,
    })
}
