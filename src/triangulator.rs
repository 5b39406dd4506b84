//! Triangulator entry point

use crate::config::TriangulatorConfig;
use crate::engine::{self, ConstrainedTriangulator, SpadeEngine};
use crate::error::Result;
use crate::pipeline::{self, normalize_closure, write_indices, IndexRemapper};
use crate::ring::RingSet;

/// Triangulates polygons with holes into a shared 16-bit index buffer
///
/// Generic over the engine `E` so the constrained Delaunay backend can be
/// swapped; [`SpadeEngine`] is the default. A triangulator holds no state
/// between calls.
///
/// # Examples
///
/// ```
/// use ring_cdt::*;
///
/// // unit square, 4 points, one ring
/// let points = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
/// let mut ring_sizes = [8];
/// let mut out = [0i16; 6];
///
/// let triangulator = Triangulator::new(TriangulatorConfig::default());
/// let count = triangulator
///     .triangulate(&points, 0, 4, &mut ring_sizes, 0, &mut out)
///     .unwrap();
/// assert_eq!(count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Triangulator<E = SpadeEngine> {
    config: TriangulatorConfig,
    engine: E,
}

impl Triangulator<SpadeEngine> {
    /// Create a triangulator backed by spade
    pub fn new(config: TriangulatorConfig) -> Self {
        Self::with_engine(config, SpadeEngine)
    }
}

impl Default for Triangulator<SpadeEngine> {
    fn default() -> Self {
        Self::new(TriangulatorConfig::default())
    }
}

impl<E: ConstrainedTriangulator> Triangulator<E> {
    /// Create a triangulator with a custom engine
    pub fn with_engine(config: TriangulatorConfig, engine: E) -> Self {
        Self { config, engine }
    }

    /// Get the configuration
    #[inline]
    pub fn config(&self) -> &TriangulatorConfig {
        &self.config
    }

    /// Get the engine
    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Triangulate one polygon with holes
    ///
    /// # Arguments
    ///
    /// * `points` - flat (x, y) coordinate buffer
    /// * `point_offset` - offset in floats of the first point
    /// * `point_count` - points available from `point_offset`
    /// * `ring_sizes` - per-ring sizes in floats (2 per point), outer ring
    ///   first; rewritten in place when closing points are stripped
    /// * `index_offset` - slot of the polygon's first vertex in the shared
    ///   vertex buffer (negative values are treated as 0)
    /// * `out` - receives 3 indices per triangle
    ///
    /// # Returns
    ///
    /// The number of triangles written. Nothing is written to `out` on error.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for inconsistent buffers or an `out` too small
    /// - `DegenerateRing` if stripping closing points empties a ring
    /// - `InvalidGeometry` if a hole seed cannot be estimated
    /// - `TriangulationRejected` if the rings cross or touch in a way the
    ///   engine can only resolve by adding points
    /// - `OutputOverflow` if an index does not fit `i16`
    pub fn triangulate(
        &self,
        points: &[f32],
        point_offset: usize,
        point_count: usize,
        ring_sizes: &mut [i32],
        index_offset: i32,
        out: &mut [i16],
    ) -> Result<usize> {
        let mut rings = RingSet::parse(points, point_offset, point_count, ring_sizes)?;
        if normalize_closure(&mut rings)? {
            rings.write_raw_sizes(ring_sizes);
        }

        let prepared = pipeline::prepare(rings, &self.config)?;
        let mut triangles = engine::run(&self.engine, &prepared.pslg, &self.config.engine)?;

        IndexRemapper::new(
            &prepared.translation,
            &prepared.ring_counts,
            self.config.vertex_stride,
            index_offset,
        )
        .apply(&mut triangles);

        write_indices(&triangles, self.config.flip_winding, out)?;
        Ok(triangles.len())
    }
}

/// Triangulate with the default configuration and engine
///
/// See [`Triangulator::triangulate`].
pub fn triangulate(
    points: &[f32],
    point_offset: usize,
    point_count: usize,
    ring_sizes: &mut [i32],
    index_offset: i32,
    out: &mut [i16],
) -> Result<usize> {
    Triangulator::default().triangulate(
        points,
        point_offset,
        point_count,
        ring_sizes,
        index_offset,
        out,
    )
}

/// Like [`triangulate`], but logs any error and reports 0 triangles
pub fn triangulate_or_zero(
    points: &[f32],
    point_offset: usize,
    point_count: usize,
    ring_sizes: &mut [i32],
    index_offset: i32,
    out: &mut [i16],
) -> usize {
    match triangulate(points, point_offset, point_count, ring_sizes, index_offset, out) {
        Ok(count) => count,
        Err(e) => {
            log::warn!("triangulation failed: {}", e);
            0
        }
    }
}
