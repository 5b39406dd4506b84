//! Tessellation fallback for extrusion layers
//!
//! A second path that skips the constrained triangulation: the rings go
//! straight to a polygon tessellator and the resulting indices are placed
//! into the same shared vertex buffer layout as [`Triangulator`] output
//! (stride, odd-ring padding, vertex offset). No closure normalization or
//! duplicate handling happens here.
//!
//! [`Triangulator`]: crate::Triangulator

use std::ops::Range;

use earcutr::earcut;
use glam::Vec2;

use crate::config::{DEFAULT_VERTEX_STRIDE, MAX_VERTEX_STRIDE};
use crate::error::{try_with_capacity, Result, TriangulationError};
use crate::pipeline::remap::{pad_index, scale_index};
use crate::ring::{RingSet, COORDS_PER_POINT};

/// Backend result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TessOutput {
    /// Vertices in the tessellated mesh
    pub vertex_count: usize,
    /// Flat triangle list, as indices into the input points
    pub indices: Vec<usize>,
}

/// A polygon tessellator
pub trait Tessellate {
    /// Tessellate the polygon bounded by `contours`
    ///
    /// Each contour is a range into `points`. The first contour is the outer
    /// boundary, the remaining ones are holes.
    fn tessellate(&self, points: &[Vec2], contours: &[Range<usize>]) -> Result<TessOutput>;
}

/// Ear clipping via earcutr
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTessellator;

impl Tessellate for EarcutTessellator {
    fn tessellate(&self, points: &[Vec2], contours: &[Range<usize>]) -> Result<TessOutput> {
        let total: usize = contours.iter().map(|c| c.len()).sum();
        let mut coords: Vec<f64> = try_with_capacity(total * COORDS_PER_POINT, "earcut coords")?;
        let mut origin: Vec<usize> = try_with_capacity(total, "earcut origins")?;
        let mut hole_starts: Vec<usize> =
            try_with_capacity(contours.len().saturating_sub(1), "earcut hole starts")?;

        for (i, contour) in contours.iter().enumerate() {
            if i > 0 {
                hole_starts.push(origin.len());
            }
            for p in contour.clone() {
                coords.push(f64::from(points[p].x));
                coords.push(f64::from(points[p].y));
                origin.push(p);
            }
        }

        let idx = earcut(&coords, &hole_starts, COORDS_PER_POINT)
            .map_err(|_| TriangulationError::TessellationFailed("earcut failed".into()))?;
        if idx.len() % 3 != 0 {
            return Err(TriangulationError::TessellationFailed(format!(
                "earcut returned {} indices",
                idx.len()
            )));
        }

        Ok(TessOutput {
            vertex_count: origin.len(),
            indices: idx.into_iter().map(|i| origin[i]).collect(),
        })
    }
}

/// Tessellates rings into a growing index buffer
#[derive(Debug, Clone)]
pub struct Tessellator<T = EarcutTessellator> {
    backend: T,
    stride: usize,
}

impl Default for Tessellator<EarcutTessellator> {
    fn default() -> Self {
        Self::new(EarcutTessellator)
    }
}

impl<T: Tessellate> Tessellator<T> {
    pub fn new(backend: T) -> Self {
        Self {
            backend,
            stride: DEFAULT_VERTEX_STRIDE,
        }
    }

    /// Use `stride` slots per vertex instead of 2
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the stride is 0 or larger than 16
    pub fn with_stride(mut self, stride: usize) -> Result<Self> {
        if stride == 0 || stride > MAX_VERTEX_STRIDE {
            return Err(TriangulationError::InvalidInput(format!(
                "vertex stride must be in 1..={} (got {})",
                MAX_VERTEX_STRIDE, stride
            )));
        }
        self.stride = stride;
        Ok(self)
    }

    /// Tessellate one polygon and append its indices to `out`
    ///
    /// * `points` - flat (x, y) coordinate buffer
    /// * `point_offset` - offset in floats of the first point
    /// * `ring_sizes` - per-ring sizes in floats (2 per point)
    /// * `vertex_offset` - slot of the polygon's first vertex
    ///
    /// Rings with fewer than 3 points are left out of the tessellation but
    /// keep their space in the vertex buffer. Returns the number of indices
    /// appended, 0 when the backend had to add vertices.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for inconsistent buffers, `TessellationFailed` if the
    /// backend fails, `OutputOverflow` if an index does not fit `i16`.
    pub fn tessellate(
        &self,
        points: &[f32],
        point_offset: usize,
        ring_sizes: &[i32],
        vertex_offset: usize,
        out: &mut Vec<i16>,
    ) -> Result<usize> {
        let point_count: usize = ring_sizes
            .iter()
            .map(|&raw| raw.max(0) as usize / COORDS_PER_POINT)
            .sum();
        let rings = RingSet::parse(points, point_offset, point_count, ring_sizes)?;

        let mut contours = try_with_capacity(rings.ring_count(), "contours")?;
        for (i, ring) in rings.rings().enumerate() {
            if ring.len < 3 {
                log::warn!("ring {} has {} points, not tessellated", i, ring.len);
                continue;
            }
            contours.push(ring.start..ring.end());
        }
        if contours.is_empty() {
            return Ok(0);
        }

        let result = self.backend.tessellate(rings.points(), &contours)?;
        if result.vertex_count > point_count {
            log::debug!(
                "skip poly: {} vertices from {} points",
                result.vertex_count,
                point_count
            );
            return Ok(0);
        }

        let mut indices = try_with_capacity(result.indices.len(), "tessellation indices")?;
        for &i in &result.indices {
            let slot = pad_index(scale_index(i, self.stride, 0), rings.counts(), self.stride, 0)
                + vertex_offset;
            if slot > i16::MAX as usize {
                return Err(TriangulationError::OutputOverflow { index: slot });
            }
            indices.push(slot as i16);
        }

        out.extend_from_slice(&indices);
        Ok(indices.len())
    }
}
