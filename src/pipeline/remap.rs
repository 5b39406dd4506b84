//! Index remapping into the caller's vertex buffer
//!
//! The engine reports triangles in the compact, duplicate-free point
//! indexing. The caller's vertex buffer still holds every (closure
//! normalized) point, `stride` slots per vertex, starting at `offset`, and
//! pads each ring with an odd point count by one extra vertex. The remapper
//! undoes the collapse, scales and offsets, then shifts past the padding.

use crate::error::{Result, TriangulationError};
use crate::pipeline::duplicates::IndexTranslation;

/// Rewrites compact triangle indices into shared buffer slots
#[derive(Debug, Clone, Copy)]
pub struct IndexRemapper<'a> {
    translation: &'a IndexTranslation,
    ring_counts: &'a [usize],
    stride: usize,
    offset: usize,
}

impl<'a> IndexRemapper<'a> {
    /// * `translation` - table produced by the duplicate collapse
    /// * `ring_counts` - normalized point count per ring
    /// * `stride` - slots per vertex in the shared buffer
    /// * `offset` - base slot; negative offsets are clamped to 0
    pub fn new(
        translation: &'a IndexTranslation,
        ring_counts: &'a [usize],
        stride: usize,
        offset: i32,
    ) -> Self {
        Self {
            translation,
            ring_counts,
            stride,
            offset: offset.max(0) as usize,
        }
    }

    /// Map compact indices back to positions in the uncollapsed point list
    pub fn restore_duplicates(&self, triangles: &mut [[usize; 3]]) {
        for tri in triangles.iter_mut() {
            for idx in tri.iter_mut() {
                *idx = self.translation.original(*idx);
            }
        }
    }

    /// `index * stride + offset` for every index
    pub fn scale(&self, triangles: &mut [[usize; 3]]) {
        for idx in triangles.iter_mut().flatten() {
            *idx = scale_index(*idx, self.stride, self.offset);
        }
    }

    /// Shift every slot behind an odd-sized ring past its padding vertex
    ///
    /// Rings are walked in order and each shift moves the threshold for the
    /// following rings. The last ring has nothing behind it.
    pub fn pad_odd_rings(&self, triangles: &mut [[usize; 3]]) {
        for idx in triangles.iter_mut().flatten() {
            *idx = pad_index(*idx, self.ring_counts, self.stride, self.offset);
        }
    }

    /// Run all three steps
    pub fn apply(&self, triangles: &mut [[usize; 3]]) {
        self.restore_duplicates(triangles);
        self.scale(triangles);
        self.pad_odd_rings(triangles);
    }
}

/// Map a point index to its first slot in the shared buffer
#[inline]
pub fn scale_index(index: usize, stride: usize, offset: usize) -> usize {
    index * stride + offset
}

/// Inverse of [`scale_index`]
///
/// Returns `None` for slots below `offset` or not at the start of a vertex.
#[inline]
pub fn unscale_index(slot: usize, stride: usize, offset: usize) -> Option<usize> {
    let rel = slot.checked_sub(offset)?;
    if stride == 0 || rel % stride != 0 {
        return None;
    }
    Some(rel / stride)
}

/// Padding correction for one scaled slot, shared with the tessellation path
///
/// The thresholds depend only on the ring counts, so slots can be corrected
/// independently of each other.
pub(crate) fn pad_index(mut idx: usize, ring_counts: &[usize], stride: usize, offset: usize) -> usize {
    let mut start = offset;
    let before_last = ring_counts.len().saturating_sub(1);
    for &count in &ring_counts[..before_last] {
        start += count * stride;
        if count % 2 == 0 {
            continue;
        }
        if idx >= start {
            idx += stride;
        }
        start += stride;
    }
    idx
}

/// Write triangles as flat 16-bit indices, optionally flipping the winding
///
/// # Errors
///
/// `InvalidInput` if `out` cannot hold every index, `OutputOverflow` if an
/// index does not fit `i16`. `out` is untouched on error.
pub fn write_indices(triangles: &[[usize; 3]], flip_winding: bool, out: &mut [i16]) -> Result<()> {
    let needed = triangles.len() * 3;
    if out.len() < needed {
        return Err(TriangulationError::InvalidInput(format!(
            "index buffer holds {} indices, need {}",
            out.len(),
            needed
        )));
    }
    if let Some(&index) = triangles.iter().flatten().find(|&&i| i > i16::MAX as usize) {
        return Err(TriangulationError::OutputOverflow { index });
    }

    for (dst, tri) in out.chunks_exact_mut(3).zip(triangles) {
        let [a, b, c] = if flip_winding {
            [tri[0], tri[2], tri[1]]
        } else {
            *tri
        };
        dst[0] = a as i16;
        dst[1] = b as i16;
        dst[2] = c as i16;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::duplicates::{DuplicateMap, DuplicatePair};

    #[test]
    fn test_scale_and_offset() {
        let t = IndexTranslation::identity(4);
        let counts = [4];
        let remap = IndexRemapper::new(&t, &counts, 2, 10);
        let mut tris = vec![[0, 1, 2], [0, 2, 3]];
        remap.apply(&mut tris);
        assert_eq!(tris, vec![[10, 12, 14], [10, 14, 16]]);
    }

    #[test]
    fn test_scale_unscale_bijection() {
        for stride in [1usize, 2, 3, 8] {
            for offset in [0usize, 1, 7, 100] {
                for i in 0..500 {
                    let slot = scale_index(i, stride, offset);
                    assert_eq!(unscale_index(slot, stride, offset), Some(i));
                }
            }
        }
    }

    #[test]
    fn test_unscale_rejects_foreign_slots() {
        assert_eq!(unscale_index(5, 2, 0), None);
        assert_eq!(unscale_index(3, 2, 10), None);
        assert_eq!(unscale_index(12, 2, 10), Some(1));
        assert_eq!(unscale_index(4, 0, 0), None);
    }

    #[test]
    fn test_scale_matches_remapper() {
        let t = IndexTranslation::identity(6);
        let counts = [6];
        let remap = IndexRemapper::new(&t, &counts, 3, 5);
        let mut tris = vec![[0, 4, 5]];
        remap.scale(&mut tris);
        assert_eq!(tris, vec![[0, 4, 5].map(|i| scale_index(i, 3, 5))]);
        assert!(tris[0].iter().zip([0, 4, 5]).all(|(&s, i)| unscale_index(s, 3, 5) == Some(i)));
    }

    #[test]
    fn test_negative_offset_clamped() {
        let t = IndexTranslation::identity(3);
        let counts = [3];
        let remap = IndexRemapper::new(&t, &counts, 2, -5);
        let mut tris = vec![[0, 1, 2]];
        remap.apply(&mut tris);
        assert_eq!(tris, vec![[0, 2, 4]]);
    }

    #[test]
    fn test_restore_single_duplicate() {
        // point 2 was a copy of point 0 and removed
        let map = DuplicateMap::from_discovered(vec![DuplicatePair { later: 2, earlier: 0 }]);
        let t = map.translation(5).unwrap();
        let counts = [5];
        let remap = IndexRemapper::new(&t, &counts, 1, 0);

        let mut tris = vec![[0, 1, 2], [0, 2, 3]];
        remap.restore_duplicates(&mut tris);
        assert_eq!(tris, vec![[0, 1, 3], [0, 3, 4]]);
        assert!(tris.iter().flatten().all(|&i| i != 2));
    }

    #[test]
    fn test_restore_multiple_duplicates() {
        let map = DuplicateMap::from_discovered(vec![
            DuplicatePair { later: 1, earlier: 0 },
            DuplicatePair { later: 5, earlier: 3 },
        ]);
        let t = map.translation(7).unwrap();
        let counts = [7];
        let remap = IndexRemapper::new(&t, &counts, 1, 0);

        let mut tris = vec![[0, 1, 2], [2, 3, 4]];
        remap.restore_duplicates(&mut tris);
        assert_eq!(tris, vec![[0, 2, 3], [3, 4, 6]]);
    }

    #[test]
    fn test_odd_ring_padding() {
        // outer ring of 3 points is padded by one vertex, the even hole is not
        let t = IndexTranslation::identity(7);
        let counts = [3, 4];
        let remap = IndexRemapper::new(&t, &counts, 2, 0);

        let mut tris = vec![[0, 1, 2], [3, 4, 5], [2, 3, 6]];
        remap.apply(&mut tris);
        assert_eq!(tris, vec![[0, 2, 4], [8, 10, 12], [4, 8, 14]]);
    }

    #[test]
    fn test_padding_accumulates() {
        let t = IndexTranslation::identity(11);
        let counts = [3, 3, 5];
        let remap = IndexRemapper::new(&t, &counts, 2, 4);

        // first point of every ring
        let mut tris = vec![[0, 3, 6]];
        remap.apply(&mut tris);
        // ring 1 starts behind 3 + 1 vertices, ring 2 behind 3 + 1 + 3 + 1
        assert_eq!(tris, vec![[4, 4 + 8, 4 + 16]]);
    }

    #[test]
    fn test_last_ring_never_padded() {
        let t = IndexTranslation::identity(7);
        let counts = [4, 3];
        let remap = IndexRemapper::new(&t, &counts, 2, 0);
        let mut tris = vec![[4, 5, 6]];
        remap.apply(&mut tris);
        assert_eq!(tris, vec![[8, 10, 12]]);
    }

    #[test]
    fn test_write_indices() {
        let mut out = [0i16; 7];
        write_indices(&[[0, 2, 4], [4, 6, 0]], false, &mut out).unwrap();
        assert_eq!(out, [0, 2, 4, 4, 6, 0, 0]);

        write_indices(&[[0, 2, 4]], true, &mut out).unwrap();
        assert_eq!(&out[..3], &[0, 4, 2]);
    }

    #[test]
    fn test_write_indices_errors() {
        let mut out = [7i16; 3];
        let err = write_indices(&[[0, 1, 2], [2, 3, 0]], false, &mut out).unwrap_err();
        assert!(matches!(err, TriangulationError::InvalidInput(_)));

        let err = write_indices(&[[0, 1, 40_000]], false, &mut out).unwrap_err();
        assert_eq!(err, TriangulationError::OutputOverflow { index: 40_000 });
        assert_eq!(out, [7, 7, 7]);
    }
}
