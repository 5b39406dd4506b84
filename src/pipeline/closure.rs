//! Closure normalization
//!
//! Rings may arrive explicitly closed (first point repeated as last). The
//! triangulator wants implicitly closed rings, so the repeated point is
//! stripped. Only the outer ring is inspected: when it is closed, every ring
//! is assumed to be closed the same way.

use crate::error::{Result, TriangulationError};
use crate::ring::RingSet;

/// Whether the outer ring repeats its first point as its last
pub fn is_explicitly_closed(rings: &RingSet) -> bool {
    match rings.ring(0).and_then(|r| r.last().map(|last| (r.start, last))) {
        Some((first, last)) if first != last => {
            let p = rings.points();
            p[first].x == p[last].x && p[first].y == p[last].y
        }
        _ => false,
    }
}

/// Strip the explicit closing point of every ring
///
/// Returns `true` if points were removed. The ring set is left untouched on
/// error.
///
/// # Errors
///
/// Returns `DegenerateRing` if a ring would be left with no points.
pub fn normalize_closure(rings: &mut RingSet) -> Result<bool> {
    if !is_explicitly_closed(rings) {
        return Ok(false);
    }

    if let Some(ring) = rings.counts().iter().position(|&n| n <= 1) {
        return Err(TriangulationError::DegenerateRing {
            ring,
            points: rings.counts()[ring] as i64 - 1,
        });
    }

    let (points, counts) = rings.parts_mut();
    let mut cursor = 0usize;
    for count in counts.iter_mut() {
        *count -= 1;
        let last = cursor + *count;
        points.remove(last);
        cursor = last;
    }

    log::debug!("stripped closing point of {} rings", counts.len());
    Ok(true)
}
