//! Error types for ring triangulation

use std::collections::TryReserveError;
use std::fmt;

/// Errors that can occur while preparing or triangulating a polygon
///
/// Every variant aborts the whole call: no partial triangle list is ever
/// written back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TriangulationError {
    /// A ring collapsed to zero (or fewer) points after closure normalization
    DegenerateRing {
        /// Ring index (0 is the outer boundary)
        ring: usize,
        /// Point count the ring would have been left with
        points: i64,
    },
    /// Geometry the hole seed heuristic cannot work with (zero-length edge,
    /// too few points, non-finite coordinates)
    InvalidGeometry(String),
    /// The engine could not triangulate the PSLG without changing its vertex set
    TriangulationRejected {
        /// Points handed to the engine
        points_in: usize,
        /// Points the engine ended up with
        points_out: usize,
        /// Short diagnostic
        reason: String,
    },
    /// A temporary buffer could not be allocated
    Allocation(String),
    /// Caller-supplied buffers or ring sizes are inconsistent
    InvalidInput(String),
    /// A remapped index does not fit the 16-bit output buffer
    OutputOverflow {
        /// The offending index
        index: usize,
    },
    /// The tessellation fallback backend failed
    TessellationFailed(String),
}

impl fmt::Display for TriangulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangulationError::DegenerateRing { ring, points } => {
                write!(f, "degenerate ring {}: {} points left", ring, points)
            }
            TriangulationError::InvalidGeometry(msg) => write!(f, "invalid geometry: {}", msg),
            TriangulationError::TriangulationRejected {
                points_in,
                points_out,
                reason,
            } => {
                write!(
                    f,
                    "polygon input is bad: points in {} out {} ({})",
                    points_in, points_out, reason
                )
            }
            TriangulationError::Allocation(msg) => write!(f, "allocation failed: {}", msg),
            TriangulationError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            TriangulationError::OutputOverflow { index } => {
                write!(f, "index {} does not fit a 16-bit index buffer", index)
            }
            TriangulationError::TessellationFailed(msg) => {
                write!(f, "tessellation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for TriangulationError {}

/// Result type alias for triangulation operations
pub type Result<T> = std::result::Result<T, TriangulationError>;

/// Allocate an empty `Vec` with room for `capacity` elements, reporting
/// failure instead of aborting.
pub(crate) fn try_with_capacity<T>(capacity: usize, what: &str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|e: TryReserveError| {
            TriangulationError::Allocation(format!("{} ({} elements): {}", what, capacity, e))
        })?;
    Ok(v)
}

/// Allocate a `Vec` of `len` copies of `value`, reporting failure instead of
/// aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T, what: &str) -> Result<Vec<T>> {
    let mut v = try_with_capacity(len, what)?;
    v.resize(len, value);
    Ok(v)
}
