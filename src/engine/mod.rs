//! Triangulation engine seam
//!
//! The constrained Delaunay triangulation itself is an external concern.
//! [`ConstrainedTriangulator`] is the contract, [`SpadeEngine`] the default
//! implementation, and [`run`] the adapter that invokes an engine and
//! rejects any output that does not map one-to-one onto the input points.

mod delaunay;

pub use self::delaunay::SpadeEngine;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriangulationError};
use crate::pipeline::pslg::Pslg;

/// Switches handed to the engine
///
/// Steiner points and area constraints are refinement features and are never
/// requested; output indices always follow the input point order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Treat segments as hard constraints and carve exterior and holes
    ///
    /// Without it the convex hull of the points is triangulated and hole
    /// seeds are ignored.
    pub use_segments: bool,
    /// Keep engine diagnostics at trace level
    pub quiet: bool,
    /// Build the initial triangulation in one batch instead of point by point
    pub divide_and_conquer: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            use_segments: true,
            quiet: true,
            divide_and_conquer: true,
        }
    }
}

impl EngineOptions {
    /// Log level for engine diagnostics
    pub fn diagnostics_level(&self) -> log::Level {
        if self.quiet {
            log::Level::Trace
        } else {
            log::Level::Debug
        }
    }
}

/// Raw engine result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Points in the final mesh, including any the engine would have inserted
    pub point_count: usize,
    /// Counter-clockwise triangles, as indices into the input point list
    pub triangles: Vec<[usize; 3]>,
}

/// A constrained Delaunay triangulation engine
pub trait ConstrainedTriangulator {
    /// Triangulate `pslg`, honoring its segments and hole seeds
    fn triangulate(&self, pslg: &Pslg, options: &EngineOptions) -> Result<EngineOutput>;
}

impl<T: ConstrainedTriangulator + ?Sized> ConstrainedTriangulator for &T {
    fn triangulate(&self, pslg: &Pslg, options: &EngineOptions) -> Result<EngineOutput> {
        (**self).triangulate(pslg, options)
    }
}

/// Invoke `engine` and validate its output
///
/// # Errors
///
/// `TriangulationRejected` if the engine's point count differs from the
/// input (crossing segments, merged points), if no triangle was produced, or
/// if a triangle references an unknown point. Engine errors are passed
/// through.
pub fn run<E>(engine: &E, pslg: &Pslg, options: &EngineOptions) -> Result<Vec<[usize; 3]>>
where
    E: ConstrainedTriangulator + ?Sized,
{
    let points_in = pslg.points.len();
    let out = engine.triangulate(pslg, options)?;

    let reject = |reason: &str| {
        log::warn!(
            "polygon input is bad! points in:{} out:{} ({})",
            points_in,
            out.point_count,
            reason
        );
        pslg.log_poly(log::Level::Debug);
        TriangulationError::TriangulationRejected {
            points_in,
            points_out: out.point_count,
            reason: reason.to_string(),
        }
    };

    if out.point_count > points_in {
        return Err(reject("segments intersect"));
    }
    if out.point_count < points_in {
        return Err(reject("points were merged"));
    }
    if out.triangles.is_empty() {
        return Err(reject("no triangles"));
    }
    if out.triangles.iter().flatten().any(|&i| i >= points_in) {
        return Err(reject("triangle references unknown point"));
    }

    log::log!(
        options.diagnostics_level(),
        "triangles: {}",
        out.triangles.len()
    );
    Ok(out.triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    struct Canned(EngineOutput);

    impl ConstrainedTriangulator for Canned {
        fn triangulate(&self, _: &Pslg, _: &EngineOptions) -> Result<EngineOutput> {
            Ok(self.0.clone())
        }
    }

    fn triangle_pslg() -> Pslg {
        Pslg {
            points: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            segments: Vec::new(),
            holes: Vec::new(),
        }
    }

    #[test]
    fn test_accepts_consistent_output() {
        let engine = Canned(EngineOutput {
            point_count: 3,
            triangles: vec![[0, 1, 2]],
        });
        let tris = run(&engine, &triangle_pslg(), &EngineOptions::default()).unwrap();
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_rejects_added_points() {
        let engine = Canned(EngineOutput {
            point_count: 4,
            triangles: vec![[0, 1, 2]],
        });
        let err = run(&engine, &triangle_pslg(), &EngineOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            TriangulationError::TriangulationRejected {
                points_in: 3,
                points_out: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_merged_points() {
        let engine = Canned(EngineOutput {
            point_count: 2,
            triangles: vec![[0, 1, 2]],
        });
        assert!(run(&engine, &triangle_pslg(), &EngineOptions::default()).is_err());
    }

    #[test]
    fn test_rejects_empty_and_out_of_range() {
        let empty = Canned(EngineOutput {
            point_count: 3,
            triangles: Vec::new(),
        });
        assert!(run(&empty, &triangle_pslg(), &EngineOptions::default()).is_err());

        let wild = Canned(EngineOutput {
            point_count: 3,
            triangles: vec![[0, 1, 3]],
        });
        assert!(run(&wild, &triangle_pslg(), &EngineOptions::default()).is_err());
    }
}
