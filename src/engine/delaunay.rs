//! Constrained Delaunay triangulation via spade
//!
//! Points are inserted (one by one or bulk loaded), ring segments become
//! constraint edges, and triangles outside the outer ring or inside a hole
//! are removed by flooding from the convex hull and from each hole seed.
//! Floods never cross a constraint edge.
//!
//! A segment that would cross an existing constraint is not inserted. Each
//! such crossing is reported as an extra output point, the way a refining
//! triangulator would have to split the segments, so the adapter rejects the
//! polygon.

use std::collections::HashMap;

use glam::Vec2;
use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2, PositionInTriangulation,
    Triangulation,
};

use super::{ConstrainedTriangulator, EngineOptions, EngineOutput};
use crate::error::{try_filled, try_with_capacity, Result, TriangulationError};
use crate::pipeline::pslg::Pslg;

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Default engine, backed by spade's constrained Delaunay triangulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeEngine;

impl SpadeEngine {
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn to_point(p: Vec2) -> Point2<f64> {
    Point2::new(f64::from(p.x), f64::from(p.y))
}

fn insertion_error(err: InsertionError) -> TriangulationError {
    TriangulationError::InvalidGeometry(format!("engine refused point: {:?}", err))
}

/// Insert every point, returning the triangulation and the vertex handle of
/// each input point
fn insert_points(
    points: &[Vec2],
    bulk: bool,
) -> Result<(Cdt, Vec<Option<FixedVertexHandle>>)> {
    if bulk {
        let cdt = Cdt::bulk_load(points.iter().map(|&p| to_point(p)).collect())
            .map_err(insertion_error)?;

        // bulk loading reorders vertices, find them again by position
        let mut by_position: HashMap<(u64, u64), usize> = HashMap::new();
        by_position.try_reserve(points.len()).map_err(|e| {
            TriangulationError::Allocation(format!("vertex lookup ({} points): {}", points.len(), e))
        })?;
        for (i, p) in points.iter().enumerate() {
            let q = to_point(*p);
            by_position.entry((q.x.to_bits(), q.y.to_bits())).or_insert(i);
        }
        let mut handles = try_filled(points.len(), None, "vertex handles")?;
        for v in cdt.vertices() {
            let pos = v.position();
            if let Some(&i) = by_position.get(&(pos.x.to_bits(), pos.y.to_bits())) {
                handles[i] = Some(v.fix());
            }
        }
        Ok((cdt, handles))
    } else {
        let mut cdt = Cdt::new();
        let mut handles = try_with_capacity(points.len(), "vertex handles")?;
        for &p in points {
            handles.push(Some(cdt.insert(to_point(p)).map_err(insertion_error)?));
        }
        Ok((cdt, handles))
    }
}

/// Add the PSLG segments as constraints, returning the number of segments
/// that crossed an existing constraint
fn insert_constraints(
    cdt: &mut Cdt,
    pslg: &Pslg,
    handles: &[Option<FixedVertexHandle>],
    level: log::Level,
) -> usize {
    let mut crossings = 0;
    for seg in &pslg.segments {
        if seg.is_loop() {
            continue;
        }
        let (Some(from), Some(to)) = (handles[seg.from], handles[seg.to]) else {
            continue;
        };
        if from == to {
            continue;
        }
        if cdt.can_add_constraint(from, to) {
            if !cdt.add_constraint(from, to) {
                log::log!(level, "segment {} -> {} already constrained", seg.from, seg.to);
            }
        } else {
            log::log!(level, "segment {} -> {} crosses a constraint", seg.from, seg.to);
            crossings += 1;
        }
    }
    crossings
}

/// Mark every face reachable from `stack` without crossing a constraint
fn flood(cdt: &Cdt, stack: &mut Vec<FixedFaceHandle<InnerTag>>, removed: &mut [bool]) {
    while let Some(fix) = stack.pop() {
        if removed[fix.index()] {
            continue;
        }
        removed[fix.index()] = true;

        for edge in cdt.face(fix).adjacent_edges() {
            if cdt.is_constraint_edge(edge.fix().as_undirected()) {
                continue;
            }
            if let Some(next) = edge.rev().face().as_inner() {
                if !removed[next.fix().index()] {
                    stack.push(next.fix());
                }
            }
        }
    }
}

/// Flags, indexed by face, of the triangles outside the polygon or in a hole
fn carve(cdt: &Cdt, holes: &[Vec2], level: log::Level) -> Result<Vec<bool>> {
    let mut removed = try_filled(cdt.num_all_faces(), false, "face flags")?;
    let mut stack = Vec::new();

    // exterior: hull triangles not shielded by a constraint
    for edge in cdt.directed_edges() {
        if !edge.face().is_outer() || cdt.is_constraint_edge(edge.fix().as_undirected()) {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            stack.push(inner.fix());
        }
    }
    flood(cdt, &mut stack, &mut removed);

    for (i, &seed) in holes.iter().enumerate() {
        match cdt.locate(to_point(seed)) {
            PositionInTriangulation::OnFace(face) => stack.push(face),
            PositionInTriangulation::OnEdge(edge) => {
                let edge = cdt.directed_edge(edge);
                if let Some(face) = edge.face().as_inner().or_else(|| edge.rev().face().as_inner()) {
                    stack.push(face.fix());
                }
            }
            _ => {
                log::log!(
                    level,
                    "hole {} seed ({}, {}) is not inside the triangulation",
                    i,
                    seed.x,
                    seed.y
                );
            }
        }
    }
    flood(cdt, &mut stack, &mut removed);

    Ok(removed)
}

impl ConstrainedTriangulator for SpadeEngine {
    fn triangulate(&self, pslg: &Pslg, options: &EngineOptions) -> Result<EngineOutput> {
        let level = options.diagnostics_level();
        let (mut cdt, handles) = insert_points(&pslg.points, options.divide_and_conquer)?;

        let mut input_index = try_filled(cdt.num_vertices(), usize::MAX, "vertex index map")?;
        for (i, handle) in handles.iter().enumerate() {
            if let Some(h) = handle {
                if input_index[h.index()] == usize::MAX {
                    input_index[h.index()] = i;
                }
            }
        }

        let (crossings, removed) = if options.use_segments {
            let crossings = insert_constraints(&mut cdt, pslg, &handles, level);
            (crossings, carve(&cdt, &pslg.holes, level)?)
        } else {
            (0, try_filled(cdt.num_all_faces(), false, "face flags")?)
        };

        let triangles: Vec<[usize; 3]> = cdt
            .inner_faces()
            .filter(|face| !removed[face.fix().index()])
            .map(|face| face.vertices().map(|v| input_index[v.fix().index()]))
            .collect();

        log::log!(
            level,
            "engine: {} vertices, {} constraints, {} crossings, {} of {} faces kept",
            cdt.num_vertices(),
            cdt.num_constraints(),
            crossings,
            triangles.len(),
            cdt.num_inner_faces()
        );

        Ok(EngineOutput {
            point_count: cdt.num_vertices() + crossings,
            triangles,
        })
    }
}
