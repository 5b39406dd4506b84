//! Constrained triangulation of polygons with holes into 16-bit index buffers
//!
//! A polygon arrives as flat (x, y) coordinates plus per-ring sizes: the
//! first ring is the outer boundary, every following ring a hole. The rings
//! are normalized (explicit closing points stripped, coincident points
//! collapsed), triangulated with a constrained Delaunay engine, and the
//! triangles are written as `i16` indices into a shared vertex buffer with a
//! configurable stride and offset.
//!
//! # Quick Start
//!
//! ```rust
//! use ring_cdt::*;
//!
//! // 10x10 square with a clockwise 6x6 hole
//! let points = [
//!     0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0,
//!     2.0, 2.0, 2.0, 8.0, 8.0, 8.0, 8.0, 2.0,
//! ];
//! let mut ring_sizes = [8, 8];
//! let mut indices = [0i16; 64];
//!
//! let config = TriangulatorConfigBuilder::new()
//!     .hole_seed_offset(1.0).unwrap()
//!     .build();
//! let count = Triangulator::new(config)
//!     .triangulate(&points, 0, 8, &mut ring_sizes, 0, &mut indices)
//!     .unwrap();
//! assert_eq!(count, 8);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Finds coincident points of large rings through a KD-tree
//! - `serde`: Enables serialization support for configuration types

// Modules
pub mod error;
pub mod config;
pub mod ring;
pub mod pipeline;
pub mod engine;
pub mod triangulator;
pub mod tessellate;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{TriangulationError, Result};
pub use config::{TriangulatorConfig, TriangulatorConfigBuilder};
pub use ring::{Ring, RingSet};
pub use engine::{ConstrainedTriangulator, EngineOptions, EngineOutput, SpadeEngine};
pub use triangulator::{triangulate, triangulate_or_zero, Triangulator};
pub use tessellate::{EarcutTessellator, TessOutput, Tessellate, Tessellator};

#[cfg(feature = "spatial-index")]
pub use spatial::CoincidenceIndex;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
