//! Triangulator configuration and builder
//!
//! The heuristic constants of the pipeline (hole seed offset, the "long
//! enough" edge threshold, the vertex stride of the shared buffer) live here
//! as named, validated settings instead of being buried in the algorithms.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::{Result, TriangulationError};

/// Default inward offset of a hole seed from its edge midpoint, in input units
pub const DEFAULT_HOLE_SEED_OFFSET: f32 = 1.0;

/// Default minimum edge extent (on either axis) the hole seed walk looks for
pub const DEFAULT_HOLE_SEED_MIN_EDGE: f32 = 4.0;

/// Slots per vertex in the caller's interleaved (x, y) vertex buffer
pub const DEFAULT_VERTEX_STRIDE: usize = 2;

/// Point count from which the KD-tree duplicate scan replaces the pairwise one
pub const DEFAULT_SPATIAL_INDEX_THRESHOLD: usize = 64;

/// Largest stride a vertex buffer layout may use
pub(crate) const MAX_VERTEX_STRIDE: usize = 16;

/// Configuration for one [`Triangulator`](crate::Triangulator)
///
/// The same configuration is applied to every ring of every call, so all hole
/// seeds of one polygon use the same offset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulatorConfig {
    /// Distance a hole seed is pushed from the chosen edge's midpoint
    /// towards the hole interior
    ///
    /// - 1.0: default, assumes parallel hole edges are at least 2 units apart
    /// - 0.1: tighter, for small holes in unscaled coordinates
    pub hole_seed_offset: f32,

    /// Edge extent (|dx| or |dy|) above which the seed walk stops early
    pub hole_seed_min_edge: f32,

    /// Slots per vertex in the shared output vertex buffer
    pub vertex_stride: usize,

    /// Options handed to the triangulation engine
    pub engine: EngineOptions,

    /// Emit triangles in the opposite winding (swap 2nd and 3rd index)
    pub flip_winding: bool,

    /// Use the KD-tree duplicate scan from this many points on
    ///
    /// Only has an effect with the `spatial-index` feature.
    pub spatial_index_threshold: usize,
}

impl Default for TriangulatorConfig {
    fn default() -> Self {
        Self {
            hole_seed_offset: DEFAULT_HOLE_SEED_OFFSET,
            hole_seed_min_edge: DEFAULT_HOLE_SEED_MIN_EDGE,
            vertex_stride: DEFAULT_VERTEX_STRIDE,
            engine: EngineOptions::default(),
            flip_winding: false,
            spatial_index_threshold: DEFAULT_SPATIAL_INDEX_THRESHOLD,
        }
    }
}

/// Builder for creating a validated [`TriangulatorConfig`]
///
/// # Example
///
/// ```rust
/// use ring_cdt::*;
///
/// let config = TriangulatorConfigBuilder::new()
///     .hole_seed_offset(0.1)
///     .unwrap()
///     .flip_winding(true)
///     .build();
///
/// assert_eq!(config.hole_seed_offset, 0.1);
/// assert_eq!(config.vertex_stride, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TriangulatorConfigBuilder {
    config: TriangulatorConfig,
}

impl TriangulatorConfigBuilder {
    /// Create a builder holding the default configuration
    pub fn new() -> Self {
        Self {
            config: TriangulatorConfig::default(),
        }
    }

    /// Set the inward offset of hole seeds
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the offset is not a positive finite number
    pub fn hole_seed_offset(mut self, offset: f32) -> Result<Self> {
        if !offset.is_finite() || offset <= 0.0 {
            return Err(TriangulationError::InvalidInput(format!(
                "hole seed offset must be positive and finite (got {})",
                offset
            )));
        }
        self.config.hole_seed_offset = offset;
        Ok(self)
    }

    /// Set the edge extent threshold of the hole seed walk
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the threshold is negative or not finite
    pub fn hole_seed_min_edge(mut self, threshold: f32) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(TriangulationError::InvalidInput(format!(
                "hole seed edge threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.config.hole_seed_min_edge = threshold;
        Ok(self)
    }

    /// Set the vertex stride of the shared output buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the stride is 0 or larger than 16
    pub fn vertex_stride(mut self, stride: usize) -> Result<Self> {
        if stride == 0 || stride > MAX_VERTEX_STRIDE {
            return Err(TriangulationError::InvalidInput(format!(
                "vertex stride must be in 1..={} (got {})",
                MAX_VERTEX_STRIDE, stride
            )));
        }
        self.config.vertex_stride = stride;
        Ok(self)
    }

    /// Set the engine options
    pub fn engine(mut self, engine: EngineOptions) -> Self {
        self.config.engine = engine;
        self
    }

    /// Reverse the winding of emitted triangles
    pub fn flip_winding(mut self, flip: bool) -> Self {
        self.config.flip_winding = flip;
        self
    }

    /// Set the point count from which duplicates are found through a KD-tree
    pub fn spatial_index_threshold(mut self, points: usize) -> Self {
        self.config.spatial_index_threshold = points;
        self
    }

    /// Build the configuration
    pub fn build(self) -> TriangulatorConfig {
        self.config
    }
}

impl Default for TriangulatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = TriangulatorConfigBuilder::new().build();
        assert_eq!(config, TriangulatorConfig::default());
        assert_eq!(config.hole_seed_offset, 1.0);
        assert_eq!(config.hole_seed_min_edge, 4.0);
        assert_eq!(config.vertex_stride, 2);
        assert!(!config.flip_winding);
        assert!(config.engine.use_segments);
        assert!(config.engine.quiet);
    }

    #[test]
    fn test_builder_custom() {
        let config = TriangulatorConfigBuilder::new()
            .hole_seed_offset(0.1)
            .unwrap()
            .hole_seed_min_edge(2.0)
            .unwrap()
            .vertex_stride(4)
            .unwrap()
            .spatial_index_threshold(8)
            .build();

        assert_eq!(config.hole_seed_offset, 0.1);
        assert_eq!(config.hole_seed_min_edge, 2.0);
        assert_eq!(config.vertex_stride, 4);
        assert_eq!(config.spatial_index_threshold, 8);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(TriangulatorConfigBuilder::new().hole_seed_offset(0.0).is_err());
        assert!(TriangulatorConfigBuilder::new().hole_seed_offset(f32::NAN).is_err());
        assert!(TriangulatorConfigBuilder::new().hole_seed_min_edge(-1.0).is_err());
        assert!(TriangulatorConfigBuilder::new().vertex_stride(0).is_err());
        assert!(TriangulatorConfigBuilder::new().vertex_stride(17).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = TriangulatorConfigBuilder::new()
            .hole_seed_offset(0.25)
            .unwrap()
            .flip_winding(true)
            .build();

        let json = serde_json::to_string(&config).unwrap();
        let restored: TriangulatorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
