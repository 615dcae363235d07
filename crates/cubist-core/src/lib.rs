//! Shared types for the cubist voxel world: block values, chunk-space
//! coordinate math, the six-face table, errors and world configuration.

pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;

pub use config::{ConfigError, RegionShape, TerrainRule, WorldConfig};
pub use direction::{Face, ALL_FACES};
pub use error::CoreError;
pub use types::{Block, BlockId, ChunkCoord, LocalCoord, WorldCoord};
