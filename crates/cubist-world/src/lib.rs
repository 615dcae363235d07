//! Chunked voxel world: block storage, the world index, face-culled meshing
//! and the streaming chunk manager.

pub mod chunk;
pub mod chunk_map;
pub mod manager;
pub mod mesher;
pub mod queue;
pub mod state_machine;
pub mod streaming;
pub mod terrain;

pub use chunk::Chunk;
pub use chunk_map::{ChunkMap, StateCounts};
pub use manager::{viewpoint_chunk, ChunkManager, DrawStats, FrameStats, ReconcileReport};
pub use mesher::{mesh_chunk, mesh_into};
pub use queue::ChunkQueue;
pub use state_machine::ChunkState;
pub use streaming::{compute_desired_region, RegionDiff, StreamingPolicy};
pub use terrain::TerrainGenerator;
