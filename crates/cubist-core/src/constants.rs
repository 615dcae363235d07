//! Single source of truth for shared constants.
//! Storage, mesher and terrain all size their loops from these values.

/// Side length of a chunk in blocks.
pub const CHUNK_SIDE: i32 = 32;

/// Number of blocks in one XY slice of a chunk (CHUNK_SIDE^2).
pub const CHUNK_AREA: usize = (CHUNK_SIDE * CHUNK_SIDE) as usize;

/// Total blocks per chunk (CHUNK_SIDE^3).
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_SIDE as usize;

/// Block ids below this value are transparent. Id 0 is air.
pub const FIRST_OPAQUE_ID: u16 = 24;

/// Floats per mesh vertex: position (3), uv (2), face id (1).
pub const FLOATS_PER_VERTEX: usize = 6;

/// Vertices emitted per visible face.
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices emitted per visible face (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Default radius, in chunks, of the loaded region around the viewpoint.
pub const DEFAULT_LOAD_RADIUS: i32 = 2;

/// Default number of chunks generated per frame.
pub const DEFAULT_GENERATE_BATCH: usize = 9;

/// Default number of chunks meshed per frame.
pub const DEFAULT_MESH_BATCH: usize = 9;

/// Default terrain seed.
pub const DEFAULT_SEED: u32 = 7;

/// Largest rolling-terrain amplitude, in blocks, that config accepts.
pub const MAX_TERRAIN_AMPLITUDE: f32 = 1_000_000.0;

/// Uniform carrying a chunk's world-space block offset to the vertex shader.
pub const CHUNK_OFFSET_UNIFORM: &str = "u_chunk_offset";
