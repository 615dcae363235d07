use crate::constants::{CHUNK_AREA, CHUNK_SIDE, CHUNK_VOLUME};
use crate::error::CoreError;
use crate::types::{ChunkCoord, LocalCoord, WorldCoord};
use glam::IVec3;

/// Convert a global block coordinate to its containing chunk coordinate.
/// Floor division, so -1 maps to chunk -1 rather than chunk 0.
pub fn world_to_chunk(world: WorldCoord) -> ChunkCoord {
    IVec3::new(
        world.x.div_euclid(CHUNK_SIDE),
        world.y.div_euclid(CHUNK_SIDE),
        world.z.div_euclid(CHUNK_SIDE),
    )
}

/// Convert a global block coordinate to its offset within the owning chunk.
/// Always non-negative.
pub fn world_to_local(world: WorldCoord) -> LocalCoord {
    IVec3::new(
        world.x.rem_euclid(CHUNK_SIDE),
        world.y.rem_euclid(CHUNK_SIDE),
        world.z.rem_euclid(CHUNK_SIDE),
    )
}

/// Global coordinate of the chunk's (0, 0, 0) block.
pub fn chunk_origin(chunk: ChunkCoord) -> WorldCoord {
    chunk * CHUNK_SIDE
}

/// Convert a chunk coordinate and local offset back to a global coordinate.
pub fn chunk_local_to_world(chunk: ChunkCoord, local: LocalCoord) -> WorldCoord {
    chunk_origin(chunk) + local
}

/// Whether every axis of `local` lies in [0, CHUNK_SIDE).
pub fn is_local_in_bounds(local: LocalCoord) -> bool {
    local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(CHUNK_SIDE)).all()
}

/// Flat array index of a local coordinate: `x + y*SIDE + z*SIDE^2`.
///
/// This is the only place the storage order is spelled out. Storage, mesher
/// and terrain generation all go through it (or its inverse below).
pub fn local_index(local: LocalCoord) -> Result<usize, CoreError> {
    if !is_local_in_bounds(local) {
        return Err(CoreError::OutOfRange { local });
    }
    Ok(flat_index(local))
}

/// Unchecked variant of [`local_index`] for loops that have already proven
/// the coordinate is in range.
#[inline]
pub fn flat_index(local: LocalCoord) -> usize {
    debug_assert!(is_local_in_bounds(local), "local {local} out of range");
    local.x as usize + local.y as usize * CHUNK_SIDE as usize + local.z as usize * CHUNK_AREA
}

/// Inverse of [`flat_index`].
#[inline]
pub fn index_to_local(index: usize) -> LocalCoord {
    debug_assert!(index < CHUNK_VOLUME);
    let side = CHUNK_SIDE as usize;
    IVec3::new(
        (index % side) as i32,
        ((index / side) % side) as i32,
        (index / CHUNK_AREA) as i32,
    )
}
