//! Face-culled chunk meshing.
//!
//! Every opaque block emits one quad per face whose neighbour is not opaque.
//! Neighbours inside the chunk are read from its own storage; neighbours past
//! the chunk boundary go through the world index, which answers air for
//! chunks that are not loaded.

use cubist_core::constants::{FLOATS_PER_VERTEX, VERTICES_PER_QUAD};
use cubist_core::direction::{Face, ALL_FACES};
use cubist_core::math::{chunk_local_to_world, index_to_local, is_local_in_bounds};
use cubist_core::types::{Block, LocalCoord};
use cubist_render::MeshData;

use crate::chunk::Chunk;
use crate::chunk_map::ChunkMap;

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Block next to `local` across `face`, looking into neighbour chunks if needed.
fn neighbor_block(chunk: &Chunk, world: &ChunkMap, local: LocalCoord, face: Face) -> Block {
    let n = local + face.offset();
    if is_local_in_bounds(n) {
        chunk.get_in_bounds(n)
    } else {
        world.get_block(chunk_local_to_world(chunk.coord, n))
    }
}

/// Exposure bitmask of the block at `local` (see `Face::bit`).
/// Zero for air and other non-opaque blocks.
pub fn exposed_faces(chunk: &Chunk, world: &ChunkMap, local: LocalCoord) -> u8 {
    let block = chunk.get_in_bounds(local);
    if block.is_air() || !block.opaque {
        return 0;
    }
    ALL_FACES
        .iter()
        .filter(|&&face| !neighbor_block(chunk, world, local, face).opaque)
        .fold(0u8, |mask, face| mask | face.bit())
}

fn face_quad(local: LocalCoord, face: Face) -> [[f32; FLOATS_PER_VERTEX]; VERTICES_PER_QUAD] {
    let base = local.as_vec3();
    let shade = face.shading_id() as f32;
    let corners = face.corners();
    std::array::from_fn(|i| {
        let [cx, cy, cz] = corners[i];
        let [u, v] = QUAD_UVS[i];
        [base.x + cx, base.y + cy, base.z + cz, u, v, shade]
    })
}

/// Rebuild `out` from scratch for `chunk`.
pub fn mesh_into(chunk: &Chunk, world: &ChunkMap, out: &mut MeshData) {
    out.clear();
    for (i, block) in chunk.blocks().iter().enumerate() {
        if block.is_air() || !block.opaque {
            continue;
        }
        let local = index_to_local(i);
        let mask = exposed_faces(chunk, world, local);
        if mask == 0 {
            continue;
        }
        for face in ALL_FACES {
            if mask & face.bit() != 0 {
                out.push_quad(&face_quad(local, face));
            }
        }
    }
}

pub fn mesh_chunk(chunk: &Chunk, world: &ChunkMap) -> MeshData {
    let mut mesh = MeshData::new();
    mesh_into(chunk, world, &mut mesh);
    mesh
}
