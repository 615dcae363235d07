use std::collections::HashMap;

use cubist_core::constants::CHUNK_SIDE;
use cubist_core::direction::ALL_FACES;
use cubist_core::math::{world_to_chunk, world_to_local};
use cubist_core::types::{Block, ChunkCoord, WorldCoord};

use crate::chunk::Chunk;
use crate::state_machine::ChunkState;

/// Number of loaded chunks in each lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub to_generate: usize,
    pub to_mesh: usize,
    pub to_upload: usize,
    pub active: usize,
}

/// Sparse world index: sole owner of every loaded chunk.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh `ToGenerate` chunk. Returns false if one is already loaded.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        self.chunks.insert(coord, Chunk::new(coord));
        true
    }

    /// Insert a prebuilt chunk, replacing (and returning) any chunk at its coord.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.coord, chunk)
    }

    /// Take a chunk out of the index. The caller owns its GPU handle from here.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(coord)
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Block at a global coordinate; air when the owning chunk is not loaded.
    /// Never creates chunks.
    pub fn get_block(&self, world: WorldCoord) -> Block {
        match self.chunks.get(&world_to_chunk(world)) {
            Some(chunk) => chunk.get_in_bounds(world_to_local(world)),
            None => Block::AIR,
        }
    }

    /// Write a block at a global coordinate, returning the previous block.
    ///
    /// Creates an empty (already populated, all-air) chunk if none is loaded
    /// at the owning coordinate.
    pub fn set_block(&mut self, world: WorldCoord, block: Block) -> Block {
        let coord = world_to_chunk(world);
        let chunk = self
            .chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new_empty(coord));
        chunk.set_in_bounds(world_to_local(world), block)
    }

    pub fn remove_block(&mut self, world: WorldCoord) -> Block {
        self.set_block(world, Block::AIR)
    }

    /// The 6 face-adjacent chunk coordinates, in `ALL_FACES` order.
    pub fn face_neighbors(coord: &ChunkCoord) -> [ChunkCoord; 6] {
        ALL_FACES.map(|face| *coord + face.offset())
    }

    /// Chunks other than the owner whose boundary blocks touch `world`.
    /// Empty for blocks away from every chunk face.
    pub fn boundary_neighbors(world: WorldCoord) -> Vec<ChunkCoord> {
        let coord = world_to_chunk(world);
        let local = world_to_local(world);
        ALL_FACES
            .iter()
            .filter(|face| {
                let axis = face.axis();
                if face.is_positive() {
                    local[axis] == CHUNK_SIDE - 1
                } else {
                    local[axis] == 0
                }
            })
            .map(|face| coord + face.offset())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Remove every chunk, yielding ownership to the caller.
    pub fn drain(&mut self) -> impl Iterator<Item = Chunk> + '_ {
        self.chunks.drain().map(|(_, chunk)| chunk)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for chunk in self.chunks.values() {
            match chunk.state() {
                ChunkState::ToGenerate => counts.to_generate += 1,
                ChunkState::ToMesh => counts.to_mesh += 1,
                ChunkState::ToUpload => counts.to_upload += 1,
                ChunkState::Active => counts.active += 1,
                ChunkState::Unloading => {}
            }
        }
        counts
    }
}
