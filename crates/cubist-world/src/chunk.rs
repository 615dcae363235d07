use cubist_core::constants::CHUNK_VOLUME;
use cubist_core::math::{chunk_origin, flat_index, local_index};
use cubist_core::types::{Block, ChunkCoord, LocalCoord, WorldCoord};
use cubist_core::CoreError;
use cubist_render::{MeshData, MeshHandle};

use crate::state_machine::{can_transition, ChunkState};

/// One chunk: dense block storage, its derived mesh and its lifecycle stage.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    pub coord: ChunkCoord,
    blocks: Box<[Block]>,
    /// CPU mesh. Only meaningful once the chunk reached `ToUpload`.
    pub mesh: MeshData,
    state: ChunkState,
    /// GPU buffers, created on first upload.
    pub(crate) gpu: Option<MeshHandle>,
}

impl Chunk {
    /// All-air chunk waiting for generation.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![Block::AIR; CHUNK_VOLUME].into_boxed_slice(),
            mesh: MeshData::new(),
            state: ChunkState::ToGenerate,
            gpu: None,
        }
    }

    /// All-air chunk whose content counts as populated (no generation pass).
    pub fn new_empty(coord: ChunkCoord) -> Self {
        Self {
            state: ChunkState::ToMesh,
            ..Self::new(coord)
        }
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn gpu_handle(&self) -> Option<MeshHandle> {
        self.gpu
    }

    /// World-space block coordinate of local (0, 0, 0).
    pub fn world_offset(&self) -> WorldCoord {
        chunk_origin(self.coord)
    }

    pub fn get(&self, local: LocalCoord) -> Result<Block, CoreError> {
        Ok(self.blocks[local_index(local)?])
    }

    /// Overwrite one block, returning the previous one.
    pub fn set(&mut self, local: LocalCoord, block: Block) -> Result<Block, CoreError> {
        let idx = local_index(local)?;
        Ok(std::mem::replace(&mut self.blocks[idx], block))
    }

    /// Read a block whose coordinate the caller already proved in range.
    #[inline]
    pub(crate) fn get_in_bounds(&self, local: LocalCoord) -> Block {
        self.blocks[flat_index(local)]
    }

    #[inline]
    pub(crate) fn set_in_bounds(&mut self, local: LocalCoord, block: Block) -> Block {
        std::mem::replace(&mut self.blocks[flat_index(local)], block)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Replace the whole block array with generated content.
    ///
    /// Returns false (and leaves the chunk untouched) if `blocks` is not
    /// exactly one chunk's volume.
    pub fn fill(&mut self, blocks: Box<[Block]>) -> bool {
        if blocks.len() != CHUNK_VOLUME {
            log::warn!(
                "Chunk {:?}: rejected fill of {} blocks (expected {})",
                self.coord,
                blocks.len(),
                CHUNK_VOLUME
            );
            return false;
        }
        self.blocks = blocks;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// Move to `to` if the edge is legal. Illegal edges are logged and ignored.
    pub fn transition(&mut self, to: ChunkState) -> bool {
        if !can_transition(self.state, to) {
            log::warn!(
                "Chunk {:?}: illegal transition {:?} -> {:?}",
                self.coord,
                self.state,
                to
            );
            return false;
        }
        log::trace!("Chunk {:?}: {:?} -> {:?}", self.coord, self.state, to);
        self.state = to;
        true
    }

    /// Force a generated chunk back to `ToMesh`. Returns true if the chunk is
    /// now waiting for a remesh; chunks still waiting for generation (or
    /// unloading) are left alone.
    pub fn mark_dirty(&mut self) -> bool {
        match self.state {
            ChunkState::ToMesh => true,
            ChunkState::ToUpload | ChunkState::Active => self.transition(ChunkState::ToMesh),
            ChunkState::ToGenerate | ChunkState::Unloading => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_new_chunk_is_air_and_waiting() {
        let chunk = Chunk::new(IVec3::new(1, -2, 3));
        assert_eq!(chunk.blocks().len(), CHUNK_VOLUME);
        assert!(chunk.is_empty());
        assert_eq!(chunk.state(), ChunkState::ToGenerate);
        assert_eq!(chunk.world_offset(), IVec3::new(32, -64, 96));
        assert!(chunk.gpu_handle().is_none());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        let local = IVec3::new(3, 31, 0);
        assert_eq!(chunk.set(local, Block::STONE), Ok(Block::AIR));
        assert_eq!(chunk.set(local, Block::DIRT), Ok(Block::STONE));
        assert_eq!(chunk.get(local), Ok(Block::DIRT));
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_out_of_range_local_fails() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        for bad in [IVec3::new(-1, 0, 0), IVec3::new(0, 32, 0), IVec3::new(0, 0, 40)] {
            assert_eq!(chunk.get(bad), Err(CoreError::OutOfRange { local: bad }));
            assert!(chunk.set(bad, Block::STONE).is_err());
        }
    }

    #[test]
    fn test_fill_rejects_wrong_length() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        assert!(!chunk.fill(vec![Block::STONE; 10].into_boxed_slice()));
        assert!(chunk.is_empty());
        assert!(chunk.fill(vec![Block::STONE; CHUNK_VOLUME].into_boxed_slice()));
        assert_eq!(chunk.get(IVec3::new(31, 31, 31)), Ok(Block::STONE));
    }

    #[test]
    fn test_dirty_keeps_content_and_skips_ungenerated() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        assert!(!chunk.mark_dirty());
        assert_eq!(chunk.state(), ChunkState::ToGenerate);

        assert!(chunk.transition(ChunkState::ToMesh));
        chunk.set(IVec3::ZERO, Block::GRASS).expect("in range");
        assert!(chunk.transition(ChunkState::ToUpload));
        assert!(chunk.transition(ChunkState::Active));
        assert!(chunk.mark_dirty());
        assert_eq!(chunk.state(), ChunkState::ToMesh);
        assert_eq!(chunk.get(IVec3::ZERO), Ok(Block::GRASS));
    }

    #[test]
    fn test_unloading_blocks_further_transitions() {
        let mut chunk = Chunk::new_empty(IVec3::ZERO);
        assert_eq!(chunk.state(), ChunkState::ToMesh);
        assert!(chunk.transition(ChunkState::Unloading));
        assert!(!chunk.transition(ChunkState::ToUpload));
        assert!(!chunk.mark_dirty());
        assert_eq!(chunk.state(), ChunkState::Unloading);
    }
}
