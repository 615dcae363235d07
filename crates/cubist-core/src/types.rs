use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::constants::FIRST_OPAQUE_ID;

/// Newtype for block type identifiers. 0 = air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u16);

/// Chunk coordinate in chunk-space (each unit = CHUNK_SIDE blocks).
pub type ChunkCoord = IVec3;

/// Global coordinate in block-space.
pub type WorldCoord = IVec3;

/// Block coordinate relative to the owning chunk's origin, each axis in [0, CHUNK_SIDE).
pub type LocalCoord = IVec3;

/// A single cell of the block grid.
///
/// `opaque` is always derived from the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block {
    pub id: BlockId,
    pub opaque: bool,
}

impl Block {
    pub const AIR: Block = Block::from_id(BlockId(0));
    pub const GLASS: Block = Block::from_id(BlockId(1));
    pub const DIRT: Block = Block::from_id(BlockId(24));
    pub const STONE: Block = Block::from_id(BlockId(25));
    pub const GRASS: Block = Block::from_id(BlockId(26));

    /// Build a block from its id. Ids below FIRST_OPAQUE_ID are transparent.
    pub const fn from_id(id: BlockId) -> Self {
        Self {
            id,
            opaque: id.0 >= FIRST_OPAQUE_ID,
        }
    }

    /// Air contributes no geometry and never occludes.
    pub fn is_air(&self) -> bool {
        self.id.0 == 0
    }
}

impl From<BlockId> for Block {
    fn from(id: BlockId) -> Self {
        Block::from_id(id)
    }
}
