use std::f32::consts::TAU;

use cubist_core::config::TerrainRule;
use cubist_core::constants::{CHUNK_SIDE, CHUNK_VOLUME};
use cubist_core::math::{chunk_origin, flat_index};
use cubist_core::types::{Block, ChunkCoord, WorldCoord};
use glam::IVec3;

/// Dirt layers between the grass surface and stone.
const DIRT_DEPTH: i32 = 3;

/// Placeholder terrain: a pure function of global block coordinates.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    rule: TerrainRule,
    phase_x: f32,
    phase_z: f32,
}

impl TerrainGenerator {
    pub fn new(rule: TerrainRule, seed: u32) -> Self {
        // Seed only shifts the rolling field; the other rules ignore it.
        let phase_x = (seed.wrapping_mul(2_654_435_761) % 4096) as f32;
        let phase_z = (seed.wrapping_mul(40_503).wrapping_add(1013) % 4096) as f32;
        Self {
            rule,
            phase_x,
            phase_z,
        }
    }

    /// Y of the topmost solid block in column (x, z). None for an empty world,
    /// `i32::MAX` for a solid one.
    pub fn surface_height(&self, wx: i32, wz: i32) -> Option<i32> {
        match self.rule {
            TerrainRule::Empty => None,
            TerrainRule::Solid => Some(i32::MAX),
            TerrainRule::Flat { height } => Some(height),
            TerrainRule::Rolling {
                base_height,
                amplitude,
                wavelength,
            } => {
                let fx = (wx as f32 + self.phase_x) / wavelength * TAU;
                let fz = (wz as f32 + self.phase_z) / wavelength * TAU;
                let h = fx.sin() * 0.6 + fz.cos() * 0.4;
                Some(base_height.saturating_add((h * amplitude).round() as i32))
            }
        }
    }

    /// Block at `wy` in a column whose surface is at `surface`.
    fn layer(&self, surface: Option<i32>, wy: i32) -> Block {
        let Some(top) = surface else {
            return Block::AIR;
        };
        if self.rule == TerrainRule::Solid {
            return Block::STONE;
        }
        if wy > top {
            Block::AIR
        } else if wy == top {
            Block::GRASS
        } else if wy >= top.saturating_sub(DIRT_DEPTH) {
            Block::DIRT
        } else {
            Block::STONE
        }
    }

    pub fn block_at(&self, world: WorldCoord) -> Block {
        self.layer(self.surface_height(world.x, world.z), world.y)
    }

    /// Fill one chunk's worth of blocks, indexed through `flat_index`.
    pub fn generate_blocks(&self, coord: ChunkCoord) -> Box<[Block]> {
        let mut blocks = vec![Block::AIR; CHUNK_VOLUME].into_boxed_slice();
        let origin = chunk_origin(coord);

        for lz in 0..CHUNK_SIDE {
            for lx in 0..CHUNK_SIDE {
                let surface = self.surface_height(origin.x + lx, origin.z + lz);
                if surface.is_some_and(|top| top < origin.y) {
                    continue;
                }
                for ly in 0..CHUNK_SIDE {
                    let block = self.layer(surface, origin.y + ly);
                    if !block.is_air() {
                        blocks[flat_index(IVec3::new(lx, ly, lz))] = block;
                    }
                }
            }
        }

        blocks
    }
}
