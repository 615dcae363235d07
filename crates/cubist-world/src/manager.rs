use std::collections::HashSet;

use cubist_core::config::{ConfigError, WorldConfig};
use cubist_core::constants::CHUNK_OFFSET_UNIFORM;
use cubist_core::math::world_to_chunk;
use cubist_core::types::{Block, ChunkCoord, WorldCoord};
use cubist_render::{GpuBackend, MeshData, MeshHandle, UniformValue};
use glam::Vec3;
use rayon::prelude::*;

use crate::chunk_map::{ChunkMap, StateCounts};
use crate::mesher;
use crate::queue::ChunkQueue;
use crate::state_machine::ChunkState;
use crate::streaming::{diff_region, sort_coords, StreamingPolicy};
use crate::terrain::TerrainGenerator;

/// Outcome of one reconcile pass, each list in x, y, z order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub loaded: Vec<ChunkCoord>,
    pub unloaded: Vec<ChunkCoord>,
    /// Surviving face-neighbours forced back to `ToMesh`.
    pub dirtied: Vec<ChunkCoord>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty() && self.dirtied.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub uploaded: usize,
    pub drawn: usize,
    /// GPU handles destroyed for chunks unloaded since the last draw.
    pub released: usize,
}

/// Per-frame counters returned by `ChunkManager::tick`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub loaded: usize,
    pub unloaded: usize,
    pub dirtied: usize,
    pub generated: usize,
    pub meshed: usize,
    pub uploaded: usize,
    pub drawn: usize,
    pub released: usize,
}

/// Chunk of the block containing `viewpoint`.
pub fn viewpoint_chunk(viewpoint: Vec3) -> ChunkCoord {
    world_to_chunk(viewpoint.floor().as_ivec3())
}

/// Streams chunks around a moving viewpoint through
/// generate -> mesh -> upload -> draw.
///
/// The manager owns the world index exclusively. Generation and meshing run
/// as rayon batches that complete before any reconcile or edit runs, so a
/// chunk is never removed while a job reads it.
pub struct ChunkManager {
    config: WorldConfig,
    map: ChunkMap,
    terrain: TerrainGenerator,
    policy: StreamingPolicy,
    generate_queue: ChunkQueue,
    mesh_queue: ChunkQueue,
    center: Option<ChunkCoord>,
    /// Handles of unloaded chunks, destroyed on the next draw.
    pending_release: Vec<MeshHandle>,
}

impl ChunkManager {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let terrain = TerrainGenerator::new(config.terrain, config.seed);
        let policy = StreamingPolicy::from_config(&config);
        Ok(Self {
            config,
            map: ChunkMap::new(),
            terrain,
            policy,
            generate_queue: ChunkQueue::new(),
            mesh_queue: ChunkQueue::new(),
            center: None,
            pending_release: Vec::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn map(&self) -> &ChunkMap {
        &self.map
    }

    pub fn policy(&self) -> &StreamingPolicy {
        &self.policy
    }

    /// Viewpoint chunk of the last reconcile.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn get_block(&self, world: WorldCoord) -> Block {
        self.map.get_block(world)
    }

    pub fn loaded_count(&self) -> usize {
        self.map.loaded_count()
    }

    pub fn state_counts(&self) -> StateCounts {
        self.map.state_counts()
    }

    pub fn pending_generate(&self) -> usize {
        self.generate_queue.len()
    }

    pub fn pending_mesh(&self) -> usize {
        self.mesh_queue.len()
    }

    pub fn pending_release(&self) -> usize {
        self.pending_release.len()
    }

    /// Reconcile if the viewpoint moved into another chunk (or on first call).
    pub fn update(&mut self, viewpoint: Vec3) -> ReconcileReport {
        let center = viewpoint_chunk(viewpoint);
        if self.center == Some(center) {
            return ReconcileReport::default();
        }
        let desired = self.policy.desired_region(center);
        self.reconcile(center, &desired)
    }

    /// Load every coord of `desired` that is missing and evict loaded chunks
    /// that the policy puts past the unload radius around `center`. Loaded
    /// face-neighbours of every loaded or evicted chunk are flagged dirty.
    pub fn reconcile(
        &mut self,
        center: ChunkCoord,
        desired: &HashSet<ChunkCoord>,
    ) -> ReconcileReport {
        self.center = Some(center);
        let diff = diff_region(&self.policy, center, desired, self.map.coords());

        for coord in &diff.to_unload {
            self.unload(coord);
        }
        for &coord in &diff.to_load {
            if self.map.load_chunk(coord) {
                self.generate_queue.push(coord);
            }
        }

        let fresh: HashSet<ChunkCoord> = diff.to_load.iter().copied().collect();
        let mut dirtied = HashSet::new();
        for coord in diff.to_load.iter().chain(&diff.to_unload) {
            for n in ChunkMap::face_neighbors(coord) {
                if !fresh.contains(&n) && self.flag_dirty(n) {
                    dirtied.insert(n);
                }
            }
        }

        let mut report = ReconcileReport {
            loaded: diff.to_load,
            unloaded: diff.to_unload,
            dirtied: dirtied.into_iter().collect(),
        };
        sort_coords(&mut report.dirtied);

        log::info!(
            "Reconcile around {center}: {} loaded, {} unloaded, {} dirtied ({} resident)",
            report.loaded.len(),
            report.unloaded.len(),
            report.dirtied.len(),
            self.map.loaded_count()
        );
        report
    }

    /// Remove one chunk from the world. Its GPU handle waits for the next draw.
    fn unload(&mut self, coord: &ChunkCoord) {
        let Some(mut chunk) = self.map.remove(coord) else {
            return;
        };
        chunk.transition(ChunkState::Unloading);
        if let Some(handle) = chunk.gpu.take() {
            self.pending_release.push(handle);
        }
        self.generate_queue.remove(coord);
        self.mesh_queue.remove(coord);
    }

    /// Force a loaded, generated chunk back to `ToMesh` and queue it.
    fn flag_dirty(&mut self, coord: ChunkCoord) -> bool {
        let dirty = self
            .map
            .get_mut(&coord)
            .is_some_and(|chunk| chunk.mark_dirty());
        if dirty {
            self.mesh_queue.push(coord);
        }
        dirty
    }

    /// Store generated blocks, advance to `ToMesh` and re-dirty neighbours
    /// that were meshed against this chunk while it was still air.
    fn finish_generation(&mut self, coord: ChunkCoord, blocks: Box<[Block]>) -> bool {
        let Some(chunk) = self.map.get_mut(&coord) else {
            return false;
        };
        if !chunk.fill(blocks) || !chunk.transition(ChunkState::ToMesh) {
            return false;
        }
        self.mesh_queue.push(coord);
        for n in ChunkMap::face_neighbors(&coord) {
            let past_mesh = self
                .map
                .get(&n)
                .is_some_and(|c| matches!(c.state(), ChunkState::ToUpload | ChunkState::Active));
            if past_mesh {
                self.flag_dirty(n);
            }
        }
        true
    }

    /// Pop up to `batch` queued chunks and generate them in parallel.
    pub fn drain_generate(&mut self, batch: usize) -> usize {
        let jobs: Vec<ChunkCoord> = self
            .generate_queue
            .pop_batch(batch)
            .into_iter()
            .filter(|coord| match self.map.get(coord) {
                Some(chunk) if chunk.state() == ChunkState::ToGenerate => true,
                Some(chunk) => {
                    log::warn!("Generate queue: {coord} is {:?}, skipping", chunk.state());
                    false
                }
                None => {
                    log::warn!("Generate queue: {coord} is not loaded, skipping");
                    false
                }
            })
            .collect();
        if jobs.is_empty() {
            return 0;
        }

        let terrain = &self.terrain;
        let results: Vec<(ChunkCoord, Box<[Block]>)> = jobs
            .par_iter()
            .map(|&coord| (coord, terrain.generate_blocks(coord)))
            .collect();

        let mut generated = 0;
        for (coord, blocks) in results {
            if self.finish_generation(coord, blocks) {
                generated += 1;
            }
        }
        generated
    }

    /// Pop up to `batch` dirty chunks and mesh them in parallel. Jobs only
    /// read the world; the meshes are stored once the whole batch is done.
    pub fn drain_mesh(&mut self, batch: usize) -> usize {
        let jobs: Vec<ChunkCoord> = self
            .mesh_queue
            .pop_batch(batch)
            .into_iter()
            .filter(|coord| match self.map.get(coord) {
                Some(chunk) if chunk.state() == ChunkState::ToMesh => true,
                Some(chunk) => {
                    log::warn!("Mesh queue: {coord} is {:?}, skipping", chunk.state());
                    false
                }
                None => {
                    log::warn!("Mesh queue: {coord} is not loaded, skipping");
                    false
                }
            })
            .collect();
        if jobs.is_empty() {
            return 0;
        }

        let map = &self.map;
        let results: Vec<(ChunkCoord, MeshData)> = jobs
            .par_iter()
            .filter_map(|&coord| {
                map.get(&coord)
                    .map(|chunk| (coord, mesher::mesh_chunk(chunk, map)))
            })
            .collect();

        let mut meshed = 0;
        for (coord, mesh) in results {
            if let Some(chunk) = self.map.get_mut(&coord) {
                chunk.mesh = mesh;
                if chunk.transition(ChunkState::ToUpload) {
                    meshed += 1;
                }
            }
        }
        meshed
    }

    /// Release handles of unloaded chunks, then upload and draw every chunk
    /// within render distance of `viewpoint`. Must run on the GPU thread.
    pub fn draw(&mut self, viewpoint: Vec3, gpu: &mut dyn GpuBackend) -> DrawStats {
        let mut stats = DrawStats {
            released: self.release_pending(gpu),
            ..DrawStats::default()
        };
        let center = viewpoint_chunk(viewpoint);
        let policy = &self.policy;

        for (coord, chunk) in self.map.iter_mut() {
            if !policy.in_render_distance(center, *coord) {
                continue;
            }
            if chunk.state() == ChunkState::ToUpload {
                if !chunk.mesh.is_empty() {
                    let handle = *chunk.gpu.get_or_insert_with(|| gpu.create_mesh_buffers());
                    gpu.upload(handle, chunk.mesh.vertex_bytes(), chunk.mesh.index_bytes());
                    stats.uploaded += 1;
                }
                chunk.transition(ChunkState::Active);
            }
            if !chunk.state().is_drawable() || chunk.mesh.is_empty() {
                continue;
            }
            let Some(handle) = chunk.gpu else {
                continue;
            };
            gpu.set_uniform(
                CHUNK_OFFSET_UNIFORM,
                UniformValue::Vec3(chunk.world_offset().as_vec3()),
            );
            gpu.draw_indexed(handle, chunk.mesh.index_count() as u32);
            stats.drawn += 1;
        }
        stats
    }

    fn release_pending(&mut self, gpu: &mut dyn GpuBackend) -> usize {
        let released = self.pending_release.len();
        for handle in self.pending_release.drain(..) {
            gpu.destroy(handle);
        }
        released
    }

    /// One frame: reconcile, generate, mesh and draw.
    pub fn tick(&mut self, viewpoint: Vec3, gpu: &mut dyn GpuBackend) -> FrameStats {
        let report = self.update(viewpoint);
        let generated = self.drain_generate(self.config.generate_batch);
        let meshed = self.drain_mesh(self.config.mesh_batch);
        let draw = self.draw(viewpoint, gpu);

        let stats = FrameStats {
            loaded: report.loaded.len(),
            unloaded: report.unloaded.len(),
            dirtied: report.dirtied.len(),
            generated,
            meshed,
            uploaded: draw.uploaded,
            drawn: draw.drawn,
            released: draw.released,
        };
        log::debug!(
            "Frame: generated {}, meshed {}, uploaded {}, drawn {}, released {}",
            stats.generated,
            stats.meshed,
            stats.uploaded,
            stats.drawn,
            stats.released
        );
        stats
    }

    /// Edit one block. The owning chunk is remeshed, and so is every loaded
    /// neighbour chunk whose boundary touches the block. A chunk still waiting
    /// for generation is generated first so the edit survives.
    pub fn set_block(&mut self, world: WorldCoord, block: Block) -> Block {
        let coord = world_to_chunk(world);
        let ungenerated = self
            .map
            .get(&coord)
            .is_some_and(|c| c.state() == ChunkState::ToGenerate);
        if ungenerated {
            self.generate_queue.remove(&coord);
            let blocks = self.terrain.generate_blocks(coord);
            self.finish_generation(coord, blocks);
        }

        let previous = self.map.set_block(world, block);
        if previous == block {
            return previous;
        }
        self.flag_dirty(coord);
        for n in ChunkMap::boundary_neighbors(world) {
            self.flag_dirty(n);
        }
        previous
    }

    pub fn remove_block(&mut self, world: WorldCoord) -> Block {
        self.set_block(world, Block::AIR)
    }

    /// Destroy every GPU handle and drop all chunks.
    pub fn shutdown(&mut self, gpu: &mut dyn GpuBackend) -> usize {
        let mut released = self.release_pending(gpu);
        for mut chunk in self.map.drain() {
            chunk.transition(ChunkState::Unloading);
            if let Some(handle) = chunk.gpu.take() {
                gpu.destroy(handle);
                released += 1;
            }
        }
        self.generate_queue.clear();
        self.mesh_queue.clear();
        self.center = None;
        log::info!("Chunk manager shut down, released {released} GPU meshes");
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubist_core::config::TerrainRule;
    use cubist_core::math::chunk_local_to_world;
    use cubist_render::HeadlessBackend;
    use glam::IVec3;

    fn config(terrain: TerrainRule, radius: i32) -> WorldConfig {
        WorldConfig {
            load_radius: radius,
            render_distance: radius as f32,
            generate_batch: 64,
            mesh_batch: 64,
            terrain,
            ..WorldConfig::default()
        }
    }

    fn chunk_center(coord: ChunkCoord) -> Vec3 {
        chunk_local_to_world(coord, IVec3::splat(16)).as_vec3()
    }

    /// Tick until both queues are empty.
    fn settle(manager: &mut ChunkManager, viewpoint: Vec3, gpu: &mut HeadlessBackend) {
        for _ in 0..32 {
            manager.tick(viewpoint, gpu);
            if manager.pending_generate() == 0 && manager.pending_mesh() == 0 {
                manager.draw(viewpoint, gpu);
                return;
            }
        }
        panic!("pipeline did not settle");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = WorldConfig {
            generate_batch: 0,
            ..WorldConfig::default()
        };
        assert!(ChunkManager::new(bad).is_err());
    }

    #[test]
    fn test_update_only_reconciles_on_chunk_change() {
        let mut manager =
            ChunkManager::new(config(TerrainRule::Empty, 1)).expect("valid config");
        let first = manager.update(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(first.loaded.len(), 27);
        assert!(first.unloaded.is_empty());
        assert!(first.dirtied.is_empty());
        assert!(manager.update(Vec3::new(30.0, 2.0, 5.0)).is_empty());
        assert_eq!(manager.pending_generate(), 27);
        assert_eq!(manager.state_counts().to_generate, 27);
    }

    #[test]
    fn test_pipeline_reaches_active() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Flat { height: 4 }, 1)).expect("valid config");
        settle(&mut manager, chunk_center(IVec3::ZERO), &mut gpu);

        let counts = manager.state_counts();
        assert_eq!(counts.active, 27);
        assert_eq!(counts.to_generate + counts.to_mesh + counts.to_upload, 0);
        assert!(gpu.live_handles() > 0);
        assert!(gpu.draws().iter().all(|d| d.index_count > 0));
        assert_eq!(gpu.invalid_calls(), 0);
    }

    #[test]
    fn test_batches_bound_per_frame_work() {
        let mut gpu = HeadlessBackend::new();
        let cfg = WorldConfig {
            generate_batch: 4,
            mesh_batch: 2,
            ..config(TerrainRule::Empty, 1)
        };
        let mut manager = ChunkManager::new(cfg).expect("valid config");
        let stats = manager.tick(Vec3::ZERO, &mut gpu);
        assert_eq!(stats.loaded, 27);
        assert_eq!(stats.generated, 4);
        assert_eq!(stats.meshed, 2);
        assert_eq!(manager.pending_generate(), 23);
    }

    #[test]
    fn test_streaming_move_loads_unloads_and_dirties_boundary() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Empty, 1)).expect("valid config");
        settle(&mut manager, chunk_center(IVec3::ZERO), &mut gpu);
        assert_eq!(manager.state_counts().active, 27);

        let report = manager.update(chunk_center(IVec3::X));

        let mut expected_loaded = Vec::new();
        let mut expected_unloaded = Vec::new();
        let mut expected_dirtied = Vec::new();
        for x in -1..=2 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let c = IVec3::new(x, y, z);
                    match x {
                        -1 => expected_unloaded.push(c),
                        2 => expected_loaded.push(c),
                        _ => expected_dirtied.push(c),
                    }
                }
            }
        }
        sort_coords(&mut expected_loaded);
        sort_coords(&mut expected_unloaded);
        sort_coords(&mut expected_dirtied);

        assert_eq!(report.loaded, expected_loaded);
        assert_eq!(report.unloaded, expected_unloaded);
        assert_eq!(report.dirtied, expected_dirtied);
        assert_eq!(manager.loaded_count(), 27);
        for c in &expected_dirtied {
            assert_eq!(manager.map().get(c).map(|ch| ch.state()), Some(ChunkState::ToMesh));
        }
    }

    #[test]
    fn test_unload_drops_queued_generation() {
        let mut manager =
            ChunkManager::new(config(TerrainRule::Flat { height: 4 }, 1)).expect("valid config");
        manager.update(chunk_center(IVec3::ZERO));
        assert_eq!(manager.pending_generate(), 27);

        let report = manager.reconcile(IVec3::new(10, 0, 0), &HashSet::new());
        assert_eq!(report.unloaded.len(), 27);
        assert_eq!(manager.loaded_count(), 0);
        assert_eq!(manager.pending_generate(), 0);
        assert_eq!(manager.drain_generate(64), 0);

        // Moving far away queues only the new region.
        manager.update(chunk_center(IVec3::ZERO));
        let report = manager.update(chunk_center(IVec3::new(10, 0, 0)));
        assert_eq!(report.unloaded.len(), 27);
        assert_eq!(manager.pending_generate(), 27);
        assert_eq!(manager.drain_generate(64), 27);
        assert!(manager.map().coords().all(|c| (9..=11).contains(&c.x)));
    }

    #[test]
    fn test_drains_skip_stale_queue_entries() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Flat { height: 4 }, 1)).expect("valid config");
        settle(&mut manager, chunk_center(IVec3::ZERO), &mut gpu);

        // Already Active: not remeshed.
        manager.mesh_queue.push(IVec3::ZERO);
        assert_eq!(manager.drain_mesh(64), 0);
        assert_eq!(
            manager.map().get(&IVec3::ZERO).map(|c| c.state()),
            Some(ChunkState::Active)
        );

        manager.reconcile(IVec3::new(10, 0, 0), &HashSet::new());
        assert_eq!(manager.loaded_count(), 0);
        manager.mesh_queue.push(IVec3::ZERO);
        manager.generate_queue.push(IVec3::X);
        assert_eq!(manager.drain_mesh(64), 0);
        assert_eq!(manager.drain_generate(64), 0);
        assert_eq!(manager.pending_mesh() + manager.pending_generate(), 0);
        assert_eq!(manager.loaded_count(), 0);

        manager.shutdown(&mut gpu);
        assert_eq!(gpu.live_handles(), 0);
        assert_eq!(gpu.invalid_calls(), 0);
    }

    #[test]
    fn test_unload_releases_gpu_handles_on_next_draw() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Solid, 1)).expect("valid config");
        settle(&mut manager, chunk_center(IVec3::ZERO), &mut gpu);
        // The centre chunk is fully occluded and never gets a handle.
        assert_eq!(gpu.live_handles(), 26);

        let far = chunk_center(IVec3::new(10, 0, 0));
        let report = manager.update(far);
        assert_eq!(report.unloaded.len(), 27);
        assert_eq!(manager.pending_release(), 26);
        assert_eq!(gpu.live_handles(), 26);

        let stats = manager.draw(far, &mut gpu);
        assert_eq!(stats.released, 26);
        assert_eq!(gpu.destroyed().len(), 26);
        assert_eq!(manager.pending_release(), 0);
        assert_eq!(gpu.invalid_calls(), 0);
    }

    #[test]
    fn test_upload_once_per_mesh_version() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Empty, 0)).expect("valid config");
        manager.set_block(IVec3::new(3, 3, 3), Block::STONE);
        settle(&mut manager, Vec3::ZERO, &mut gpu);

        let handle = manager
            .map()
            .get(&IVec3::ZERO)
            .and_then(|c| c.gpu_handle())
            .expect("uploaded");
        assert_eq!(gpu.upload_count(handle), 1);

        for _ in 0..5 {
            manager.tick(Vec3::ZERO, &mut gpu);
        }
        assert_eq!(gpu.upload_count(handle), 1, "unchanged mesh re-uploaded");

        manager.set_block(IVec3::new(4, 3, 3), Block::STONE);
        manager.tick(Vec3::ZERO, &mut gpu);
        assert_eq!(gpu.upload_count(handle), 2);
        assert_eq!(
            gpu.last_upload_size(handle).map(|(_, i)| i),
            Some(10 * 6 * 4)
        );
        assert_eq!(gpu.created_count(), 1);
    }

    #[test]
    fn test_draw_sets_chunk_offset_and_respects_render_distance() {
        let mut gpu = HeadlessBackend::new();
        let cfg = WorldConfig {
            load_radius: 2,
            render_distance: 0.0,
            ..config(TerrainRule::Empty, 2)
        };
        let mut manager = ChunkManager::new(cfg).expect("valid config");
        manager.update(Vec3::ZERO);
        manager.set_block(IVec3::new(1, 1, 1), Block::STONE);
        manager.set_block(IVec3::new(33, 1, 1), Block::STONE);
        settle(&mut manager, Vec3::ZERO, &mut gpu);

        gpu.clear_draws();
        let stats = manager.draw(Vec3::ZERO, &mut gpu);
        assert_eq!(stats.drawn, 1);
        assert_eq!(gpu.draws()[0].offset, Some(UniformValue::Vec3(Vec3::ZERO)));
        // Beyond render distance: meshed but never uploaded.
        assert_eq!(
            manager.map().get(&IVec3::X).map(|c| c.state()),
            Some(ChunkState::ToUpload)
        );

        gpu.clear_draws();
        let viewpoint = chunk_center(IVec3::X);
        manager.draw(viewpoint, &mut gpu);
        assert_eq!(gpu.draws().len(), 1);
        assert_eq!(
            gpu.draws()[0].offset,
            Some(UniformValue::Vec3(Vec3::new(32.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn test_cross_chunk_edit_removes_shared_faces() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Empty, 1)).expect("valid config");
        settle(&mut manager, Vec3::new(16.0, 16.0, 16.0), &mut gpu);

        manager.set_block(IVec3::new(31, 0, 0), Block::STONE);
        settle(&mut manager, Vec3::new(16.0, 16.0, 16.0), &mut gpu);
        let quads = |m: &ChunkManager, c: IVec3| m.map().get(&c).map(|ch| ch.mesh.quad_count());
        assert_eq!(quads(&manager, IVec3::ZERO), Some(6));
        assert_eq!(quads(&manager, IVec3::X), Some(0));

        manager.set_block(IVec3::new(32, 0, 0), Block::STONE);
        assert_eq!(
            manager.map().get(&IVec3::ZERO).map(|c| c.state()),
            Some(ChunkState::ToMesh),
            "boundary edit must dirty the neighbour chunk"
        );
        settle(&mut manager, Vec3::new(16.0, 16.0, 16.0), &mut gpu);
        assert_eq!(quads(&manager, IVec3::ZERO), Some(5));
        assert_eq!(quads(&manager, IVec3::X), Some(5));

        assert_eq!(manager.remove_block(IVec3::new(32, 0, 0)), Block::STONE);
        settle(&mut manager, Vec3::new(16.0, 16.0, 16.0), &mut gpu);
        assert_eq!(quads(&manager, IVec3::ZERO), Some(6));
        assert_eq!(quads(&manager, IVec3::X), Some(0));
    }

    #[test]
    fn test_generation_redirties_meshed_neighbours() {
        let mut manager =
            ChunkManager::new(config(TerrainRule::Solid, 1)).expect("valid config");
        manager.update(Vec3::ZERO);
        // Generate and mesh only the centre chunk against air neighbours.
        manager.generate_queue.clear();
        let blocks = manager.terrain.generate_blocks(IVec3::ZERO);
        assert!(manager.finish_generation(IVec3::ZERO, blocks));
        assert_eq!(manager.drain_mesh(1), 1);
        let side = 32 * 32;
        assert_eq!(
            manager.map().get(&IVec3::ZERO).map(|c| c.mesh.quad_count()),
            Some(6 * side)
        );

        for n in ChunkMap::face_neighbors(&IVec3::ZERO) {
            manager.generate_queue.push(n);
        }
        manager.drain_generate(6);
        assert_eq!(
            manager.map().get(&IVec3::ZERO).map(|c| c.state()),
            Some(ChunkState::ToMesh)
        );
        manager.drain_mesh(64);
        assert_eq!(
            manager.map().get(&IVec3::ZERO).map(|c| c.mesh.quad_count()),
            Some(0)
        );
    }

    #[test]
    fn test_edit_before_generation_survives() {
        let mut manager =
            ChunkManager::new(config(TerrainRule::Flat { height: 0 }, 0)).expect("valid config");
        manager.update(Vec3::ZERO);
        manager.remove_block(IVec3::new(2, 0, 2));
        assert_eq!(manager.pending_generate(), 0);
        assert_eq!(manager.get_block(IVec3::new(2, 0, 2)), Block::AIR);
        assert_eq!(manager.get_block(IVec3::new(3, 0, 2)), Block::GRASS);
        assert_eq!(manager.drain_generate(9), 0);
        assert_eq!(manager.get_block(IVec3::new(2, 0, 2)), Block::AIR);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut gpu = HeadlessBackend::new();
        let mut manager =
            ChunkManager::new(config(TerrainRule::Solid, 1)).expect("valid config");
        settle(&mut manager, Vec3::ZERO, &mut gpu);
        manager.update(chunk_center(IVec3::new(1, 0, 0)));
        assert_eq!(manager.pending_release(), 9);
        let released = manager.shutdown(&mut gpu);
        assert_eq!(released, 26);
        assert_eq!(gpu.live_handles(), 0);
        assert_eq!(manager.loaded_count(), 0);
        assert_eq!(manager.pending_generate() + manager.pending_mesh(), 0);
        assert_eq!(gpu.invalid_calls(), 0);
    }
}
