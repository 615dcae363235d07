use std::time::Instant;

use cubist_core::config::ConfigError;
use cubist_render::HeadlessBackend;
use cubist_world::ChunkManager;

use crate::scenes::SceneConfig;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub frame_count: u32,
    pub peak_loaded: usize,
    pub chunks_generated: usize,
    pub chunks_meshed: usize,
    pub uploads: usize,
    pub mean_draws: f64,
    pub timings: TimingSeries,
}

/// Flies a viewpoint through each scene with the headless GPU backend.
pub struct BenchmarkRunner {
    frame_count: u32,
    /// Blocks travelled per frame.
    speed: f32,
}

impl BenchmarkRunner {
    pub fn new(frame_count: u32, speed: f32) -> Self {
        Self { frame_count, speed }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, ConfigError> {
        log::info!(
            "Running scene '{}' (radius {}, {:?})...",
            config.name,
            config.world.load_radius,
            config.world.region_shape
        );

        let mut manager = ChunkManager::new(config.world.clone())?;
        let mut gpu = HeadlessBackend::new();
        let step = config.direction() * self.speed;
        let mut viewpoint = config.start();

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        let mut peak_loaded = 0;
        let mut generated = 0;
        let mut meshed = 0;
        let mut uploads = 0;
        let mut draws = 0;

        for _ in 0..self.frame_count {
            let frame_start = Instant::now();
            let stats = manager.tick(viewpoint, &mut gpu);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);

            peak_loaded = peak_loaded.max(manager.loaded_count());
            generated += stats.generated;
            meshed += stats.meshed;
            uploads += stats.uploaded;
            draws += stats.drawn;
            viewpoint += step;
        }

        let released = manager.shutdown(&mut gpu);
        if gpu.invalid_calls() > 0 || gpu.live_handles() > 0 {
            log::warn!(
                "  GPU handle misuse: {} invalid calls, {} handles leaked",
                gpu.invalid_calls(),
                gpu.live_handles()
            );
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms, released {} meshes",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            released
        );

        Ok(BenchmarkResult {
            scene_name: config.name.clone(),
            frame_count: self.frame_count,
            peak_loaded,
            chunks_generated: generated,
            chunks_meshed: meshed,
            uploads,
            mean_draws: if self.frame_count == 0 {
                0.0
            } else {
                draws as f64 / self.frame_count as f64
            },
            timings,
        })
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let percentile = |p: f64| sorted[(((n as f64) * p).ceil() as usize).min(n - 1)];

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: percentile(0.95),
        p99_ms: percentile(0.99),
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::custom_scene;
    use cubist_core::config::{TerrainRule, WorldConfig};

    #[test]
    fn test_compute_timings() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.p95_ms, 4.0);
        assert_eq!(compute_timings(&[]).mean_ms, 0.0);
    }

    #[test]
    fn test_run_small_scene() {
        let world = WorldConfig {
            load_radius: 1,
            render_distance: 1.0,
            terrain: TerrainRule::Flat { height: 8 },
            ..WorldConfig::default()
        };
        let result = BenchmarkRunner::new(20, 4.0)
            .run_scene(&custom_scene(world))
            .expect("valid scene");
        assert_eq!(result.frame_count, 20);
        assert_eq!(result.peak_loaded, 27);
        assert!(result.chunks_generated >= 27);
        assert!(result.uploads > 0);
    }

    #[test]
    fn test_invalid_scene_config_is_error() {
        let world = WorldConfig {
            mesh_batch: 0,
            ..WorldConfig::default()
        };
        assert!(BenchmarkRunner::new(1, 1.0).run_scene(&custom_scene(world)).is_err());
    }
}
