use cubist_core::config::{RegionShape, TerrainRule, WorldConfig};
use glam::Vec3;

/// One streaming scenario: a world config plus a straight flight path.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub name: String,
    pub world: WorldConfig,
    pub start: [f32; 3],
    /// Flight direction; normalised by the runner.
    pub direction: [f32; 3],
}

impl SceneConfig {
    pub fn start(&self) -> Vec3 {
        Vec3::from(self.start)
    }

    pub fn direction(&self) -> Vec3 {
        Vec3::from(self.direction).normalize_or_zero()
    }
}

/// Scenes run when no `--config` is given, cheapest first.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "flat-cube-r2".to_string(),
            world: WorldConfig {
                terrain: TerrainRule::Flat { height: 8 },
                ..WorldConfig::default()
            },
            start: [16.0, 24.0, 16.0],
            direction: [1.0, 0.0, 0.0],
        },
        SceneConfig {
            name: "rolling-cube-r2".to_string(),
            world: WorldConfig::default(),
            start: [16.0, 24.0, 16.0],
            direction: [1.0, 0.0, 0.0],
        },
        SceneConfig {
            name: "rolling-sphere-r3".to_string(),
            world: WorldConfig {
                load_radius: 3,
                render_distance: 3.0,
                region_shape: RegionShape::Sphere,
                vertical_range: Some((-1, 1)),
                ..WorldConfig::default()
            },
            start: [16.0, 24.0, 16.0],
            direction: [1.0, 0.0, 1.0],
        },
    ]
}

/// Single scene flying along +X through a user-supplied world config.
pub fn custom_scene(world: WorldConfig) -> SceneConfig {
    SceneConfig {
        name: "custom".to_string(),
        world,
        start: [16.0, 24.0, 16.0],
        direction: [1.0, 0.0, 0.0],
    }
}
