use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_GENERATE_BATCH, DEFAULT_LOAD_RADIUS, DEFAULT_MESH_BATCH, DEFAULT_SEED,
    MAX_TERRAIN_AMPLITUDE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse world config RON: {0}")]
    Parse(String),
    #[error("Failed to read world config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid world config: {0}")]
    Invalid(String),
}

/// Shape of the loaded region around the viewpoint chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionShape {
    /// Axis-aligned box; distances use the Chebyshev metric.
    #[default]
    Cube,
    /// Box filtered by Euclidean chunk distance.
    Sphere,
}

/// Placeholder terrain rules. Heights are in global block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TerrainRule {
    Empty,
    Solid,
    Flat {
        height: i32,
    },
    /// Smooth sin/cos height field of x/z.
    Rolling {
        base_height: i32,
        amplitude: f32,
        wavelength: f32,
    },
}

impl Default for TerrainRule {
    fn default() -> Self {
        TerrainRule::Rolling {
            base_height: 16,
            amplitude: 6.0,
            wavelength: 48.0,
        }
    }
}

fn default_load_radius() -> i32 {
    DEFAULT_LOAD_RADIUS
}

fn default_render_distance() -> f32 {
    DEFAULT_LOAD_RADIUS as f32
}

fn default_generate_batch() -> usize {
    DEFAULT_GENERATE_BATCH
}

fn default_mesh_batch() -> usize {
    DEFAULT_MESH_BATCH
}

fn default_seed() -> u32 {
    DEFAULT_SEED
}

/// Streaming and generation settings for one world.
///
/// Every field has a default, so a RON file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Chunks kept loaded around the viewpoint chunk.
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    /// Extra chunks past `load_radius` before a loaded chunk is evicted.
    #[serde(default)]
    pub unload_margin: i32,
    /// Active chunks farther than this (in chunks) are not drawn. May reach
    /// into the unload margin, since margin chunks stay resident.
    #[serde(default = "default_render_distance")]
    pub render_distance: f32,
    #[serde(default)]
    pub region_shape: RegionShape,
    /// Inclusive chunk-space y band; None = unbounded.
    #[serde(default)]
    pub vertical_range: Option<(i32, i32)>,
    #[serde(default = "default_generate_batch")]
    pub generate_batch: usize,
    #[serde(default = "default_mesh_batch")]
    pub mesh_batch: usize,
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default)]
    pub terrain: TerrainRule,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            load_radius: DEFAULT_LOAD_RADIUS,
            unload_margin: 0,
            render_distance: DEFAULT_LOAD_RADIUS as f32,
            region_shape: RegionShape::default(),
            vertical_range: None,
            generate_batch: DEFAULT_GENERATE_BATCH,
            mesh_batch: DEFAULT_MESH_BATCH,
            seed: DEFAULT_SEED,
            terrain: TerrainRule::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a config from a RON string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: WorldConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&contents)?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Radius past which loaded chunks are evicted.
    pub fn unload_radius(&self) -> i32 {
        self.load_radius + self.unload_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "load_radius must be >= 0, got {}",
                self.load_radius
            )));
        }
        if self.unload_margin < 0 {
            return Err(ConfigError::Invalid(format!(
                "unload_margin must be >= 0, got {}",
                self.unload_margin
            )));
        }
        if self.render_distance.is_nan() || self.render_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must be >= 0, got {}",
                self.render_distance
            )));
        }
        if self.render_distance > self.unload_radius() as f32 {
            return Err(ConfigError::Invalid(format!(
                "render_distance {} exceeds unload radius {}",
                self.render_distance,
                self.unload_radius()
            )));
        }
        if self.generate_batch == 0 || self.mesh_batch == 0 {
            return Err(ConfigError::Invalid(
                "generate_batch and mesh_batch must be non-zero".to_string(),
            ));
        }
        if let Some((min_y, max_y)) = self.vertical_range {
            if min_y > max_y {
                return Err(ConfigError::Invalid(format!(
                    "vertical_range min {min_y} is above max {max_y}"
                )));
            }
        }
        if let TerrainRule::Rolling {
            amplitude,
            wavelength,
            ..
        } = self.terrain
        {
            if wavelength.is_nan() || wavelength <= 0.0 || wavelength.is_infinite() {
                return Err(ConfigError::Invalid(format!(
                    "rolling terrain wavelength must be positive and finite, got {wavelength}"
                )));
            }
            if !amplitude.is_finite() || amplitude.abs() > MAX_TERRAIN_AMPLITUDE {
                return Err(ConfigError::Invalid(format!(
                    "rolling terrain amplitude must be within +/-{MAX_TERRAIN_AMPLITUDE}, got {amplitude}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.load_radius, 2);
        assert_eq!(config.generate_batch, 9);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_parse_partial_ron_uses_defaults() {
        let config = WorldConfig::from_ron_str(
            "(load_radius: 4, render_distance: 3.5, terrain: Flat(height: 10))",
        )
        .expect("valid config");
        assert_eq!(config.load_radius, 4);
        assert_eq!(config.render_distance, 3.5);
        assert_eq!(config.terrain, TerrainRule::Flat { height: 10 });
        assert_eq!(config.mesh_batch, DEFAULT_MESH_BATCH);
        assert_eq!(config.region_shape, RegionShape::Cube);
    }

    #[test]
    fn test_parse_shape_and_vertical_range() {
        let config = WorldConfig::from_ron_str(
            "(region_shape: Sphere, vertical_range: Some((-1, 2)), unload_margin: 1)",
        )
        .expect("valid config");
        assert_eq!(config.region_shape, RegionShape::Sphere);
        assert_eq!(config.vertical_range, Some((-1, 2)));
        assert_eq!(config.unload_radius(), 3);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = WorldConfig::from_ron_str("(load_radius: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_render_distance_beyond_unload_radius_rejected() {
        let err = WorldConfig::from_ron_str("(load_radius: 1, render_distance: 2.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");

        let ok = WorldConfig::from_ron_str(
            "(load_radius: 1, unload_margin: 1, render_distance: 2.0)",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_zero_batch_rejected() {
        let config = WorldConfig {
            mesh_batch: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_vertical_range_rejected() {
        let config = WorldConfig {
            vertical_range: Some((3, -3)),
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rolling_amplitude_must_be_bounded() {
        for amplitude in ["1e12", "-1e12"] {
            let ron = format!(
                "(terrain: Rolling(base_height: 16, amplitude: {amplitude}, wavelength: 48.0))"
            );
            let err = WorldConfig::from_ron_str(&ron).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{amplitude}: got {err:?}");
        }
        let infinite = WorldConfig {
            terrain: TerrainRule::Rolling {
                base_height: 16,
                amplitude: f32::INFINITY,
                wavelength: 48.0,
            },
            ..WorldConfig::default()
        };
        assert!(matches!(infinite.validate(), Err(ConfigError::Invalid(_))));

        let ok = WorldConfig::from_ron_str(
            "(terrain: Rolling(base_height: 16, amplitude: 1000.0, wavelength: 48.0))",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WorldConfig::load(Path::new("/nonexistent/cubist/world.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)), "got {err:?}");
    }
}
