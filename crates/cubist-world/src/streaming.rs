use std::collections::HashSet;

use cubist_core::config::{RegionShape, WorldConfig};
use cubist_core::types::ChunkCoord;
use glam::IVec3;

/// Which chunks to keep loaded and draw around the viewpoint chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingPolicy {
    pub load_radius: i32,
    pub unload_radius: i32,
    pub render_distance: f32,
    pub shape: RegionShape,
    pub vertical_range: Option<(i32, i32)>,
}

impl Default for StreamingPolicy {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl StreamingPolicy {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            load_radius: config.load_radius,
            unload_radius: config.unload_radius(),
            render_distance: config.render_distance,
            shape: config.region_shape,
            vertical_range: config.vertical_range,
        }
    }

    /// Chunk distance between `center` and `coord` in this policy's metric:
    /// Chebyshev for `Cube`, Euclidean for `Sphere`.
    pub fn distance(&self, center: ChunkCoord, coord: ChunkCoord) -> f32 {
        let d = coord - center;
        match self.shape {
            RegionShape::Cube => d.abs().max_element() as f32,
            RegionShape::Sphere => d.as_vec3().length(),
        }
    }

    fn in_vertical_range(&self, coord: ChunkCoord) -> bool {
        match self.vertical_range {
            Some((min_y, max_y)) => (min_y..=max_y).contains(&coord.y),
            None => true,
        }
    }

    /// Every chunk within `load_radius` of `center`.
    pub fn desired_region(&self, center: ChunkCoord) -> HashSet<ChunkCoord> {
        compute_desired_region(center, self.load_radius, self.shape, self.vertical_range)
    }

    /// A loaded chunk past the unload radius (or outside the vertical band)
    /// is evicted.
    pub fn should_unload(&self, center: ChunkCoord, coord: ChunkCoord) -> bool {
        !self.in_vertical_range(coord) || self.distance(center, coord) > self.unload_radius as f32
    }

    pub fn in_render_distance(&self, center: ChunkCoord, coord: ChunkCoord) -> bool {
        self.distance(center, coord) <= self.render_distance
    }
}

/// Box of `radius` chunks around `center`, optionally cut to a sphere and
/// clamped to an inclusive chunk-space y band.
pub fn compute_desired_region(
    center: ChunkCoord,
    radius: i32,
    shape: RegionShape,
    vertical_range: Option<(i32, i32)>,
) -> HashSet<ChunkCoord> {
    let (mut min_y, mut max_y) = (center.y - radius, center.y + radius);
    if let Some((lo, hi)) = vertical_range {
        min_y = min_y.max(lo);
        max_y = max_y.min(hi);
    }
    let radius_sq = radius * radius;

    let mut region = HashSet::new();
    for dx in -radius..=radius {
        for y in min_y..=max_y {
            for dz in -radius..=radius {
                let d = IVec3::new(dx, y - center.y, dz);
                if shape == RegionShape::Sphere && d.length_squared() > radius_sq {
                    continue;
                }
                region.insert(center + d);
            }
        }
    }
    region
}

/// Loads and evictions needed to move from `loaded` to `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDiff {
    pub to_load: Vec<ChunkCoord>,
    pub to_unload: Vec<ChunkCoord>,
}

/// Diff the loaded set against the desired region. A loaded chunk outside
/// `desired` is only evicted when `policy` says it is past the unload radius.
pub fn diff_region<'a>(
    policy: &StreamingPolicy,
    center: ChunkCoord,
    desired: &HashSet<ChunkCoord>,
    loaded: impl Iterator<Item = &'a ChunkCoord>,
) -> RegionDiff {
    let mut diff = RegionDiff::default();
    let mut seen = HashSet::new();
    for coord in loaded {
        seen.insert(*coord);
        if !desired.contains(coord) && policy.should_unload(center, *coord) {
            diff.to_unload.push(*coord);
        }
    }
    diff.to_load = desired
        .iter()
        .filter(|c| !seen.contains(*c))
        .copied()
        .collect();
    sort_coords(&mut diff.to_load);
    sort_coords(&mut diff.to_unload);
    diff
}

/// Deterministic x, y, z lexicographic order.
pub fn sort_coords(coords: &mut [ChunkCoord]) {
    coords.sort_unstable_by_key(|c| c.to_array());
}
