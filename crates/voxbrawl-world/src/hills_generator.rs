//! Seeded rolling-hills map generator.
//!
//! Scatters round hills over a flat base. Each hill raises the surface by up
//! to its height (lowering z, since z grows downward) with a linear falloff
//! towards its radius.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::map::{VoxelMap, MAX_XY, WATER_Z};

/// Number of hills scattered over the map.
const HILL_COUNT: usize = 48;

/// Highest surface a hill may reach.
const MIN_SURFACE_Z: i32 = 8;

struct Hill {
    x: f32,
    y: f32,
    radius: f32,
    height: f32,
}

/// Generate a hilly map around a base surface of `base_z`.
pub fn generate_hills(seed: u64, base_z: i32) -> VoxelMap {
    let mut rng = StdRng::seed_from_u64(seed);
    let hills: Vec<Hill> = (0..HILL_COUNT)
        .map(|_| Hill {
            x: rng.gen_range(0.0..=MAX_XY as f32),
            y: rng.gen_range(0.0..=MAX_XY as f32),
            radius: rng.gen_range(16.0..64.0),
            height: rng.gen_range(2.0..16.0),
        })
        .collect();

    let base_z = base_z.clamp(MIN_SURFACE_Z, WATER_Z);
    let mut map = VoxelMap::empty();
    for x in 0..=MAX_XY {
        for y in 0..=MAX_XY {
            let lift: f32 = hills
                .iter()
                .map(|h| {
                    let d = ((x as f32 - h.x).powi(2) + (y as f32 - h.y).powi(2)).sqrt();
                    if d < h.radius {
                        h.height * (1.0 - d / h.radius)
                    } else {
                        0.0
                    }
                })
                .sum();
            let surface = (base_z - lift as i32).clamp(MIN_SURFACE_Z, WATER_Z);
            map.fill_column(x, y, surface);
        }
    }
    map
}
