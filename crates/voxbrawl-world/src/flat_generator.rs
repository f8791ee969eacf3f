//! Flat map generator.
//!
//! Every column is solid from `ground_z` down to the bottom of the world.

use crate::map::{VoxelMap, MAX_XY};

/// Generate a flat map whose surface sits at `ground_z`.
pub fn generate_flat(ground_z: i32) -> VoxelMap {
    let mut map = VoxelMap::empty();
    for x in 0..=MAX_XY {
        for y in 0..=MAX_XY {
            map.fill_column(x, y, ground_z);
        }
    }
    map
}
