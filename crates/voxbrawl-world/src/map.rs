//! The voxel map and the query/mutate surface the game core works through.
//!
//! Axes: x and y span the horizontal plane, z grows *downward*. `z = 0` is
//! the top of the sky and `z = 63` is the bottom of the world. The two
//! lowest layers (`z >= WATER_Z`) form an indestructible floor.

/// Largest valid x/y coordinate.
pub const MAX_XY: i32 = 511;

/// Largest valid z coordinate.
pub const MAX_Z: i32 = 63;

/// First z layer of the indestructible water floor.
pub const WATER_Z: i32 = 62;

const SIZE_XY: usize = (MAX_XY + 1) as usize;
const SIZE_Z: usize = (MAX_Z + 1) as usize;

/// Integer voxel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

/// Whether a voxel coordinate lies inside the world box.
pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    (0..=MAX_XY).contains(&x) && (0..=MAX_XY).contains(&y) && (0..=MAX_Z).contains(&z)
}

/// Query/mutate contract of the world grid.
///
/// Every operation is bounds-checked by the implementor; out-of-range
/// coordinates read as empty and never mutate anything.
pub trait VoxelSurface {
    /// Topmost solid z of a column (the smallest solid z), or `MAX_Z` when
    /// the column is empty.
    fn height_at(&self, x: i32, y: i32) -> i32;

    /// Whether the voxel at the coordinate is solid.
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool;

    /// Whether the coordinate may hold a player-built or player-destroyed voxel.
    fn is_valid_position(&self, x: i32, y: i32, z: i32) -> bool {
        in_bounds(x, y, z) && z < WATER_Z
    }

    /// Whether any of the six face neighbours is solid.
    fn has_neighbors(&self, x: i32, y: i32, z: i32) -> bool {
        [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ]
        .iter()
        .any(|&(dx, dy, dz)| {
            self.is_solid(x.saturating_add(dx), y.saturating_add(dy), z.saturating_add(dz))
        })
    }

    /// Place a voxel. Returns `false` if the position is invalid or occupied.
    fn build_point(&mut self, x: i32, y: i32, z: i32) -> bool;

    /// Remove a voxel, returning how many voxels were removed (0 for empty
    /// space or an indestructible position).
    fn destroy_point(&mut self, x: i32, y: i32, z: i32) -> u32;
}

/// In-memory voxel grid stored as a bitset, one bit per voxel.
#[derive(Clone)]
pub struct VoxelMap {
    bits: Vec<u64>,
}

impl VoxelMap {
    /// Create a map with every voxel empty.
    pub fn empty() -> Self {
        Self {
            bits: vec![0; SIZE_XY * SIZE_XY * SIZE_Z / 64],
        }
    }

    /// Set or clear a voxel directly, ignoring gameplay rules.
    /// Out-of-range coordinates are ignored.
    pub fn set_solid(&mut self, x: i32, y: i32, z: i32, solid: bool) {
        if let Some(index) = Self::index(x, y, z) {
            let (word, bit) = (index / 64, index % 64);
            if solid {
                self.bits[word] |= 1u64 << bit;
            } else {
                self.bits[word] &= !(1u64 << bit);
            }
        }
    }

    /// Fill a column from `top_z` down to the bottom of the world.
    pub fn fill_column(&mut self, x: i32, y: i32, top_z: i32) {
        for z in top_z.max(0)..=MAX_Z {
            self.set_solid(x, y, z, true);
        }
    }

    /// Count solid voxels in the whole map.
    pub fn solid_count(&self) -> u64 {
        self.bits.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if !in_bounds(x, y, z) {
            return None;
        }
        Some((x as usize * SIZE_XY + y as usize) * SIZE_Z + z as usize)
    }
}

impl Default for VoxelMap {
    fn default() -> Self {
        Self::empty()
    }
}

impl VoxelSurface for VoxelMap {
    fn height_at(&self, x: i32, y: i32) -> i32 {
        (0..=MAX_Z)
            .find(|&z| self.is_solid(x, y, z))
            .unwrap_or(MAX_Z)
    }

    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        match Self::index(x, y, z) {
            Some(index) => self.bits[index / 64] & (1u64 << (index % 64)) != 0,
            None => false,
        }
    }

    fn build_point(&mut self, x: i32, y: i32, z: i32) -> bool {
        if !self.is_valid_position(x, y, z) || self.is_solid(x, y, z) {
            return false;
        }
        self.set_solid(x, y, z, true);
        true
    }

    fn destroy_point(&mut self, x: i32, y: i32, z: i32) -> u32 {
        if !self.is_valid_position(x, y, z) || !self.is_solid(x, y, z) {
            return 0;
        }
        self.set_solid(x, y, z, false);
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_no_solids() {
        let map = VoxelMap::empty();
        assert_eq!(map.solid_count(), 0);
        assert!(!map.is_solid(0, 0, 0));
        assert_eq!(map.height_at(10, 10), MAX_Z);
    }

    #[test]
    fn height_is_topmost_solid() {
        let mut map = VoxelMap::empty();
        map.fill_column(5, 6, 40);
        map.set_solid(5, 6, 12, true);
        assert_eq!(map.height_at(5, 6), 12);
        assert_eq!(map.height_at(6, 6), MAX_Z);
    }

    #[test]
    fn out_of_bounds_reads_empty() {
        let mut map = VoxelMap::empty();
        map.set_solid(-1, 0, 0, true);
        map.set_solid(0, 512, 0, true);
        map.set_solid(0, 0, 64, true);
        assert_eq!(map.solid_count(), 0);
        assert!(!map.is_solid(-1, 0, 0));
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut map = VoxelMap::empty();
        map.set_solid(100, 100, 10, true);
        assert_eq!(map.destroy_point(100, 100, 10), 1);
        assert_eq!(map.destroy_point(100, 100, 10), 0);
        assert_eq!(map.destroy_point(100, 100, 10), 0);
        assert!(!map.is_solid(100, 100, 10));
    }

    #[test]
    fn water_floor_is_indestructible() {
        let mut map = VoxelMap::empty();
        map.fill_column(1, 1, WATER_Z);
        assert_eq!(map.destroy_point(1, 1, WATER_Z), 0);
        assert_eq!(map.destroy_point(1, 1, MAX_Z), 0);
        assert!(map.is_solid(1, 1, MAX_Z));
        assert!(!map.build_point(2, 2, WATER_Z));
    }

    #[test]
    fn build_rejects_occupied_and_out_of_range() {
        let mut map = VoxelMap::empty();
        assert!(map.build_point(3, 3, 30));
        assert!(!map.build_point(3, 3, 30));
        assert!(!map.build_point(-1, 3, 30));
        assert!(!map.build_point(3, 600, 30));
    }

    #[test]
    fn neighbors() {
        let mut map = VoxelMap::empty();
        map.set_solid(10, 10, 20, true);
        assert!(map.has_neighbors(10, 10, 19));
        assert!(map.has_neighbors(11, 10, 20));
        assert!(!map.has_neighbors(12, 10, 20));
        assert!(!map.has_neighbors(0, 0, 0));
    }
}
