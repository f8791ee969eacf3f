//! World management: voxel map surface, generators, sectors, and anti-cheat helpers.

pub mod anticheat;
pub mod flat_generator;
pub mod hills_generator;
pub mod line;
pub mod map;
pub mod sector;
