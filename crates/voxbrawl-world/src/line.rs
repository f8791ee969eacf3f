//! 3-D Bresenham "cube line" rasterization.

use crate::map::BlockPos;

/// Upper bound on the number of cells a single line may produce.
pub const MAX_LINE_BLOCKS: usize = 64;

/// Walk the voxel cells from `start` to `end`, both inclusive, stepping one
/// cell along the dominant axis per iteration.
///
/// The walk stops after [`MAX_LINE_BLOCKS`] cells, so a far-away endpoint
/// costs no more work than a short line.
pub fn cube_line(start: BlockPos, end: BlockPos) -> Vec<BlockPos> {
    // i64 keeps the doubled deltas of extreme i32 endpoints from overflowing.
    let (x1, y1, z1) = (i64::from(start.x), i64::from(start.y), i64::from(start.z));
    let (x2, y2, z2) = (i64::from(end.x), i64::from(end.y), i64::from(end.z));

    let (dx, dy, dz) = (x2 - x1, y2 - y1, z2 - z1);
    let (sx, sy, sz) = (dx.signum(), dy.signum(), dz.signum());
    let (ax, ay, az) = (dx.abs() * 2, dy.abs() * 2, dz.abs() * 2);

    let (mut x, mut y, mut z) = (x1, y1, z1);
    let mut cells = vec![start];

    let push = |cells: &mut Vec<BlockPos>, x: i64, y: i64, z: i64| {
        cells.push(BlockPos::new(x as i32, y as i32, z as i32));
        cells.len() < MAX_LINE_BLOCKS
    };

    if ax >= ay && ax >= az {
        let (mut ey, mut ez) = (ay - ax / 2, az - ax / 2);
        while x != x2 {
            if ey >= 0 {
                y += sy;
                ey -= ax;
            }
            if ez >= 0 {
                z += sz;
                ez -= ax;
            }
            x += sx;
            ey += ay;
            ez += az;
            if !push(&mut cells, x, y, z) {
                break;
            }
        }
    } else if ay >= ax && ay >= az {
        let (mut ex, mut ez) = (ax - ay / 2, az - ay / 2);
        while y != y2 {
            if ex >= 0 {
                x += sx;
                ex -= ay;
            }
            if ez >= 0 {
                z += sz;
                ez -= ay;
            }
            y += sy;
            ex += ax;
            ez += az;
            if !push(&mut cells, x, y, z) {
                break;
            }
        }
    } else {
        let (mut ex, mut ey) = (ax - az / 2, ay - az / 2);
        while z != z2 {
            if ex >= 0 {
                x += sx;
                ex -= az;
            }
            if ey >= 0 {
                y += sy;
                ey -= az;
            }
            z += sz;
            ex += ax;
            ey += ay;
            if !push(&mut cells, x, y, z) {
                break;
            }
        }
    }

    cells
}
