//! Procedural shapes
//!
//! Small generated sculptures for the sandbox and tests. Every generator
//! places its lowest layer on the floor lattice row (`floor_y` rounded).

use glam::IVec3;

use crate::game::systems::voxel_sculpt::types::{Rgb, ShapeVoxel};

/// Stepped pyramid with `levels` layers; layer `i` is `(2*(levels-i)-1)²`
/// voxels. Colors cycle through `palette` by layer.
pub fn pyramid(levels: u32, floor_y: f32, palette: &[Rgb]) -> Vec<ShapeVoxel> {
    let base = floor_y.round() as i32;
    let mut voxels = Vec::new();
    for level in 0..levels as i32 {
        let half = levels as i32 - 1 - level;
        let color = pick(palette, level as usize);
        for z in -half..=half {
            for x in -half..=half {
                voxels.push(ShapeVoxel::new(x, base + level, z, color));
            }
        }
    }
    voxels
}

/// Solid box `width` x `height` x `depth`, centered on x/z.
pub fn tower(width: u32, depth: u32, height: u32, floor_y: f32, color: Rgb) -> Vec<ShapeVoxel> {
    let base = floor_y.round() as i32;
    let x0 = -(width as i32) / 2;
    let z0 = -(depth as i32) / 2;
    let mut voxels = Vec::with_capacity((width * depth * height) as usize);
    for y in 0..height as i32 {
        for z in 0..depth as i32 {
            for x in 0..width as i32 {
                voxels.push(ShapeVoxel::new(x0 + x, base + y, z0 + z, color));
            }
        }
    }
    voxels
}

/// Voxelized ball resting on the floor; colors band by height.
pub fn sphere(radius: u32, floor_y: f32, palette: &[Rgb]) -> Vec<ShapeVoxel> {
    let r = radius as i32;
    let center = IVec3::new(0, floor_y.round() as i32 + r, 0);
    let limit = (radius as f32 + 0.5).powi(2);
    let mut voxels = Vec::new();
    for y in -r..=r {
        for z in -r..=r {
            for x in -r..=r {
                let d = IVec3::new(x, y, z).as_vec3().length_squared();
                if d <= limit {
                    let p = center + IVec3::new(x, y, z);
                    voxels.push(ShapeVoxel::new(p.x, p.y, p.z, pick(palette, (y + r) as usize)));
                }
            }
        }
    }
    voxels
}

fn pick(palette: &[Rgb], index: usize) -> Rgb {
    if palette.is_empty() {
        Rgb::NEUTRAL_GRAY
    } else {
        palette[index % palette.len()]
    }
}
