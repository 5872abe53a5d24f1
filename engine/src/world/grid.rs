//! Grid Configuration Module
//!
//! Floor height and lattice spacing for world-space operations.
//!
//! The integrity check keys resting particles onto this lattice, and the
//! integrator collides particles against the floor plane it describes.
//! The configuration is read-only once a simulation is built.
//!
//! ## Units
//! - 1 unit = 1 voxel edge at the default `grid_size`
//! - Particles rest with their center half a unit above the floor

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Default floor height used by the sculpture scenes.
pub const DEFAULT_FLOOR_Y: f32 = -12.0;

/// Floor plane and lattice configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Y-coordinate of the floor plane
    pub floor_y: f32,
    /// Lattice spacing (edge length of one voxel)
    pub grid_size: f32,
    /// Half the height of a particle; resting centers sit this far above the floor
    pub half_extent: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            floor_y: DEFAULT_FLOOR_Y,
            grid_size: 1.0,
            half_extent: 0.5,
        }
    }
}

impl GridConfig {
    /// Create a GridConfig with a custom floor and unit lattice.
    pub fn with_floor(floor_y: f32) -> Self {
        Self {
            floor_y,
            ..Default::default()
        }
    }

    /// Lattice cell containing a world position (rounded on every axis).
    pub fn cell_of(&self, pos: Vec3) -> IVec3 {
        let size = self.grid_size.max(1e-4);
        IVec3::new(
            (pos.x / size).round() as i32,
            (pos.y / size).round() as i32,
            (pos.z / size).round() as i32,
        )
    }

    /// Height a particle center is clamped to when it touches the floor.
    pub fn contact_height(&self) -> f32 {
        floor_contact_height(self.floor_y, self.half_extent)
    }

    /// Height of a position above the floor plane (negative below it).
    pub fn height_above_floor(&self, pos: Vec3) -> f32 {
        pos.y - self.floor_y
    }
}

/// Height of a resting particle center for a given floor and half extent.
#[inline]
pub fn floor_contact_height(floor_y: f32, half_extent: f32) -> f32 {
    floor_y + half_extent
}
