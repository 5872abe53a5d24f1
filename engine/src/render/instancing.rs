//! Instance Buffer Data for Voxel Rendering
//!
//! GPU-compatible per-particle instance records. The rendering adapter receives
//! one record per particle slot every step, in slot order, and uploads the
//! slice with `bytemuck::cast_slice` into an instanced cube draw.

/// Instance flag: particle is under free-fall physics.
pub const INSTANCE_FLAG_FALLING: u32 = 1 << 0;
/// Instance flag: particle is resting and structurally supported.
pub const INSTANCE_FLAG_GROUNDED: u32 = 1 << 1;
/// Instance flag: particle was left unmatched by the current rebuild.
pub const INSTANCE_FLAG_RUBBLE: u32 = 1 << 2;

/// GPU instance data for a single voxel particle.
///
/// Layout (32 bytes total):
/// - position:    vec3<f32> (12 bytes) - World-space cube center
/// - color:       u32 (4 bytes) - Packed RGBA (0xRRGGBBAA)
/// - rotation:    vec3<f32> (12 bytes) - Euler angles (radians, XYZ order)
/// - flags:       u32 (4 bytes) - `INSTANCE_FLAG_*` bits
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelInstance {
    pub position: [f32; 3],
    pub color: u32,
    pub rotation: [f32; 3],
    pub flags: u32,
}

static_assertions::assert_eq_size!(VoxelInstance, [u8; 32]);

impl Default for VoxelInstance {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: 0xFFFFFFFF,
            rotation: [0.0; 3],
            flags: 0,
        }
    }
}

impl VoxelInstance {
    /// Create an instance from a transform, a linear RGB color in [0, 1] and flags.
    pub fn new(position: [f32; 3], rotation: [f32; 3], rgb: [f32; 3], flags: u32) -> Self {
        Self {
            position,
            color: pack_rgb_f32(rgb),
            rotation,
            flags,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.flags & INSTANCE_FLAG_FALLING != 0
    }

    pub fn is_grounded(&self) -> bool {
        self.flags & INSTANCE_FLAG_GROUNDED != 0
    }

    pub fn is_rubble(&self) -> bool {
        self.flags & INSTANCE_FLAG_RUBBLE != 0
    }
}

/// Pack RGBA color components into a single u32 value.
/// Format: 0xRRGGBBAA
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

/// Unpack a u32 color value into RGBA components.
#[inline]
pub fn unpack_rgba(packed: u32) -> (u8, u8, u8, u8) {
    (
        (packed >> 24) as u8,
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
    )
}

/// Pack a [0, 1] RGB triple into an opaque 0xRRGGBBAA value.
#[inline]
pub fn pack_rgb_f32(rgb: [f32; 3]) -> u32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    pack_rgba(q(rgb[0]), q(rgb[1]), q(rgb[2]), 0xFF)
}
