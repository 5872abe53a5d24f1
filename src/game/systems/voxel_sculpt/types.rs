use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::VoxelBody;

/// Linear RGB color, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Fallback for colors that cannot be parsed.
    pub const NEUTRAL_GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// `0xRRGGBB`
    pub fn from_packed(value: u32) -> Self {
        Self::from_u8((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `0xRRGGBB`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let t = text.trim();
        let digits = t
            .strip_prefix('#')
            .or_else(|| t.strip_prefix("0x"))
            .or_else(|| t.strip_prefix("0X"))
            .unwrap_or(t);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_packed),
            3 => {
                let v = u32::from_str_radix(digits, 16).ok()?;
                let expand = |n: u32| ((n & 0xF) * 0x11) as u8;
                Some(Self::from_u8(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }

    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    /// Shift all channels by the same amount (a lightness offset), clamped to [0, 1].
    pub fn offset_lightness(self, amount: f32) -> Self {
        Self::new(self.r + amount, self.g + amount, self.b + amount).clamped()
    }

    pub fn to_u8(self) -> [u8; 3] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// `#RRGGBB`, lowercase hex digits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Luma-weighted distance used to match particles to rebuild targets.
    pub fn perceptual_distance(self, other: Rgb) -> f32 {
        let dr = 0.3 * (self.r - other.r);
        let dg = 0.59 * (self.g - other.g);
        let db = 0.11 * (self.b - other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// One voxel of a shape, already normalized at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeVoxel {
    pub position: IVec3,
    pub color: Rgb,
}

impl ShapeVoxel {
    pub fn new(x: i32, y: i32, z: i32, color: Rgb) -> Self {
        Self {
            position: IVec3::new(x, y, z),
            color,
        }
    }

    /// World-space center of the voxel on a lattice of `grid_size`.
    pub fn world_position(&self, grid_size: f32) -> Vec3 {
        self.position.as_vec3() * grid_size
    }
}

/// A particle pose read back from an export snapshot, in world units.
///
/// Unlike [`ShapeVoxel`] it is not tied to the lattice, so rubble resting
/// between cells reloads where it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedVoxel {
    pub position: Vec3,
    pub color: Rgb,
}

impl PlacedVoxel {
    pub fn new(position: Vec3, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Lifecycle state of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimState {
    #[default]
    Stable,
    Dismantling,
    Rebuilding,
}

impl SimState {
    pub fn label(self) -> &'static str {
        match self {
            SimState::Stable => "STABLE",
            SimState::Dismantling => "DISMANTLING",
            SimState::Rebuilding => "REBUILDING",
        }
    }
}

impl std::fmt::Display for SimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-slot plan for one rebuild cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RebuildAssignment {
    /// Ease to `position` once `delay_ms` have elapsed since the rebuild began.
    Target {
        position: Vec3,
        delay_ms: f32,
        arrived: bool,
    },
    /// Unmatched; frozen in place and excluded from completion.
    Rubble,
}

impl RebuildAssignment {
    pub fn target(position: Vec3, delay_ms: f32) -> Self {
        RebuildAssignment::Target {
            position,
            delay_ms,
            arrived: false,
        }
    }

    pub fn is_rubble(&self) -> bool {
        matches!(self, RebuildAssignment::Rubble)
    }

    /// Matched and not yet at its target.
    pub fn is_pending(&self) -> bool {
        matches!(self, RebuildAssignment::Target { arrived: false, .. })
    }
}

/// One simulated cube. Identity is its slot index in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub body: VoxelBody,
    pub color: Rgb,
    pub is_falling: bool,
    pub grounded: bool,
}

impl Particle {
    /// Resting, supported particle at `position`.
    pub fn resting(position: Vec3, color: Rgb) -> Self {
        Self {
            body: VoxelBody::at(position),
            color,
            is_falling: false,
            grounded: true,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Put the particle under free-fall physics with an initial impulse.
    pub fn start_falling(&mut self, velocity: Vec3, angular_velocity: Vec3) {
        self.is_falling = true;
        self.grounded = false;
        self.body.velocity = velocity;
        self.body.angular_velocity = angular_velocity;
    }

    /// Settle exactly onto `position` as a supported particle.
    pub fn settle_at(&mut self, position: Vec3) {
        self.body.position = position;
        self.body.rotation = Vec3::ZERO;
        self.body.stop();
        self.is_falling = false;
        self.grounded = true;
    }
}

/// Snapshot of population counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStats {
    pub state: SimState,
    pub total: usize,
    pub falling: usize,
    pub grounded: usize,
    pub rubble: usize,
    /// Matched particles still on their way to a target
    pub converging: usize,
}

/// Particle hit by a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelPick {
    pub slot: usize,
    pub distance: f32,
    pub world_pos: Vec3,
    pub normal: Vec3,
}

/// Observable lifecycle events, drained by the host each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationEvent {
    StateChanged(SimState),
    CountChanged(usize),
    /// Particles newly set falling by a knock-out or integrity pass
    Collapsed { count: usize },
    RebuildPlanned {
        matched: usize,
        rubble: usize,
        unassigned: usize,
    },
}
