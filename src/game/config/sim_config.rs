//! Simulation Configuration
//!
//! Every tunable of the voxel simulation in one place. `Default` returns the
//! values the sculpture scenes are tuned for. Velocities and accelerations are
//! per reference step (`reference_hz`); the integrator rescales them by the
//! real step length.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::BounceParams;
use crate::world::GridConfig;

/// Randomised impulse applied when a particle is set falling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KickConfig {
    /// Horizontal speed range (symmetric, per axis)
    pub horizontal: f32,
    /// Minimum upward speed
    pub vertical_min: f32,
    /// Maximum upward speed
    pub vertical_max: f32,
    /// Angular speed range (symmetric, per axis)
    pub angular: f32,
}

impl KickConfig {
    /// Angular velocity extents as a vector.
    pub fn angular_extent(&self) -> Vec3 {
        Vec3::splat(self.angular)
    }
}

/// Central configuration for the voxel simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Floor plane and lattice
    pub grid: GridConfig,
    /// Step rate the per-step constants are tuned for
    pub reference_hz: f32,
    /// Downward speed gained per reference step
    pub gravity: f32,
    /// Vertical speed kept (and inverted) on floor impact
    pub restitution: f32,
    /// Horizontal velocity multiplier on floor impact
    pub horizontal_bounce_damping: f32,
    /// Angular velocity multiplier on floor impact
    pub angular_bounce_damping: f32,
    /// Per-axis linear speed below which a bouncing particle comes to rest
    pub rest_threshold: f32,
    /// Fraction of the remaining distance covered per reference step while rebuilding
    pub ease_fraction: f32,
    /// Squared distance at which a rebuilding particle snaps onto its target
    pub arrive_epsilon_sq: f32,
    /// Height above the floor within which a resting particle anchors the structure
    pub anchor_tolerance: f32,
    /// Height span (units) that maps onto the full activation delay
    pub delay_height_span: f32,
    /// Activation delay (ms) of a target one full span above the floor
    pub delay_scale_ms: f32,
    /// Color distance below which the planner takes a candidate without scanning further
    pub exact_match_distance: f32,
    /// Kick for particles that lose support after a knock-out
    pub support_kick: KickConfig,
    /// Kick for the particle that was knocked out
    pub knock_kick: KickConfig,
    /// Kick applied to every particle on dismantle
    pub scatter_kick: KickConfig,
    /// Maximum lightness offset applied to colors at load time (0 disables)
    pub color_jitter: f32,
    /// Seed for the kick and jitter noise stream
    pub noise_seed: u32,
    /// Host frame delta clamp for the fixed-step driver (seconds)
    pub max_frame_dt: f32,
    /// Fixed steps the driver runs per host frame at most
    pub max_steps_per_frame: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            reference_hz: 60.0,
            gravity: 0.025,
            restitution: 0.42,
            horizontal_bounce_damping: 0.75,
            angular_bounce_damping: 0.65,
            rest_threshold: 0.05,
            ease_fraction: 0.12,
            arrive_epsilon_sq: 0.01,
            anchor_tolerance: 0.7,
            delay_height_span: 15.0,
            delay_scale_ms: 800.0,
            exact_match_distance: 0.01,
            support_kick: KickConfig {
                horizontal: 0.04,
                vertical_min: 0.0,
                vertical_max: 0.05,
                angular: 0.05,
            },
            knock_kick: KickConfig {
                horizontal: 0.25,
                vertical_min: 0.1,
                vertical_max: 0.25,
                angular: 0.2,
            },
            scatter_kick: KickConfig {
                horizontal: 0.4,
                vertical_min: 0.1,
                vertical_max: 0.5,
                angular: 0.3,
            },
            color_jitter: 0.05,
            noise_seed: 0x5eed_c0de,
            max_frame_dt: 0.1,
            max_steps_per_frame: 8,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Default tuning on a custom floor.
    pub fn with_floor(floor_y: f32) -> Self {
        Self {
            grid: GridConfig::with_floor(floor_y),
            ..Default::default()
        }
    }

    /// Step scale for a real step of `dt` seconds.
    pub fn step_scale(&self, dt: f32) -> f32 {
        dt.max(0.0) * self.reference_hz
    }

    pub fn bounce_params(&self) -> BounceParams {
        BounceParams {
            restitution: self.restitution,
            horizontal_damping: self.horizontal_bounce_damping,
            angular_damping: self.angular_bounce_damping,
            rest_threshold: self.rest_threshold,
        }
    }

    /// Activation delay (ms) for a rebuild target at height `y`.
    pub fn delay_for_height(&self, y: f32) -> f32 {
        let span = self.delay_height_span.max(1e-3);
        ((y - self.grid.floor_y) / span).max(0.0) * self.delay_scale_ms
    }
}
