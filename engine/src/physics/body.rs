//! Voxel body kinematics
//!
//! Explicit Euler integration for a single cube particle. No external physics
//! dependencies; the model is deliberately approximate (no inertia tensor, no
//! particle-vs-particle contacts, one infinite floor plane).

use glam::Vec3;

/// Kinematic state of one cube particle.
///
/// `rotation` is a visual tumble (Euler angles, radians) with no physical effect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoxelBody {
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

/// Energy loss applied when a body strikes the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceParams {
    /// Fraction of vertical speed kept (and inverted) on impact
    pub restitution: f32,
    /// Multiplier applied to horizontal velocity on impact
    pub horizontal_damping: f32,
    /// Multiplier applied to angular velocity on impact
    pub angular_damping: f32,
    /// Per-axis linear speed below which the body is considered at rest
    pub rest_threshold: f32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            restitution: 0.42,
            horizontal_damping: 0.75,
            angular_damping: 0.65,
            rest_threshold: 0.05,
        }
    }
}

/// Outcome of a floor contact check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorContact {
    /// Body is above the floor
    Airborne,
    /// Body struck the floor and rebounded
    Bounced,
    /// Body struck the floor and every velocity component was zeroed
    Rested,
}

impl VoxelBody {
    /// Body at rest at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Zero linear and angular velocity.
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    pub fn is_still(&self) -> bool {
        self.velocity == Vec3::ZERO && self.angular_velocity == Vec3::ZERO
    }

    /// Apply gravity and advance position and tumble by one scaled step.
    ///
    /// `gravity` is the downward speed gained per reference step; `k` is the
    /// step scale (`dt * reference_hz`).
    pub fn integrate_free_fall(&mut self, gravity: f32, k: f32) {
        self.velocity.y -= gravity * k;
        self.position += self.velocity * k;
        self.rotation += self.angular_velocity * k;
    }

    /// Clamp the body onto the floor and apply bounce damping.
    ///
    /// Rest detection only runs on impact; a body at the apex of a bounce keeps
    /// its (small) velocity.
    pub fn resolve_floor(&mut self, contact_y: f32, params: &BounceParams) -> FloorContact {
        if self.position.y >= contact_y {
            return FloorContact::Airborne;
        }

        self.position.y = contact_y;
        self.velocity.y = -self.velocity.y * params.restitution;
        self.velocity.x *= params.horizontal_damping;
        self.velocity.z *= params.horizontal_damping;
        self.angular_velocity *= params.angular_damping;

        let v = self.velocity.abs();
        if v.max_element() < params.rest_threshold {
            self.stop();
            FloorContact::Rested
        } else {
            FloorContact::Bounced
        }
    }

    /// Ease position toward `target` and rotation toward zero.
    ///
    /// Returns `true` (and snaps exactly onto the target with zero rotation and
    /// velocity) once the squared distance drops below `arrive_epsilon_sq`.
    pub fn ease_toward(&mut self, target: Vec3, fraction: f32, arrive_epsilon_sq: f32) -> bool {
        self.position += (target - self.position) * fraction;
        self.rotation += (Vec3::ZERO - self.rotation) * fraction;

        if self.position.distance_squared(target) < arrive_epsilon_sq {
            self.position = target;
            self.rotation = Vec3::ZERO;
            self.stop();
            return true;
        }
        false
    }
}

/// Per-step smoothing fraction rescaled to a step of `k` reference steps.
///
/// Compounding keeps the convergence rate independent of the host cadence:
/// `k = 1` returns `fraction` unchanged, `k = 2` matches two 60 Hz steps.
#[inline]
pub fn scaled_fraction(fraction: f32, k: f32) -> f32 {
    if k == 1.0 {
        return fraction;
    }
    (1.0 - (1.0 - fraction).clamp(0.0, 1.0).powf(k.max(0.0))).clamp(0.0, 1.0)
}
