//! Per-step particle integration
//!
//! Two mutually exclusive paths: free fall with floor bounce outside a
//! rebuild, eased convergence toward assigned targets during one. Rubble gets
//! neither while a rebuild is in flight.

use glam::Vec3;

use super::types::{Particle, RebuildAssignment};
use crate::game::config::{KickConfig, SimulationConfig};
use crate::game::noise::ScatterNoise;
use crate::physics::{FloorContact, scaled_fraction};

/// Counts from one free-fall step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallStep {
    pub moving: usize,
    pub bounced: usize,
    pub rested: usize,
}

/// Draw a randomised launch impulse: symmetric horizontal and angular
/// components, upward vertical component.
pub fn sample_kick(noise: &mut ScatterNoise, kick: &KickConfig) -> (Vec3, Vec3) {
    let velocity = Vec3::new(
        noise.next_signed() * kick.horizontal,
        noise.next_range(kick.vertical_min, kick.vertical_max),
        noise.next_signed() * kick.horizontal,
    );
    let angular = noise.signed_vec3(kick.angular_extent());
    (velocity, angular)
}

/// Advance every falling particle by `k` reference steps.
///
/// A particle that is already still on the floor is skipped; one frozen in
/// mid-air (left over from a rebuild) resumes falling.
pub fn step_falling(particles: &mut [Particle], config: &SimulationConfig, k: f32) -> FallStep {
    let contact_y = config.grid.contact_height();
    let bounce = config.bounce_params();
    let mut summary = FallStep::default();

    if k <= 0.0 {
        return summary;
    }

    for particle in particles.iter_mut().filter(|p| p.is_falling) {
        if particle.body.is_still() && particle.body.position.y <= contact_y {
            continue;
        }
        summary.moving += 1;
        particle.body.integrate_free_fall(config.gravity, k);
        match particle.body.resolve_floor(contact_y, &bounce) {
            FloorContact::Airborne => {}
            FloorContact::Bounced => summary.bounced += 1,
            FloorContact::Rested => summary.rested += 1,
        }
    }
    summary
}

/// Ease matched particles whose delay has elapsed; returns how many matched
/// particles have not arrived yet.
pub fn step_rebuild(
    particles: &mut [Particle],
    assignments: &mut [RebuildAssignment],
    elapsed_ms: f32,
    config: &SimulationConfig,
    k: f32,
) -> usize {
    let fraction = scaled_fraction(config.ease_fraction, k);
    let mut pending = 0;

    for (particle, assignment) in particles.iter_mut().zip(assignments.iter_mut()) {
        let RebuildAssignment::Target {
            position,
            delay_ms,
            arrived,
        } = assignment
        else {
            continue;
        };
        if *arrived {
            continue;
        }
        if elapsed_ms > *delay_ms
            && particle
                .body
                .ease_toward(*position, fraction, config.arrive_epsilon_sq)
        {
            particle.settle_at(*position);
            *arrived = true;
            continue;
        }
        pending += 1;
    }
    pending
}
