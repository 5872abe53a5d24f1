use super::types::{Particle, RebuildAssignment};
use crate::render::{
    INSTANCE_FLAG_FALLING, INSTANCE_FLAG_GROUNDED, INSTANCE_FLAG_RUBBLE, VoxelInstance,
};

/// Fill `out` with one instance per particle, in slot order.
///
/// `assignments` is the current rebuild plan, empty outside a rebuild.
pub fn build_instances(
    particles: &[Particle],
    assignments: &[RebuildAssignment],
    out: &mut Vec<VoxelInstance>,
) {
    out.clear();
    out.reserve(particles.len());
    for (slot, p) in particles.iter().enumerate() {
        let mut flags = 0;
        if p.is_falling {
            flags |= INSTANCE_FLAG_FALLING;
        }
        if p.grounded {
            flags |= INSTANCE_FLAG_GROUNDED;
        }
        if assignments.get(slot).is_some_and(RebuildAssignment::is_rubble) {
            flags |= INSTANCE_FLAG_RUBBLE;
        }
        out.push(VoxelInstance::new(
            p.body.position.to_array(),
            p.body.rotation.to_array(),
            p.color.to_array(),
            flags,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::voxel_sculpt::types::Rgb;
    use glam::Vec3;

    #[test]
    fn test_instances_follow_slot_order() {
        let mut falling = Particle::resting(Vec3::new(2.0, 0.0, 0.0), Rgb::new(1.0, 0.0, 0.0));
        falling.start_falling(Vec3::ZERO, Vec3::ZERO);
        let particles = vec![
            Particle::resting(Vec3::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0)),
            falling,
        ];
        let assignments = vec![
            RebuildAssignment::target(Vec3::ZERO, 0.0),
            RebuildAssignment::Rubble,
        ];
        let mut out = Vec::new();

        build_instances(&particles, &assignments, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, [1.0, 0.0, 0.0]);
        assert!(out[0].is_grounded() && !out[0].is_rubble());
        assert!(out[1].is_falling() && out[1].is_rubble());
        assert_eq!(out[1].color, 0xFF0000FF);
    }
}
