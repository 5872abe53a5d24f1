//! Rebuild planning
//!
//! Greedy nearest-color matching of existing particles onto an ordered target
//! list. Targets are processed in the order given; for each one the untaken
//! pool is scanned in slot order and the first minimum wins. The result is not
//! a globally optimal matching.

use super::types::{Particle, RebuildAssignment, Rgb, ShapeVoxel};
use crate::game::config::SimulationConfig;

/// Assignment for one rebuild cycle, indexed by particle slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildPlan {
    pub assignments: Vec<RebuildAssignment>,
    /// Targets that received a particle
    pub matched: usize,
    /// Particles left without a target
    pub rubble: usize,
    /// Targets left without a particle
    pub unassigned: usize,
}

#[derive(Debug, Clone, Copy)]
struct PoolEntry {
    slot: usize,
    color: Rgb,
    taken: bool,
}

pub fn plan_rebuild(
    particles: &[Particle],
    targets: &[ShapeVoxel],
    config: &SimulationConfig,
) -> RebuildPlan {
    let mut pool: Vec<PoolEntry> = particles
        .iter()
        .enumerate()
        .map(|(slot, p)| PoolEntry {
            slot,
            color: p.color,
            taken: false,
        })
        .collect();
    let mut plan = RebuildPlan {
        assignments: vec![RebuildAssignment::Rubble; particles.len()],
        ..Default::default()
    };
    let mut available = pool.len();

    for target in targets {
        if available == 0 {
            plan.unassigned += 1;
            continue;
        }

        let mut best: Option<(usize, f32)> = None;
        for (index, entry) in pool.iter().enumerate() {
            if entry.taken {
                continue;
            }
            let distance = entry.color.perceptual_distance(target.color);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
            if distance < config.exact_match_distance {
                break;
            }
        }

        let Some((index, _)) = best else {
            plan.unassigned += 1;
            continue;
        };
        let entry = &mut pool[index];
        entry.taken = true;
        available -= 1;

        let position = target.world_position(config.grid.grid_size);
        plan.assignments[entry.slot] =
            RebuildAssignment::target(position, config.delay_for_height(position.y));
        plan.matched += 1;
    }

    plan.rubble = plan.assignments.iter().filter(|a| a.is_rubble()).count();
    plan
}
