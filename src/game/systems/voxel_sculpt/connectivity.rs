//! Structural integrity
//!
//! Resting particles form a graph on the lattice; anything not 6-connected to
//! a floor anchor has lost support. A pass handles one support event and does
//! not iterate to a fixed point.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::IVec3;

use super::types::Particle;
use crate::world::GridConfig;

/// Outcome of one integrity pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Slots reached from a floor anchor
    pub supported: Vec<usize>,
    /// Resting slots with no path to an anchor
    pub unsupported: Vec<usize>,
}

/// Classify every non-falling particle as supported or unsupported.
///
/// Falling particles are not part of the graph. Several particles sharing a
/// lattice cell share its support.
pub fn analyze_support(
    particles: &[Particle],
    grid: &GridConfig,
    anchor_tolerance: f32,
) -> IntegrityReport {
    let mut cells: HashMap<IVec3, Vec<usize>> = HashMap::new();
    let mut queue = VecDeque::new();
    let mut reached = HashSet::new();

    for (slot, particle) in particles.iter().enumerate() {
        if particle.is_falling {
            continue;
        }
        let cell = grid.cell_of(particle.position());
        cells.entry(cell).or_default().push(slot);
        if grid.height_above_floor(particle.position()) <= anchor_tolerance
            && reached.insert(cell)
        {
            queue.push_back(cell);
        }
    }

    while let Some(cell) = queue.pop_front() {
        for neighbor in neighbors6(cell) {
            if cells.contains_key(&neighbor) && reached.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    let mut report = IntegrityReport::default();
    for (cell, slots) in &cells {
        if reached.contains(cell) {
            report.supported.extend_from_slice(slots);
        } else {
            report.unsupported.extend_from_slice(slots);
        }
    }
    report.supported.sort_unstable();
    report.unsupported.sort_unstable();
    report
}

#[inline]
pub fn neighbors6(c: IVec3) -> [IVec3; 6] {
    [
        c + IVec3::X,
        c - IVec3::X,
        c + IVec3::Y,
        c - IVec3::Y,
        c + IVec3::Z,
        c - IVec3::Z,
    ]
}
