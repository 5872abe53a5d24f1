//! Game Systems Module
//!
//! Simulation systems that run inside the host's fixed-step loop.

pub mod voxel_sculpt;

pub use voxel_sculpt::{
    FixedStepper, Particle, PlacedVoxel, RebuildAssignment, RebuildPlan, Rgb, ShapeVoxel,
    SimState, SimulationEvent, SimulationObserver, SimulationStats, VoxelPick, VoxelSimulation,
};
