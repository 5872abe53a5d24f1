//! Game Module
//!
//! Sculpture-specific systems that build on top of the engine: the voxel
//! simulation, its configuration, and the shape I/O boundary.

pub mod config;
pub mod noise;
pub mod shape_io;
pub mod systems;

pub use config::{KickConfig, SimulationConfig};
pub use noise::ScatterNoise;
pub use shape_io::{ExportedVoxel, ShapeFileError, export_json, parse_shape_json};
pub use systems::{
    FixedStepper, Particle, PlacedVoxel, RebuildAssignment, Rgb, ShapeVoxel, SimState,
    SimulationEvent, SimulationObserver, SimulationStats, VoxelPick, VoxelSimulation,
};
