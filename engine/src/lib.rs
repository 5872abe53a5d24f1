//! Voxel Sculpt Engine Library
//!
//! Simulation core for voxel sculptures that can be knocked apart, scattered
//! into a collapse, and rebuilt into a different sculpture from the same
//! particles.
//!
//! # Modules
//!
//! - [`physics`] - Per-particle kinematics, floor bounce, ray picking
//! - [`render`] - Instance records handed to the rendering adapter
//! - [`world`] - Floor plane and lattice configuration
//! - [`game`] - The simulation controller, its config, and shape I/O
//!
//! # Example
//!
//! ```
//! use voxel_sculpt_engine::game::shape_io::{pyramid, tower};
//! use voxel_sculpt_engine::{Rgb, SimState, SimulationConfig, VoxelSimulation};
//!
//! let config = SimulationConfig::default();
//! let floor = config.grid.floor_y;
//! let mut sim = VoxelSimulation::new(config);
//! sim.load_shape(&pyramid(3, floor, &[Rgb::new(0.9, 0.3, 0.2)]));
//!
//! sim.dismantle();
//! for _ in 0..60 {
//!     sim.step(1.0 / 60.0);
//! }
//! sim.rebuild(&tower(2, 2, 4, floor, Rgb::new(0.9, 0.3, 0.2)));
//! while sim.state() == SimState::Rebuilding {
//!     sim.step(1.0 / 60.0);
//! }
//! assert_eq!(sim.state(), SimState::Stable);
//! ```

pub mod physics;
pub mod render;
pub mod world;

// Simulation systems (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use game::{
    FixedStepper, Particle, PlacedVoxel, RebuildAssignment, Rgb, ShapeVoxel, SimState,
    SimulationConfig, SimulationEvent, SimulationObserver, SimulationStats, VoxelPick,
    VoxelSimulation,
};
pub use render::VoxelInstance;
pub use world::GridConfig;
