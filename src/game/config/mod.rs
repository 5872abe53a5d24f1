//! Config Module
//!
//! Centralized configuration for the voxel simulation.

pub mod sim_config;

pub use sim_config::{KickConfig, SimulationConfig};
