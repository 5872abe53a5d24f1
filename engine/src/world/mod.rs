//! World Module
//!
//! World-space configuration shared by the simulation and the rendering adapter.
//!
//! ## Default World
//! A flat floor plane at `y = -12` with a 1-unit voxel lattice. Sculptures are
//! authored on integer coordinates and every particle is a unit cube.

pub mod grid;

pub use grid::{GridConfig, floor_contact_height};
