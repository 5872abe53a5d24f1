//! Physics module for the voxel sculpture engine
//!
//! Stylised kinematics for unit-cube particles: free fall under a constant
//! per-step acceleration, a single floor plane with restitution, exponential
//! easing toward a target pose, and ray picking against unit cubes.
//!
//! # Unit System
//!
//! Velocities are expressed in **units per reference step** (60 steps/s).
//! Callers pass a step scale `k = dt * reference_hz`, so a 60 Hz host uses
//! `k = 1.0` and every constant reads exactly as tuned.
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`body`] - Per-particle kinematic state and its integration steps
//! - [`collision`] - Ray-AABB intersection for picking particles

pub mod body;
pub mod collision;
pub mod types;

pub use body::{BounceParams, FloorContact, VoxelBody, scaled_fraction};
pub use collision::{CubeHit, ray_aabb_intersect, ray_cube_intersect};
pub use types::{IVec3, Vec3};
