//! Render Module
//!
//! Data handed to the rendering adapter. The engine does not own a GPU
//! context; it only produces tightly packed instance records the host uploads.

pub mod instancing;

pub use instancing::{
    INSTANCE_FLAG_FALLING, INSTANCE_FLAG_GROUNDED, INSTANCE_FLAG_RUBBLE, VoxelInstance,
    pack_rgb_f32, pack_rgba, unpack_rgba,
};
