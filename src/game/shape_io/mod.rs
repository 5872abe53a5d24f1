//! Shape I/O
//!
//! Boundary between loosely typed shape sources and the simulation. Records
//! are normalized into [`ShapeVoxel`](crate::game::systems::ShapeVoxel) here;
//! nothing past this module branches on how a color or coordinate was written.

pub mod shape_file;
pub mod shapes;

pub use shape_file::{
    ExportedVoxel, ShapeFileError, export_json, export_particles, load_shape_file,
    normalize_color, normalize_coordinate, normalize_placed_record, normalize_record,
    normalize_world_coordinate, parse_shape_json, parse_shape_value, parse_snapshot_json,
    save_export,
};
pub use shapes::{pyramid, sphere, tower};
