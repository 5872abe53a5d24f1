//! Shape JSON Load/Export
//!
//! Import accepts a top-level array of records, or an object with a `voxels`
//! array. Each record carries `x`, `y`, `z` and a color under `color` or `c`.
//! Malformed records are normalized, never rejected:
//! - coordinates: numbers or numeric strings, rounded to the lattice; anything
//!   non-finite, non-numeric or beyond ±1e6 becomes 0
//! - colors: `"#RRGGBB"`, `"#RGB"`, `"0xRRGGBB"`, integer `0xRRGGBB`, `{r,g,b}`
//!   or `[r,g,b]` (0..1 floats or 0..255); anything else is neutral gray
//!
//! Export writes `{id, x, y, z, c}` per particle with positions rounded to two
//! decimals and `c` as `#rrggbb`. Snapshots read back with
//! [`parse_snapshot_json`] keep those positions unsnapped.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::systems::voxel_sculpt::types::{Particle, PlacedVoxel, Rgb, ShapeVoxel};

/// Coordinates beyond this magnitude are treated as garbage.
const MAX_COORDINATE: f64 = 1.0e6;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while reading or writing shape documents.
#[derive(Debug, thiserror::Error)]
pub enum ShapeFileError {
    /// The document parsed but holds no record list.
    #[error("shape document must be an array of voxels or an object with a `voxels` array")]
    NotAShapeList,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// IMPORT
// ============================================================================

/// Parse a shape document.
pub fn parse_shape_json(json: &str) -> Result<Vec<ShapeVoxel>, ShapeFileError> {
    let value: Value = serde_json::from_str(json)?;
    parse_shape_value(&value)
}

/// Normalize an already parsed shape document.
pub fn parse_shape_value(value: &Value) -> Result<Vec<ShapeVoxel>, ShapeFileError> {
    Ok(record_list(value)?.iter().map(normalize_record).collect())
}

/// Parse an export snapshot, keeping world positions off the lattice.
pub fn parse_snapshot_json(json: &str) -> Result<Vec<PlacedVoxel>, ShapeFileError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(record_list(&value)?
        .iter()
        .map(normalize_placed_record)
        .collect())
}

fn record_list(value: &Value) -> Result<&Vec<Value>, ShapeFileError> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(map) => match map.get("voxels") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(ShapeFileError::NotAShapeList),
        },
        _ => Err(ShapeFileError::NotAShapeList),
    }
}

/// Read and normalize a shape document from disk.
pub fn load_shape_file(path: &Path) -> Result<Vec<ShapeVoxel>, ShapeFileError> {
    let text = std::fs::read_to_string(path)?;
    let shape = parse_shape_json(&text)?;
    log::info!("read {} voxels from {}", shape.len(), path.display());
    Ok(shape)
}

/// Normalize one record; a non-object record becomes a gray voxel at the origin.
pub fn normalize_record(record: &Value) -> ShapeVoxel {
    let field = |key: &str| record.get(key);
    let color = field("color").or_else(|| field("c"));
    ShapeVoxel::new(
        normalize_coordinate(field("x")),
        normalize_coordinate(field("y")),
        normalize_coordinate(field("z")),
        normalize_color(color),
    )
}

/// Snapshot record; same key and color rules as [`normalize_record`].
pub fn normalize_placed_record(record: &Value) -> PlacedVoxel {
    let field = |key: &str| record.get(key);
    let color = field("color").or_else(|| field("c"));
    PlacedVoxel::new(
        Vec3::new(
            normalize_world_coordinate(field("x")),
            normalize_world_coordinate(field("y")),
            normalize_world_coordinate(field("z")),
        ),
        normalize_color(color),
    )
}

fn coordinate_value(value: Option<&Value>) -> Option<f64> {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite() && v.abs() <= MAX_COORDINATE)
}

/// Lattice coordinate from a loosely typed value.
pub fn normalize_coordinate(value: Option<&Value>) -> i32 {
    coordinate_value(value).map_or(0, |v| v.round() as i32)
}

/// Unsnapped world coordinate from a loosely typed value.
pub fn normalize_world_coordinate(value: Option<&Value>) -> f32 {
    coordinate_value(value).map_or(0.0, |v| v as f32)
}

/// Canonical color from a loosely typed value.
pub fn normalize_color(value: Option<&Value>) -> Rgb {
    let parsed = match value {
        Some(Value::String(s)) => Rgb::from_hex(s),
        Some(Value::Number(n)) => n
            .as_u64()
            .filter(|v| *v <= 0xFF_FFFF)
            .map(|v| Rgb::from_packed(v as u32)),
        Some(Value::Object(map)) => channels_to_rgb([map.get("r"), map.get("g"), map.get("b")]),
        Some(Value::Array(items)) if items.len() == 3 => {
            channels_to_rgb([items.first(), items.get(1), items.get(2)])
        }
        _ => None,
    };
    parsed.unwrap_or(Rgb::NEUTRAL_GRAY)
}

/// Channels in 0..=1, or 0..=255 when any channel exceeds 1.
fn channels_to_rgb(channels: [Option<&Value>; 3]) -> Option<Rgb> {
    let mut out = [0.0f64; 3];
    for (slot, channel) in out.iter_mut().zip(channels) {
        let v = channel?.as_f64()?;
        if !v.is_finite() || v < 0.0 {
            return None;
        }
        *slot = v;
    }
    let scale = if out.iter().any(|v| *v > 1.0) { 255.0 } else { 1.0 };
    Some(
        Rgb::new(
            (out[0] / scale) as f32,
            (out[1] / scale) as f32,
            (out[2] / scale) as f32,
        )
        .clamped(),
    )
}

// ============================================================================
// EXPORT
// ============================================================================

/// One exported particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportedVoxel {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub c: String,
}

#[inline]
fn round2(v: f32) -> f64 {
    (v as f64 * 100.0).round() / 100.0
}

/// Snapshot the population in slot order.
pub fn export_particles(particles: &[Particle]) -> Vec<ExportedVoxel> {
    particles
        .iter()
        .enumerate()
        .map(|(id, p)| {
            let pos = p.position();
            ExportedVoxel {
                id,
                x: round2(pos.x),
                y: round2(pos.y),
                z: round2(pos.z),
                c: p.color.to_hex(),
            }
        })
        .collect()
}

pub fn export_json(particles: &[Particle]) -> Result<String, ShapeFileError> {
    Ok(serde_json::to_string_pretty(&export_particles(particles))?)
}

/// Write the export snapshot to disk, creating parent directories.
pub fn save_export(path: &Path, particles: &[Particle]) -> Result<(), ShapeFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, export_json(particles)?)?;
    log::info!("exported {} voxels to {}", particles.len(), path.display());
    Ok(())
}
