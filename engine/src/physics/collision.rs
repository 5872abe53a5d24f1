//! Collision detection module
//!
//! Ray-AABB intersection used to pick a particle under the cursor. Particles
//! are axis-aligned unit cubes for picking purposes; their visual tumble is
//! ignored.
//!
//! # Ray-AABB Intersection
//!
//! The slab method finds entry and exit times for each axis pair of planes
//! and intersects the three intervals.

use glam::Vec3;

/// Result of a ray-cube test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeHit {
    /// Distance from ray origin to the entry point
    pub distance: f32,
    /// World-space entry point
    pub position: Vec3,
    /// Outward normal of the face the ray entered through
    pub normal: Vec3,
}

/// Performs ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the nearest intersection (t >= 0)
/// * `None` - No intersection, or the box is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * d.signum()
        }
    };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t_a = (aabb_min - ray_origin) * inv_dir;
    let t_b = (aabb_max - ray_origin) * inv_dir;
    let t_enter = t_a.min(t_b).max_element();
    let t_exit = t_a.max(t_b).min_element();

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    // Origin inside the box reports the exit distance.
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Ray test against an axis-aligned cube of the given half extent.
pub fn ray_cube_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    half_extent: f32,
) -> Option<CubeHit> {
    let half = Vec3::splat(half_extent);
    let distance = ray_aabb_intersect(ray_origin, ray_dir, center - half, center + half)?;
    let position = ray_origin + ray_dir * distance;
    Some(CubeHit {
        distance,
        position,
        normal: cube_face_normal(position, center),
    })
}

/// Outward normal of the cube face closest to `point`.
fn cube_face_normal(point: Vec3, center: Vec3) -> Vec3 {
    let local = point - center;
    let abs = local.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(local.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, local.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, local.z.signum())
    }
}
