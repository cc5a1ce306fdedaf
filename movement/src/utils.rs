use nalgebra::Vector3;

use crate::constants::DIST_EPS;

/// Planar forward basis vector for a yaw (radians about +Y). Yaw `0` faces +Z.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vector3<f32> {
    Vector3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Planar right basis vector for a yaw (radians about +Y). Yaw `0` has right along +X.
#[inline]
pub fn right_from_yaw(yaw: f32) -> Vector3<f32> {
    Vector3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Drops the vertical component.
#[inline]
pub fn to_planar(v: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, 0.0, v.z)
}

/// Linear interpolation with `t` clamped to [0, 1].
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Turns `normal` by `angle_rad` toward `toward`, staying in the horizontal plane.
///
/// The result is `cos(angle) * n + sin(angle) * t`, where `t` is the part of `toward`
/// perpendicular to `n`. When `toward` has no usable perpendicular part, `fallback` is used
/// for `t` instead. Returns a unit vector, or `normal` flattened if it has no planar extent.
pub fn rotate_planar_toward(
    normal: Vector3<f32>,
    toward: Vector3<f32>,
    fallback: Vector3<f32>,
    angle_rad: f32,
) -> Vector3<f32> {
    let Some(n) = to_planar(&normal).try_normalize(DIST_EPS) else {
        return to_planar(&normal);
    };

    let tangent_of = |v: Vector3<f32>| {
        let planar = to_planar(&v);
        (planar - n * planar.dot(&n)).try_normalize(DIST_EPS)
    };

    let t = tangent_of(toward)
        .or_else(|| tangent_of(fallback))
        .unwrap_or_else(Vector3::zeros);

    (n * angle_rad.cos() + t * angle_rad.sin())
        .try_normalize(DIST_EPS)
        .unwrap_or(n)
}
