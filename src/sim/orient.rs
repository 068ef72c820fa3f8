//! Orientation math
//!
//! Orientation travels on the wire as a forward/up basis. Right is always
//! derived as `up × forward`, so the basis matrix columns are
//! (forward, right, up).

use glam::{Mat3, Quat, Vec3, Vec4};

use crate::consts::ANG_EPSILON;

/// Right vector of a forward/up basis
#[inline]
pub fn right_of(forward: Vec3, up: Vec3) -> Vec3 {
    up.cross(forward)
}

/// Quaternion for a forward/up basis, `None` for a degenerate (zero or
/// non-finite) basis
pub fn basis_to_quat(forward: Vec3, up: Vec3) -> Option<Quat> {
    let rot = Mat3::from_cols(forward, right_of(forward, up), up);
    Vec4::from(Quat::from_mat3(&rot))
        .try_normalize()
        .map(Quat::from_vec4)
}

/// Forward and up vectors of a rotation
pub fn quat_to_basis(quat: Quat) -> (Vec3, Vec3) {
    let rot = Mat3::from_quat(quat);
    (rot.x_axis, rot.z_axis)
}

/// Integrate a forward/up basis by an angular velocity over `dt`.
///
/// Uses the exponential map: the step `s = ω·dt` is a rotation of `|s|`
/// radians about `s/|s|`, applied in world space. Steps shorter than
/// `ANG_EPSILON` (and degenerate bases) leave the basis untouched.
pub fn integrate_orientation(forward: Vec3, up: Vec3, ang_vel: Vec3, dt: f32) -> (Vec3, Vec3) {
    let step = ang_vel * dt;
    let len = step.length();
    if len <= ANG_EPSILON {
        return (forward, up);
    }
    let Some(base) = basis_to_quat(forward, up) else {
        return (forward, up);
    };

    let half = len * 0.5;
    let axis = step / len;
    let (sin, cos) = half.sin_cos();
    let delta = Quat::from_xyzw(axis.x * sin, axis.y * sin, axis.z * sin, cos);

    let rotated = (delta * base).normalize();
    quat_to_basis(rotated)
}

/// Linear blend of two directions, renormalized to unit length.
///
/// A blend that collapses to zero (opposite inputs at the midpoint, or zero
/// inputs) falls back to whichever endpoint is usable, then `fallback`.
pub fn blend_unit(from: Vec3, to: Vec3, t: f32, fallback: Vec3) -> Vec3 {
    crate::lerp_vec3(from, to, t)
        .try_normalize()
        .or_else(|| if t < 0.5 { from.try_normalize() } else { to.try_normalize() })
        .unwrap_or(fallback)
}
