//! Quaternion ↔ Euler angle conversion utilities.
//!
//! Slot frames use the A-B-C (Euler ZYX intrinsic) convention:
//! - A (alpha): rotation around Z (first)
//! - B (beta): rotation around Y' (second)
//! - C (gamma): rotation around X'' (third)
//!
//! This is equivalent to extrinsic XYZ: C around fixed X, B around fixed Y,
//! A around fixed Z. All angles are in radians.

use nalgebra::{Rotation3, UnitQuaternion};

/// Convert a unit quaternion to Euler ZYX angles in radians.
///
/// Returns `(alpha, beta, gamma)`.
///
/// # Gimbal Lock
/// When beta = ±π/2 the first and third angles are coupled; nalgebra folds
/// the whole rotation into alpha and gamma comes back as zero.
pub fn quaternion_to_euler_zyx(q: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    // euler_angles returns (roll, pitch, yaw) = (gamma, beta, alpha)
    let (gamma, beta, alpha) = q.to_rotation_matrix().euler_angles();
    (alpha, beta, gamma)
}

/// Convert Euler ZYX angles in radians to a unit quaternion.
pub fn euler_zyx_to_quaternion(alpha: f64, beta: f64, gamma: f64) -> UnitQuaternion<f64> {
    // from_euler_angles takes (roll, pitch, yaw) = (X, Y, Z)
    let rotation = Rotation3::from_euler_angles(gamma, beta, alpha);
    UnitQuaternion::from_rotation_matrix(&rotation)
}
