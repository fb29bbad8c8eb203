//! Cartesian pose of a tile slot or tool target.

use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::conversion::{euler_zyx_to_quaternion, quaternion_to_euler_zyx};

/// Position plus A-B-C orientation of a frame.
///
/// Translation is in millimetres, orientation in radians using the intrinsic
/// Z-Y'-X'' convention (see [`crate::conversion`]). Poses are plain values:
/// every derived pose is a new value built from a source pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Rotation around Z
    pub alpha: f64,

    /// Rotation around Y'. Tile turns are applied here.
    pub beta: f64,

    /// Rotation around X''
    pub gamma: f64,
}

impl Pose {
    /// Create a pose from position (mm) and A-B-C angles (rad).
    pub fn new(x: f64, y: f64, z: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            x,
            y,
            z,
            alpha,
            beta,
            gamma,
        }
    }

    /// Create a pose from translation only (identity rotation).
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }

    /// Get translation components.
    pub fn translation(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Copy of this pose shifted along the lateral (Y) axis.
    pub fn shifted_lateral(&self, offset: f64) -> Self {
        Self {
            y: self.y + offset,
            ..*self
        }
    }

    /// Copy of this pose with beta changed by `delta` radians.
    pub fn turned_beta(&self, delta: f64) -> Self {
        Self {
            beta: self.beta + delta,
            ..*self
        }
    }

    /// Orientation as a unit quaternion.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        euler_zyx_to_quaternion(self.alpha, self.beta, self.gamma)
    }

    /// The full SE3 transform.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::new(self.x, self.y, self.z), self.rotation())
    }

    /// Build a pose from an SE3 transform.
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let t = &iso.translation;
        let (alpha, beta, gamma) = quaternion_to_euler_zyx(&iso.rotation);
        Self::new(t.x, t.y, t.z, alpha, beta, gamma)
    }

    /// Smallest angle (rad) between this orientation and `other`'s.
    ///
    /// Angles that differ by whole turns compare as zero.
    pub fn orientation_distance(&self, other: &Pose) -> f64 {
        self.rotation().angle_to(&other.rotation())
    }

    /// Euclidean distance between the two positions (mm).
    pub fn position_distance(&self, other: &Pose) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Position and orientation equal within the given tolerances.
    pub fn approx_eq(&self, other: &Pose, position_tol: f64, angle_tol: f64) -> bool {
        self.position_distance(other) <= position_tol
            && self.orientation_distance(other) <= angle_tol
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1} | A {:.1}° B {:.1}° C {:.1}°)",
            self.x,
            self.y,
            self.z,
            self.alpha.to_degrees(),
            self.beta.to_degrees(),
            self.gamma.to_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_pose_from_translation() {
        let pose = Pose::from_translation(100.0, 200.0, 300.0);
        let (x, y, z) = pose.translation();
        assert!((x - 100.0).abs() < 1e-10);
        assert!((y - 200.0).abs() < 1e-10);
        assert!((z - 300.0).abs() < 1e-10);
        assert_eq!(pose.beta, 0.0);
    }

    #[test]
    fn test_shift_and_turn_leave_source_untouched() {
        let source = Pose::new(10.0, 20.0, 30.0, 0.1, 0.2, 0.3);
        let moved = source.shifted_lateral(-65.0).turned_beta(-1.0);

        assert_eq!(source, Pose::new(10.0, 20.0, 30.0, 0.1, 0.2, 0.3));
        assert_eq!(moved.y, 20.0 - 65.0);
        assert_eq!(moved.beta, 0.2 - 1.0);
        assert_eq!((moved.x, moved.z, moved.alpha, moved.gamma), (10.0, 30.0, 0.1, 0.3));
    }

    #[test]
    fn test_full_turn_is_identity_orientation() {
        let pose = Pose::new(0.0, 0.0, 0.0, 0.3, 0.4, -0.2);
        let turned = pose.turned_beta(-2.0 * PI);
        assert!(pose.orientation_distance(&turned) < 1e-6);
    }

    #[test]
    fn test_isometry_roundtrip() {
        let pose = Pose::new(1.0, -2.0, 3.0, 0.5, -0.3, 1.1);
        let back = Pose::from_isometry(&pose.to_isometry());
        assert!(pose.approx_eq(&back, 1e-9, 1e-6));
    }

    #[test]
    fn test_display() {
        let pose = Pose::new(1.0, 2.0, 3.0, 0.0, -PI / 2.0, 0.0);
        assert_eq!(pose.to_string(), "(1.0, 2.0, 3.0 | A 0.0° B -90.0° C 0.0°)");
    }
}
