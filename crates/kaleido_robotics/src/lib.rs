//! Robot-agnostic geometry for the kaleidoscope tile cell.
//!
//! This crate holds the value types shared by the choreography engine and
//! the pure geometry of a single pick-and-turn:
//!
//! - [`Pose`]: position (mm) plus A-B-C Euler orientation (radians)
//! - [`SlotId`]: a named tile slot, resolved to a pose by a frame repository
//! - [`RotationAmount`]: the only two legal tile turns, 120° and 240°
//! - [`derive_waypoints`]: approach / rotated approach / rotated place poses
//!
//! # Example
//!
//! ```rust
//! use kaleido_robotics::{derive_waypoints, Pose, RotationAmount};
//!
//! let slot = Pose::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
//! let waypoints = derive_waypoints(&slot, RotationAmount::Turn120, 65.0);
//!
//! assert_eq!(waypoints.approach.y, -65.0);
//! assert_eq!(waypoints.rotated_place.y, 0.0);
//! ```

pub mod conversion;
pub mod pose;
pub mod rotation;
pub mod slot;
pub mod waypoints;

pub use conversion::{euler_zyx_to_quaternion, quaternion_to_euler_zyx};
pub use pose::Pose;
pub use rotation::{RotationAmount, RotationError};
pub use slot::SlotId;
pub use waypoints::{derive_waypoints, Waypoints};
