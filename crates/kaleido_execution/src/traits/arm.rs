//! ArmMotion trait for the robot arm driver.

use kaleido_robotics::Pose;

use super::DeviceError;

/// Trait for the arm that carries the gripper.
///
/// Every move blocks until the controller confirms the arm has arrived.
/// Trajectory planning and collision checks belong to the implementation.
///
/// # Example
///
/// ```rust,ignore
/// impl ArmMotion for LbrDriver {
///     fn move_linear(&mut self, target: &Pose) -> Result<(), DeviceError> {
///         let frame = to_controller_frame(target);
///         self.session
///             .lin(frame)
///             .map_err(|e| DeviceError::MotionFault(e.to_string()))
///     }
///     // ...
/// }
/// ```
pub trait ArmMotion {
    /// Unique identifier for this device type.
    fn device_type(&self) -> &str;

    /// Mount the named tool on the flange so targets refer to its TCP.
    fn attach_tool(&mut self, tool: &str) -> Result<(), DeviceError>;

    /// Scale all motion speeds by `factor` (0, 1].
    fn set_velocity_override(&mut self, factor: f64) -> Result<(), DeviceError>;

    /// Point-to-point move (joint interpolated). Used for coarse approach.
    fn move_coarse(&mut self, target: &Pose) -> Result<(), DeviceError>;

    /// Straight-line Cartesian move. Used near the grid.
    fn move_linear(&mut self, target: &Pose) -> Result<(), DeviceError>;

    /// Get the last commanded position of the tool (if known).
    fn current_pose(&self) -> Option<Pose> {
        None
    }
}
