//! Robot actuation port.
use crate::ControlMode;

/// Snapshot of the robot state consumed by the observation assembler.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotState {
    /// Current joint angles in degrees, one entry per physical joint.
    pub joint_angles: Vec<f32>,

    /// Tool-center-point position in meters.
    pub tcp_position: [f32; 3],

    /// Gripper open fraction in `[0, 1]`, `1.0` meaning fully open.
    pub gripper_state: f32,

    /// Whether the gripper is currently holding an object.
    pub is_gripping: bool,
}

/// Capability exposed by the robot subsystem.
///
/// There is exactly one production implementation (the simulation backend)
/// and test doubles in the dispatcher tests; the [`Session`](crate::Session)
/// only ever talks to this trait.
pub trait RobotPort {
    /// Returns the current joint angles in degrees.
    fn joint_angles(&self) -> Vec<f32>;

    /// Returns the `(min, max)` angle limit of each joint in degrees.
    fn joint_limits(&self) -> Vec<(f32, f32)>;

    /// Writes joint targets and applies them within the current tick.
    fn set_joints_instantaneous(&mut self, angles: &[f32]);

    /// Writes joint targets to be approached over subsequent ticks.
    fn set_joints_interpolated(&mut self, angles: &[f32]);

    /// Sets the discrete orientation of the sixth axis.
    fn set_axis6_orientation(&mut self, forward: bool);

    /// Closes (`true`) or opens (`false`) the gripper.
    fn set_gripper_closed(&mut self, close: bool);

    /// Returns the robot to its home configuration.
    fn reset_home(&mut self);

    /// Propagates the control mode so interpolation state stays consistent.
    fn set_control_mode(&mut self, mode: ControlMode);

    /// Advances per-tick internal state (drive interpolation and the like).
    fn tick(&mut self);

    /// Takes a snapshot of the current state.
    fn state(&self) -> RobotState;
}
