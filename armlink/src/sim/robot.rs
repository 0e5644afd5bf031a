//! Kinematic robot backend.
use anyhow::Result;
use armlink_core::{ControlMode, RobotPort, RobotState};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Link lengths of the fixed kinematic chain in meters: base column plus
/// three arm segments feeding the position approximation.
const BASE_HEIGHT: f32 = 0.2;
const LINK_LENGTHS: [f32; 3] = [0.4, 0.35, 0.25];

/// Gripper open fraction below which the robot counts as gripping.
const GRIPPING_THRESHOLD: f32 = 0.3;

/// Configuration of [`SimRobot`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimRobotConfig {
    /// Symmetric joint limit per joint in degrees; joint `i` moves within
    /// `[-limit[i], limit[i]]`.
    pub joint_limits: Vec<f32>,

    /// Maximum servo speed in degrees per second, bounds interpolated
    /// drives.
    pub max_servo_speed: f32,

    /// Gripper position when fully open, in meters.
    pub gripper_open_position: f32,

    /// Gripper position when fully closed, in meters.
    pub gripper_closed_position: f32,

    /// Gripper travel speed in meters per second.
    pub gripper_speed: f32,

    /// Fixed time step in seconds, one tick of simulated time.
    pub time_step: f32,
}

impl Default for SimRobotConfig {
    fn default() -> Self {
        Self {
            joint_limits: vec![90.0, 90.0, 90.0, 180.0, 90.0, 90.0],
            max_servo_speed: 90.0,
            gripper_open_position: 0.05,
            gripper_closed_position: 0.0,
            gripper_speed: 0.1,
            time_step: 0.02,
        }
    }
}

impl SimRobotConfig {
    /// Sets the symmetric joint limits in degrees.
    pub fn joint_limits(mut self, v: Vec<f32>) -> Self {
        self.joint_limits = v;
        self
    }

    /// Sets the maximum servo speed in degrees per second.
    pub fn max_servo_speed(mut self, v: f32) -> Self {
        self.max_servo_speed = v;
        self
    }

    /// Sets the fixed time step in seconds.
    pub fn time_step(mut self, v: f32) -> Self {
        self.time_step = v;
        self
    }

    /// Constructs [`SimRobotConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimRobotConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Physics-free reference implementation of [`RobotPort`].
///
/// Joint writes follow the articulation contract of the original backend:
/// instantaneous writes clamp and apply within the tick, interpolated
/// writes only move the drive targets, and [`tick`](RobotPort::tick) walks
/// the joints toward those targets at servo speed while in Simulation mode.
pub struct SimRobot {
    config: SimRobotConfig,
    angles: Vec<f32>,
    drive_targets: Vec<f32>,
    mode: ControlMode,
    gripper_position: f32,
    gripper_target: f32,
}

impl SimRobot {
    /// Builds a robot at its home configuration.
    pub fn build(config: SimRobotConfig) -> Self {
        let num_joints = config.joint_limits.len();
        let gripper_open = config.gripper_open_position;
        Self {
            config,
            angles: vec![0.0; num_joints],
            drive_targets: vec![0.0; num_joints],
            mode: ControlMode::default(),
            gripper_position: gripper_open,
            gripper_target: gripper_open,
        }
    }

    fn clamp(&self, joint: usize, angle: f32) -> f32 {
        match self.config.joint_limits.get(joint) {
            Some(limit) => angle.max(-limit).min(*limit),
            None => angle,
        }
    }

    /// Open fraction of the gripper in `[0, 1]`.
    fn gripper_open_fraction(&self) -> f32 {
        let open = self.config.gripper_open_position;
        if open <= 0.0 {
            return 0.0;
        }
        (self.gripper_position / open).max(0.0).min(1.0)
    }

    /// Tool-center-point position from a fixed-chain approximation: the
    /// first joint yaws the arm around the vertical axis, the next three
    /// pitch the links within the resulting plane. Wrist joints do not
    /// displace the TCP.
    fn tcp_position(&self) -> [f32; 3] {
        let a = |i: usize| self.angles.get(i).copied().unwrap_or(0.0).to_radians();
        let yaw = a(0);
        let pitch1 = a(1);
        let pitch2 = pitch1 + a(2);
        let pitch3 = pitch2 + a(3);

        let reach = LINK_LENGTHS[0] * pitch1.sin()
            + LINK_LENGTHS[1] * pitch2.sin()
            + LINK_LENGTHS[2] * pitch3.sin();
        let height = BASE_HEIGHT
            + LINK_LENGTHS[0] * pitch1.cos()
            + LINK_LENGTHS[1] * pitch2.cos()
            + LINK_LENGTHS[2] * pitch3.cos();

        [reach * yaw.cos(), height, reach * yaw.sin()]
    }
}

/// Steps `current` toward `target` by at most `max_delta`.
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta * delta.signum()
    }
}

impl RobotPort for SimRobot {
    fn joint_angles(&self) -> Vec<f32> {
        self.angles.clone()
    }

    fn joint_limits(&self) -> Vec<(f32, f32)> {
        self.config
            .joint_limits
            .iter()
            .map(|&l| (-l, l))
            .collect()
    }

    fn set_joints_instantaneous(&mut self, angles: &[f32]) {
        for (i, angle) in angles.iter().enumerate().take(self.angles.len()) {
            let clamped = self.clamp(i, *angle);
            self.angles[i] = clamped;
            self.drive_targets[i] = clamped;
        }
    }

    fn set_joints_interpolated(&mut self, angles: &[f32]) {
        for (i, angle) in angles.iter().enumerate().take(self.drive_targets.len()) {
            self.drive_targets[i] = self.clamp(i, *angle);
        }
    }

    fn set_axis6_orientation(&mut self, forward: bool) {
        let axis = 5;
        if axis >= self.angles.len() {
            return;
        }

        let target = if forward { 90.0 } else { 0.0 };
        self.drive_targets[axis] = self.clamp(axis, target);
        if self.mode == ControlMode::Training {
            self.angles[axis] = self.drive_targets[axis];
        }
    }

    fn set_gripper_closed(&mut self, close: bool) {
        self.gripper_target = if close {
            self.config.gripper_closed_position
        } else {
            self.config.gripper_open_position
        };
    }

    fn reset_home(&mut self) {
        for angle in self.angles.iter_mut() {
            *angle = 0.0;
        }
        for target in self.drive_targets.iter_mut() {
            *target = 0.0;
        }
        self.gripper_position = self.config.gripper_open_position;
        self.gripper_target = self.config.gripper_open_position;
    }

    fn set_control_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    fn tick(&mut self) {
        let dt = self.config.time_step;

        if self.mode == ControlMode::Simulation {
            let max_delta = self.config.max_servo_speed * dt;
            for (angle, target) in self.angles.iter_mut().zip(self.drive_targets.iter()) {
                *angle = move_towards(*angle, *target, max_delta);
            }
        }

        self.gripper_position = move_towards(
            self.gripper_position,
            self.gripper_target,
            self.config.gripper_speed * dt,
        );
    }

    fn state(&self) -> RobotState {
        let fraction = self.gripper_open_fraction();
        RobotState {
            joint_angles: self.angles.clone(),
            tcp_position: self.tcp_position(),
            gripper_state: fraction,
            is_gripping: fraction < GRIPPING_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{move_towards, SimRobot, SimRobotConfig};
    use armlink_core::{ControlMode, RobotPort};
    use tempdir::TempDir;

    #[test]
    fn test_move_towards_is_bounded() {
        assert_eq!(move_towards(0.0, 10.0, 1.8), 1.8);
        assert_eq!(move_towards(0.0, -10.0, 1.8), -1.8);
        assert_eq!(move_towards(0.0, 1.0, 1.8), 1.0);
        assert_eq!(move_towards(5.0, 5.0, 1.8), 5.0);
    }

    #[test]
    fn test_instantaneous_write_clamps_to_limits() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_joints_instantaneous(&[120.0, -120.0, 45.0, 200.0, 0.0, 0.0]);
        assert_eq!(robot.joint_angles(), vec![90.0, -90.0, 45.0, 180.0, 0.0, 0.0]);
    }

    #[test]
    fn test_interpolated_write_does_not_move_joints() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_joints_interpolated(&[10.0; 6]);
        assert_eq!(robot.joint_angles(), vec![0.0; 6]);
    }

    #[test]
    fn test_tick_interpolates_at_servo_speed_in_simulation_mode() {
        // 90 deg/s at 0.02 s per tick moves 1.8 deg per tick.
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_control_mode(ControlMode::Simulation);
        robot.set_joints_interpolated(&[10.0, -10.0, 0.0, 0.0, 0.0, 0.0]);

        robot.tick();
        let angles = robot.joint_angles();
        assert!((angles[0] - 1.8).abs() < 1e-5);
        assert!((angles[1] + 1.8).abs() < 1e-5);

        // Training mode leaves drive targets untouched by the tick.
        robot.set_control_mode(ControlMode::Training);
        robot.tick();
        let frozen = robot.joint_angles();
        assert_eq!(frozen[0], angles[0]);
    }

    #[test]
    fn test_axis6_snaps_in_training_and_drives_in_simulation() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_axis6_orientation(true);
        assert_eq!(robot.joint_angles()[5], 90.0);

        robot.reset_home();
        robot.set_control_mode(ControlMode::Simulation);
        robot.set_axis6_orientation(true);
        assert_eq!(robot.joint_angles()[5], 0.0);
        robot.tick();
        assert!(robot.joint_angles()[5] > 0.0);
    }

    #[test]
    fn test_reset_home_restores_everything() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_joints_instantaneous(&[30.0; 6]);
        robot.set_gripper_closed(true);
        for _ in 0..100 {
            robot.tick();
        }
        assert!(robot.state().is_gripping);

        robot.reset_home();
        assert_eq!(robot.joint_angles(), vec![0.0; 6]);
        let state = robot.state();
        assert_eq!(state.gripper_state, 1.0);
        assert!(!state.is_gripping);
    }

    #[test]
    fn test_gripper_closes_over_time() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        assert_eq!(robot.state().gripper_state, 1.0);

        robot.set_gripper_closed(true);
        robot.tick();
        let partway = robot.state().gripper_state;
        assert!(partway < 1.0 && partway > 0.0);

        for _ in 0..100 {
            robot.tick();
        }
        assert_eq!(robot.state().gripper_state, 0.0);
        assert!(robot.state().is_gripping);
    }

    #[test]
    fn test_yaw_rotates_tcp_around_vertical_axis() {
        let mut robot = SimRobot::build(SimRobotConfig::default());
        robot.set_joints_instantaneous(&[0.0, 45.0, 0.0, 0.0, 0.0, 0.0]);
        let front = robot.state().tcp_position;
        assert!(front[0] > 0.0);
        assert!(front[2].abs() < 1e-5);

        robot.set_joints_instantaneous(&[90.0, 45.0, 0.0, 0.0, 0.0, 0.0]);
        let side = robot.state().tcp_position;
        assert!(side[2] > 0.0);
        assert!(side[0].abs() < 1e-4);
        // Height is unaffected by yaw.
        assert!((front[1] - side[1]).abs() < 1e-5);
    }

    #[test]
    fn test_joint_limits_are_symmetric() {
        let robot = SimRobot::build(SimRobotConfig::default());
        let limits = robot.joint_limits();
        assert_eq!(limits.len(), 6);
        assert_eq!(limits[3], (-180.0, 180.0));
        assert!(limits.iter().all(|(lo, hi)| *lo == -*hi));
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let dir = TempDir::new("armlink_sim").unwrap();
        let path = dir.path().join("robot.yaml");

        let config = SimRobotConfig::default()
            .max_servo_speed(45.0)
            .time_step(0.01);
        config.save(&path).unwrap();
        assert_eq!(SimRobotConfig::load(&path).unwrap(), config);
    }
}
