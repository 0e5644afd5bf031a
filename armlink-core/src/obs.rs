//! Observation assembly.
use crate::{CollisionTracker, Observation, RobotPort, SensorPort, TargetPort};

/// Builds the outbound observation from the current snapshot of all ports.
///
/// Pure read of the port state; never mutates. Target absence is
/// null-guarded: without a target the direction is zero and the distance is
/// `0.0`, never NaN. `joint_angle_limits` is populated only on reset frames
/// to keep step frames small.
pub fn build_observation<R, S, T>(
    robot: &R,
    sensor: &S,
    target: &T,
    collisions: &CollisionTracker,
    is_reset_frame: bool,
) -> Observation
where
    R: RobotPort,
    S: SensorPort,
    T: TargetPort,
{
    let state = robot.state();
    let (direction_to_target, distance_to_target) =
        direction_and_distance(state.tcp_position, target.position());

    let target_orientation_one_hot = if target.is_vertical() {
        [1.0, 0.0]
    } else {
        [0.0, 1.0]
    };

    Observation {
        joint_angles: state.joint_angles,
        tcp_position: state.tcp_position,
        direction_to_target,
        distance_to_target,
        gripper_state: state.gripper_state,
        is_gripping: state.is_gripping,
        laser_hit: sensor.hit(),
        laser_distance: sensor.distance(),
        collision_detected: collisions.detected(),
        target_orientation_one_hot,
        is_reset_frame,
        joint_angle_limits: if is_reset_frame {
            Some(robot.joint_limits())
        } else {
            None
        },
    }
}

fn direction_and_distance(tcp: [f32; 3], target: Option<[f32; 3]>) -> ([f32; 3], f32) {
    let target = match target {
        Some(p) => p,
        None => return ([0.0; 3], 0.0),
    };

    let delta = [target[0] - tcp[0], target[1] - tcp[1], target[2] - tcp[2]];
    let distance = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
    if distance > 0.0 {
        (
            [delta[0] / distance, delta[1] / distance, delta[2] / distance],
            distance,
        )
    } else {
        ([0.0; 3], 0.0)
    }
}
