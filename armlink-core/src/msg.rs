//! Wire-level message types exchanged with the learning agent.
//!
//! The byte framing of these records is a transport concern; this module
//! only fixes the logical layout. Parsing is permissive by design: every
//! field of [`Command`] has a default, so a record missing fields is
//! interpreted best-effort rather than rejected.
use serde::{Deserialize, Serialize};

/// Number of joint slots a Step command may actuate.
///
/// Only a bounded action vector is ever RL-actuated, regardless of how many
/// physical joints the robot has; the dispatcher clamps longer vectors to
/// this many entries.
pub const MAX_ACTION_SLOTS: usize = 5;

/// Kind of an inbound command.
///
/// The numeric codes are an external contract shared with the agent side
/// and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Per-tick actuation request.
    Step = 0,

    /// Return to home, clear collision state, spawn a new target.
    Reset = 1,

    /// Switch the control mode.
    Configure = 2,
}

impl CommandKind {
    /// Maps a wire code to a command kind. Unknown codes yield `None` and
    /// are treated as a no-op by the dispatcher.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CommandKind::Step),
            1 => Some(CommandKind::Reset),
            2 => Some(CommandKind::Configure),
            _ => None,
        }
    }
}

/// One inbound record, at most one per tick.
///
/// Only the fields relevant to the command kind are meaningful; the others
/// are ignored by the handler.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Command {
    /// Wire code of the command kind, see [`CommandKind`].
    #[serde(default)]
    pub kind: u8,

    /// Joint angle deltas in degrees, one per actuated slot.
    #[serde(default)]
    pub actions: Vec<f32>,

    /// Threshold-discretized sixth-axis orientation; `>= 0.5` means forward.
    #[serde(default)]
    pub axis6_orientation: f32,

    /// Threshold-discretized gripper intent; `> 0.5` means close.
    #[serde(default)]
    pub gripper_close_value: f32,

    /// Requested control mode for Configure commands.
    #[serde(default)]
    pub simulation_mode_enabled: bool,
}

impl Command {
    /// Classifies the command by its wire code.
    pub fn classify(&self) -> Option<CommandKind> {
        CommandKind::from_code(self.kind)
    }
}

/// One outbound record per handled Step or Reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Joint angles in degrees, one entry per physical joint.
    pub joint_angles: Vec<f32>,

    /// Tool-center-point position in meters.
    pub tcp_position: [f32; 3],

    /// Unit vector from the tool center point to the target, zero when no
    /// target exists.
    pub direction_to_target: [f32; 3],

    /// Distance to the target in meters, zero when no target exists.
    pub distance_to_target: f32,

    /// Gripper open fraction in `[0, 1]`.
    pub gripper_state: f32,

    /// Whether the gripper is holding an object.
    pub is_gripping: bool,

    /// Whether the laser sensor detects an object.
    pub laser_hit: bool,

    /// Laser sensor distance in meters.
    pub laser_distance: f32,

    /// Whether an environment collision has been latched since the last
    /// reset.
    pub collision_detected: bool,

    /// `[1, 0]` for a vertical target, `[0, 1]` otherwise.
    pub target_orientation_one_hot: [f32; 2],

    /// Whether this observation follows a Reset command.
    pub is_reset_frame: bool,

    /// `(min, max)` joint limits in degrees. Present only on reset frames;
    /// absent — not empty — on step frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_angle_limits: Option<Vec<(f32, f32)>>,
}

/// Minimal acknowledgement sent in response to a Configure command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// Fixed success status.
    pub status: String,
}

impl ConfigResponse {
    /// The fixed success payload.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
