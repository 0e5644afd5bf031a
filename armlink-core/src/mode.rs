//! Control-mode state machine.
use serde::{Deserialize, Serialize};

/// Control mode of the bridge.
///
/// The mode selects which write primitive the dispatcher uses for
/// Step-driven joint writes. It changes only through a Configure command;
/// the transition is unconditional and therefore idempotent, and the
/// machine has no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Joint targets are applied instantaneously within the tick.
    Training,

    /// Joint targets are approached over subsequent ticks at servo speed.
    Simulation,
}

impl Default for ControlMode {
    fn default() -> Self {
        ControlMode::Training
    }
}

#[cfg(test)]
mod tests {
    use super::ControlMode;

    #[test]
    fn test_initial_mode_is_training() {
        assert_eq!(ControlMode::default(), ControlMode::Training);
    }
}
