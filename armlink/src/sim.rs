//! Kinematic simulation backend implementing the core ports.
mod robot;
mod sensor;
mod target;

pub use robot::{SimRobot, SimRobotConfig};
pub use sensor::SimLaser;
pub use target::{RandomTarget, SimTargetConfig};
