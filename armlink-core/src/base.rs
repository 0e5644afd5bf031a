//! Port traits implemented by the concrete robot, sensor, target and
//! transport backends.
mod robot;
mod sensor;
mod target;
mod transport;

pub use robot::{RobotPort, RobotState};
pub use sensor::SensorPort;
pub use target::TargetPort;
pub use transport::Transport;
