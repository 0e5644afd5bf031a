#![warn(missing_docs)]
//! Runnable training bridge for a simulated robot manipulator.
//!
//! Combines the dispatcher core with the TCP transport and a kinematic
//! simulation backend. The backend stands in for an articulation-body
//! physics engine: it honors the same actuation contract (clamped joint
//! writes, interpolated drives, home reset) without solving any dynamics.
pub mod sim;
