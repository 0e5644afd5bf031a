#![warn(missing_docs)]
//! Core of the armlink training bridge.
//!
//! This crate owns the authoritative per-tick cycle of the bridge: it
//! interprets commands arriving from an external learning agent, translates
//! them into actuation requests against abstract robot/sensor/target ports,
//! and assembles the observation sent back after each physics step.
//!
//! The crate is deliberately free of I/O and threads. Everything concrete,
//! such as the TCP server or the physics backend, lives behind the port
//! traits ([`RobotPort`], [`SensorPort`], [`TargetPort`], [`Transport`])
//! and is injected into the [`Session`] at construction, so any host (a
//! game engine, a standalone loop, a test harness) only needs to call
//! [`Session::on_tick`] once per fixed interval.
pub mod error;

mod base;
pub use base::{RobotPort, RobotState, SensorPort, TargetPort, Transport};

mod msg;
pub use msg::{Command, CommandKind, ConfigResponse, Observation, MAX_ACTION_SLOTS};

mod mode;
pub use mode::ControlMode;

mod collision;
pub use collision::{CollisionKind, CollisionTracker, SubscriberId};

mod obs;
pub use obs::build_observation;

mod session;
pub use session::Session;
