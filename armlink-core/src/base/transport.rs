//! Transport port.
use crate::{Command, Observation};
use anyhow::Result;

/// Abstraction over the byte transport towards the learning agent.
///
/// The underlying implementation typically runs an I/O thread that
/// accumulates frames concurrently; completed commands are handed to the
/// dispatcher only through [`try_recv`](Transport::try_recv) at tick
/// boundaries. Sends may be buffered asynchronously — the dispatcher never
/// blocks on them.
pub trait Transport {
    /// Takes at most one pending command without blocking.
    fn try_recv(&mut self) -> Option<Command>;

    /// Queues one observation for sending.
    fn send_observation(&mut self, obs: &Observation) -> Result<()>;

    /// Queues one raw (already serialized) response for sending.
    fn send_response(&mut self, response: &str) -> Result<()>;

    /// Closes the transport. No commands are delivered afterwards.
    fn shutdown(&mut self);
}
