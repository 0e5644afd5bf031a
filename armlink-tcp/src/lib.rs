#![warn(missing_docs)]
//! TCP transport for the armlink training bridge.
//!
//! A single background I/O thread accepts one agent connection at a time,
//! reads length-prefixed JSON command frames and hands decoded commands to
//! the dispatcher through a single-producer/single-consumer channel drained
//! at tick boundaries. Outbound observations and responses are queued by the
//! dispatcher and written as frames by the same thread, so the simulation
//! side never blocks on the socket.
mod codec;
pub use codec::{encode_frame, FrameDecoder, FrameError};

mod config;
pub use config::TcpTransportConfig;

mod transport;
pub use transport::TcpTransport;
