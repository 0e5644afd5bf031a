//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum ArmlinkError {
    /// No agent is connected to the transport.
    #[error("No client connected to the transport")]
    NotConnected,

    /// The transport has been shut down or its I/O thread is gone.
    #[error("Transport closed")]
    TransportClosed,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
