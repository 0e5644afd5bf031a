//! Length-prefixed framing.
//!
//! Each frame is a 4-byte big-endian length followed by that many payload
//! bytes. The decoder is incremental: bytes arrive in arbitrary chunks from
//! a non-blocking socket and complete frames are popped as they become
//! available.
use std::convert::TryInto;

/// Hard cap on a single frame, guards against garbage length prefixes.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Encodes one payload as a length-prefixed frame.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Incremental decoder for length-prefixed frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes received from the socket.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pops the next complete frame payload, if one is buffered.
    ///
    /// Returns `Err` when the buffered length prefix exceeds the frame cap;
    /// the caller should drop the connection, the stream can no longer be
    /// trusted.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        if self.buf.len() < 4 {
            return Ok(None);
        }

        let len = u32::from_be_bytes(self.buf[..4].try_into().unwrap()) as usize;
        if len > MAX_FRAME_LEN {
            return Err(FrameError::Oversized(len));
        }
        if self.buf.len() < 4 + len {
            return Ok(None);
        }

        let payload = self.buf[4..4 + len].to_vec();
        self.buf.drain(..4 + len);
        Ok(Some(payload))
    }

    /// Discards any partially received data, e.g. after a disconnect.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Framing failure that invalidates the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The length prefix exceeds the frame cap.
    Oversized(usize),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Oversized(len) => write!(f, "frame length {} exceeds cap", len),
        }
    }
}

impl std::error::Error for FrameError {}
