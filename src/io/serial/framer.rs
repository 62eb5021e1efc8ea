// src/io/serial/framer.rs
//
// Fixed-length positional framing. Every Nth byte of the stream closes a
// frame of length N; there is no marker search and no realignment.

use std::fmt;
use std::num::NonZeroUsize;

// =============================================================================
// Types
// =============================================================================

/// A complete frame extracted from the serial stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase two-digit hex tokens joined by single spaces, e.g. `"0a ff 01"`.
    pub fn to_hex_tokens(&self) -> String {
        hex_tokens(&self.bytes)
    }
}

impl From<Vec<u8>> for Frame {
    fn from(bytes: Vec<u8>) -> Self {
        Frame { bytes }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_tokens())
    }
}

/// Format raw bytes as space-separated lowercase hex tokens
pub fn hex_tokens(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Frame Accumulator
// =============================================================================

/// Stateful fixed-width framer.
///
/// Invariant: `buffer.len() < frame_len` between calls. The buffer is emptied
/// the moment it reaches `frame_len`; excess bytes are never carried over.
#[derive(Debug, Clone)]
pub struct FrameAccumulator {
    frame_len: NonZeroUsize,
    buffer: Vec<u8>,
}

impl FrameAccumulator {
    pub fn new(frame_len: NonZeroUsize) -> Self {
        FrameAccumulator {
            frame_len,
            buffer: Vec::with_capacity(frame_len.get()),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len.get()
    }

    /// Append one byte. Returns the completed frame when this byte fills it.
    pub fn offer(&mut self, byte: u8) -> Option<Frame> {
        self.buffer.push(byte);
        if self.buffer.len() == self.frame_len.get() {
            let bytes = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.frame_len.get()));
            Some(Frame { bytes })
        } else {
            None
        }
    }

    /// Bytes received since the last completed frame.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}
