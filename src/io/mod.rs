// src/io/mod.rs
//
// Byte transport abstraction and the serial implementation behind it.

pub mod serial;

use crate::error::TransportError;

/// A transport that yields one byte per blocking read.
///
/// `Ok(None)` means no data was ready (timeout or zero-length read); the
/// caller simply tries again. An `Err` is a transport failure that the
/// caller may treat as transient.
pub trait ByteSource {
    fn read_one_byte(&mut self) -> Result<Option<u8>, TransportError>;

    /// Release the underlying transport. Reads after close return
    /// `TransportError::Closed`.
    fn close(&mut self) {}

    /// Human-readable name used in log lines.
    fn name(&self) -> &str {
        "source"
    }
}
