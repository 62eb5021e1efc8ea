//! Error types for framelog.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the byte transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Device not found or cannot be opened.
    #[error("Failed to open {port}: {reason}")]
    Open { port: String, reason: String },

    /// Mid-stream I/O failure. Non-fatal for the read loop.
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// Read attempted after the source was closed.
    #[error("Transport closed")]
    Closed,
}

/// Main error type for all framelog operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame log could not be opened or appended to.
    #[error("Failed to write frame log {}: {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the live display line to the terminal failed.
    #[error("Display write failed: {0}")]
    Display(#[source] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    PortScan(String),

    #[error("No serial ports found. Please make sure your device is connected.")]
    NoPorts,

    /// Reading the port choice from stdin (or writing the menu) failed.
    #[error("Port selection failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}

/// Result type alias using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;
