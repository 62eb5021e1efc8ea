// src/io/serial/mod.rs
//
// Serial port driver with fixed-length positional framing.
//
// Features:
// - Single-byte blocking reads behind the ByteSource trait
// - Fixed-width frame accumulation (one accumulator per frame length)
// - Port enumeration for interactive selection

pub mod framer;
pub mod reader;
pub(crate) mod utils;

pub use framer::{Frame, FrameAccumulator};
pub use reader::{list_serial_ports, SerialByteSource, SerialConfig, SerialPortInfo};
pub use utils::Parity;
