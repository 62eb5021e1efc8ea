// src/cli.rs
//
// Command-line flags. Line settings given here override the settings file for
// this run only; a port given here is also remembered for the next run.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::input::QuitMode;
use crate::io::serial::Parity;
use crate::settings::AppSettings;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "framelog",
    version,
    about = "Log a serial byte stream as fixed 4, 5 and 6-byte frames"
)]
pub struct Cli {
    /// Serial port to open (skips the saved port and the chooser)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate [settings default: 16064]
    #[arg(short, long)]
    pub baud: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(5..=8))]
    pub data_bits: Option<u8>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub stop_bits: Option<u8>,

    #[arg(long, value_enum)]
    pub parity: Option<Parity>,

    /// Directory for the <N>Byte.txt frame logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Settings file [default: framelog.json]
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Ignore the saved port and choose again
    #[arg(long)]
    pub select: bool,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// What ESC does: exit on the spot, or stop the stream and close the port first
    #[arg(long, value_enum, default_value_t = QuitMode::Immediate)]
    pub quit_mode: QuitMode,

    /// Pause after a failed read before retrying, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub error_backoff_ms: u64,

    /// Also write diagnostics to a timestamped file in this directory
    #[arg(long)]
    pub diag_dir: Option<PathBuf>,
}

impl Cli {
    /// Settings for this run: the stored settings with any flag overrides applied.
    pub fn merge(&self, stored: &AppSettings) -> AppSettings {
        let mut merged = stored.clone();
        if let Some(port) = &self.port {
            merged.last_port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            merged.baud_rate = baud;
        }
        if let Some(bits) = self.data_bits {
            merged.data_bits = bits;
        }
        if let Some(bits) = self.stop_bits {
            merged.stop_bits = bits;
        }
        if let Some(parity) = self.parity {
            merged.parity = parity;
        }
        if let Some(dir) = &self.log_dir {
            merged.log_dir = dir.to_string_lossy().to_string();
        }
        merged
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}
