#[macro_use]
mod logging;

pub mod cli;
pub mod consumer;
pub mod control;
pub mod display;
pub mod error;
pub mod frame_log;
pub mod input;
pub mod io;
pub mod port_select;
pub mod settings;
pub mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::consumer::{ConsumerOptions, FrameChannel, StreamConsumer, PAUSE_POLL_INTERVAL};
use crate::control::{PauseController, StopSignal};
use crate::display::Display;
use crate::error::TransportError;
use crate::frame_log::FrameSink;
use crate::input::InputListener;
use crate::io::serial::{list_serial_ports, SerialByteSource, SerialConfig};
use crate::settings::AppSettings;
use crate::terminal::RawModeGuard;

pub use error::{Error, Result};

/// Entry point for the `framelog` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = &cli.diag_dir {
        if let Err(e) = logging::init_file_logging(dir) {
            tlog!("[framelog] {}", e);
        }
    }

    let code = match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            terminal::restore();
            tlog!("[framelog] Fatal: {}", e);
            ExitCode::FAILURE
        }
    };

    logging::stop_file_logging();
    code
}

fn execute(cli: &Cli) -> Result<()> {
    if cli.list_ports {
        let ports = list_serial_ports().map_err(Error::PortScan)?;
        if ports.is_empty() {
            return Err(Error::NoPorts);
        }
        return port_select::print_ports(&ports, &mut std::io::stdout()).map_err(Error::Prompt);
    }

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(settings::default_settings_path);
    let mut stored = settings::load_settings(&settings_path).map_err(Error::Settings)?;
    let session = cli.merge(&stored);
    let frame_lengths = session
        .validated_frame_lengths()
        .map_err(Error::Settings)?;

    let Some(port) = resolve_port(cli, &stored)? else {
        tlog!("[framelog] No port selected");
        return Ok(());
    };
    if stored.last_port.as_deref() != Some(port.as_str()) {
        stored.last_port = Some(port.clone());
        settings::save_settings(&settings_path, &stored).map_err(Error::Settings)?;
    }

    let log_dir = PathBuf::from(&session.log_dir);
    let lens: Vec<usize> = frame_lengths.iter().map(|n| n.get()).collect();
    frame_log::ensure_log_files(&log_dir, &lens)?;

    let serial = serial_config(&session, port);
    let source = match SerialByteSource::open(&serial) {
        Ok(source) => source,
        Err(e @ TransportError::Open { .. }) => {
            println!(
                "Port '{}' not found. Please check your connections and select a valid port.",
                serial.port
            );
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut channels = Vec::with_capacity(frame_lengths.len());
    for len in frame_lengths {
        let sink = FrameSink::open(frame_log::log_path(&log_dir, len.get()))?;
        tlog!("[framelog] Logging {}-byte frames to {}", len, sink.path().display());
        channels.push(FrameChannel::new(len, sink));
    }

    let pause = PauseController::new();
    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.request())?;
    }

    println!("Press Ctrl+C or Spacebar to pause logging. Press ESC to quit.");

    let raw_mode = match RawModeGuard::enable() {
        Ok(guard) => Some(guard),
        Err(e) => {
            tlog!("[framelog] Keyboard control unavailable: {}", e);
            None
        }
    };
    if raw_mode.is_some() {
        let listener = InputListener::new(pause.clone(), stop.clone(), cli.quit_mode, std::io::stdout());
        std::thread::spawn(move || listener.run());
    }

    let display = Display::new(std::io::stdout()).raw_mode(raw_mode.is_some());
    let consumer = StreamConsumer::new(source, channels, display, pause, stop.clone())
        .with_options(ConsumerOptions {
            error_backoff: cli.error_backoff(),
            pause_poll: PAUSE_POLL_INTERVAL,
        });

    let result = consumer.run();
    // Lets the listener thread notice and leave its poll loop
    stop.request();
    drop(raw_mode);
    let stats = result?;

    println!("Exiting gracefully...");
    tlog!(
        "[framelog] Read {} bytes ({} read errors), frames logged: {}",
        stats.bytes_read,
        stats.read_errors,
        stats
            .frames_logged
            .iter()
            .map(|(len, count)| format!("{}-byte: {}", len, count))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

/// Port to open: the `--port` flag, else the saved port, else ask.
fn resolve_port(cli: &Cli, stored: &AppSettings) -> Result<Option<String>> {
    if let Some(port) = &cli.port {
        return Ok(Some(port.clone()));
    }
    if !cli.select {
        if let Some(port) = &stored.last_port {
            println!("Last used port: {}", port);
            return Ok(Some(port.clone()));
        }
    }

    let ports = list_serial_ports().map_err(Error::PortScan)?;
    if ports.is_empty() {
        return Err(Error::NoPorts);
    }
    let stdin = std::io::stdin();
    port_select::select_port(&ports, stdin.lock(), std::io::stdout()).map_err(Error::Prompt)
}

fn serial_config(session: &AppSettings, port: String) -> SerialConfig {
    SerialConfig {
        port,
        baud_rate: session.baud_rate,
        data_bits: session.data_bits,
        stop_bits: session.stop_bits,
        parity: session.parity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_port_prefers_flag_then_saved() {
        let stored = AppSettings {
            last_port: Some("COM9".to_string()),
            ..AppSettings::default()
        };

        let cli = Cli::try_parse_from(["framelog", "--port", "COM2"]).unwrap();
        assert_eq!(resolve_port(&cli, &stored).unwrap().as_deref(), Some("COM2"));

        let cli = Cli::try_parse_from(["framelog"]).unwrap();
        assert_eq!(resolve_port(&cli, &stored).unwrap().as_deref(), Some("COM9"));
    }

    #[test]
    fn test_serial_config_from_session() {
        let session = AppSettings {
            baud_rate: 115200,
            stop_bits: 2,
            ..AppSettings::default()
        };
        let config = serial_config(&session, "/dev/ttyUSB0".to_string());
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.stop_bits, 2);
        assert_eq!(config.describe_line(), "115200 baud (8-N-2)");
    }
}
