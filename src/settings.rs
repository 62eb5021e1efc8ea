use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::io::serial::reader::{DEFAULT_BAUD_RATE, DEFAULT_DATA_BITS};
use crate::io::serial::Parity;

pub const DEFAULT_SETTINGS_FILE: &str = "framelog.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    /// Port used on the previous run; reused without prompting
    #[serde(default)]
    pub last_port: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default)]
    pub parity: Parity,
    /// Directory holding the `<N>Byte.txt` logs
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_frame_lengths")]
    pub frame_lengths: Vec<usize>,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}
fn default_data_bits() -> u8 {
    DEFAULT_DATA_BITS
}
fn default_stop_bits() -> u8 {
    1
}
fn default_log_dir() -> String {
    ".".to_string()
}
fn default_frame_lengths() -> Vec<usize> {
    vec![4, 5, 6]
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_port: None,
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            stop_bits: default_stop_bits(),
            parity: Parity::default(),
            log_dir: default_log_dir(),
            frame_lengths: default_frame_lengths(),
        }
    }
}

impl AppSettings {
    /// Frame lengths must be non-zero and distinct (each one owns a log file).
    pub fn validated_frame_lengths(&self) -> Result<Vec<NonZeroUsize>, String> {
        if self.frame_lengths.is_empty() {
            return Err("At least one frame length is required".to_string());
        }
        let mut lengths = Vec::with_capacity(self.frame_lengths.len());
        for &len in &self.frame_lengths {
            let len = NonZeroUsize::new(len).ok_or("Frame length must be at least 1")?;
            if lengths.contains(&len) {
                return Err(format!("Frame length {} is listed twice", len));
            }
            lengths.push(len);
        }
        Ok(lengths)
    }
}

pub fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILE)
}

pub fn load_settings(path: &Path) -> Result<AppSettings, String> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse settings: {}", e))
    } else {
        Ok(AppSettings::default())
    }
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings dir: {}", e))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    std::fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.json")).unwrap();

        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.baud_rate, 16064);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.frame_lengths, vec![4, 5, 6]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("framelog.json");
        let settings = AppSettings {
            last_port: Some("COM7".to_string()),
            parity: Parity::Even,
            ..AppSettings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framelog.json");
        std::fs::write(&path, r#"{ "last_port": "/dev/ttyUSB1" }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.last_port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(settings.baud_rate, 16064);
        assert_eq!(settings.log_dir, ".");
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framelog.json");
        std::fs::write(&path, "COM3").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"));
    }

    #[test]
    fn test_validate_frame_lengths() {
        let lengths = AppSettings::default().validated_frame_lengths().unwrap();
        assert_eq!(lengths.iter().map(|n| n.get()).collect::<Vec<_>>(), vec![4, 5, 6]);

        let zero = AppSettings {
            frame_lengths: vec![4, 0],
            ..AppSettings::default()
        };
        assert!(zero.validated_frame_lengths().is_err());

        let dup = AppSettings {
            frame_lengths: vec![4, 5, 4],
            ..AppSettings::default()
        };
        assert_eq!(dup.validated_frame_lengths().unwrap_err(), "Frame length 4 is listed twice");

        let empty = AppSettings {
            frame_lengths: vec![],
            ..AppSettings::default()
        };
        assert!(empty.validated_frame_lengths().is_err());
    }
}
