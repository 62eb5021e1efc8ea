// src/frame_log.rs
//
// Append-only per-width frame logs (`4Byte.txt`, `5Byte.txt`, ...).
// One line per completed frame, lowercase hex tokens separated by spaces.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::serial::Frame;

/// Log file name for a frame width
pub fn log_file_name(frame_len: usize) -> String {
    format!("{}Byte.txt", frame_len)
}

pub fn log_path(dir: &Path, frame_len: usize) -> PathBuf {
    dir.join(log_file_name(frame_len))
}

/// Create any missing frame logs. Existing logs are left untouched.
/// Returns the paths that were created.
pub fn ensure_log_files(dir: &Path, frame_lens: &[usize]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| Error::LogWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut created = Vec::new();
    for &len in frame_lens {
        let path = log_path(dir, len);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                tlog!("[frame_log] Created {}", path.display());
                created.push(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(source) => return Err(Error::LogWrite { path, source }),
        }
    }
    Ok(created)
}

/// Sink for completed frames of one width.
///
/// Writes go straight to the file descriptor (no user-space buffer) so every
/// recorded line is in the file even if the process is killed right after.
pub struct FrameSink {
    path: PathBuf,
    file: File,
}

impl FrameSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::LogWrite {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    #[cfg(test)]
    pub(crate) fn from_file_for_test(path: PathBuf, file: File) -> Self {
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, frame: &Frame) -> Result<()> {
        let line = format!("{}\n", frame.to_hex_tokens());
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|source| Error::LogWrite {
                path: self.path.clone(),
                source,
            })
    }
}
