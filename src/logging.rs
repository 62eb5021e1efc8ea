use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global diagnostics file handle. When `Some`, `tlog!` writes to both stderr and this file.
pub(crate) static LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// Initialise diagnostics logging to the given directory.
/// Creates a timestamped log file and a `framelog.log` symlink (Unix only).
pub(crate) fn init_file_logging(diag_dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(diag_dir)
        .map_err(|e| format!("Failed to create diagnostics dir: {}", e))?;

    let filename = chrono::Local::now()
        .format("%Y%m%d-%H%M%S-framelog.log")
        .to_string();
    let log_path = diag_dir.join(&filename);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Failed to create diagnostics file: {}", e))?;

    // Point framelog.log at the newest file (Unix only — Windows symlinks require elevated privileges)
    #[cfg(unix)]
    {
        let symlink_path = diag_dir.join("framelog.log");
        let _ = std::fs::remove_file(&symlink_path);
        if let Err(e) = std::os::unix::fs::symlink(&filename, &symlink_path) {
            eprintln!(
                "{} [logging] Failed to create framelog.log symlink: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                e
            );
        }
    }

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }

    // eprintln directly: tlog! would lock LOG_FILE again
    eprintln!(
        "{} [logging] Diagnostics logging started: {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        log_path.display()
    );

    Ok(log_path)
}

/// Stop diagnostics logging and close the file.
pub(crate) fn stop_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if guard.is_some() {
            *guard = None;
        }
    }
}

/// Timestamped logging macro.
/// Prepends `HH:MM:SS.mmm` local time to every message written to stderr.
/// Also writes to the diagnostics file when file logging is enabled.
///
/// Lines end in `\r\n` so they stay aligned while the terminal is in raw mode.
macro_rules! tlog {
    ($($arg:tt)*) => {{
        use std::io::Write as _;
        let msg = format!("{} {}", chrono::Local::now().format("%H:%M:%S%.3f"), format_args!($($arg)*));
        eprint!("{}\r\n", msg);
        if let Ok(mut guard) = $crate::logging::LOG_FILE.lock() {
            if let Some(ref mut f) = *guard {
                let _ = writeln!(f, "{}", msg);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_file_logging(dir.path()).unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("-framelog.log"));

        tlog!("[test] hello diagnostics");
        stop_file_logging();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[test] hello diagnostics"));
    }
}
