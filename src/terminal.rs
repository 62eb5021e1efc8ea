// src/terminal.rs
//
// Raw-mode handling so single key presses reach the input listener.

use crossterm::terminal;

/// Keeps the terminal in raw mode until dropped.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore();
    }
}

/// Leave raw mode. Safe to call when raw mode is not active.
pub fn restore() {
    if let Ok(true) = terminal::is_raw_mode_enabled() {
        if let Err(e) = terminal::disable_raw_mode() {
            tlog!("[terminal] Failed to restore terminal: {}", e);
        }
    }
}
