// src/input.rs
//
// Keyboard control of a running stream.
// Space (or Ctrl+C, which arrives as a key in raw mode) toggles pause; Esc quits.

use std::io::Write;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::control::{PauseController, StopSignal};

pub const PAUSED_MESSAGE: &str = "Logging paused. Press Spacebar to continue or ESC to quit.";
pub const RESUMED_MESSAGE: &str = "Logging resumed.";
pub const QUIT_MESSAGE: &str = "Logging ended. Scroll up to view.";

/// What the quit key does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuitMode {
    /// Exit the process on the spot. Frame logs are already flushed per line.
    #[default]
    Immediate,
    /// Ask the consumer to stop; it closes the port and returns normally.
    Graceful,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    TogglePause,
    Quit,
    Ignore,
}

/// Whether the listener keeps running after handling an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn classify_key(key: &KeyEvent) -> ControlEvent {
    if key.kind != KeyEventKind::Press {
        return ControlEvent::Ignore;
    }
    match key.code {
        KeyCode::Char(' ') => ControlEvent::TogglePause,
        KeyCode::Char(c)
            if c.eq_ignore_ascii_case(&'c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            ControlEvent::TogglePause
        }
        KeyCode::Esc => ControlEvent::Quit,
        _ => ControlEvent::Ignore,
    }
}

pub struct InputListener<W: Write> {
    pause: PauseController,
    stop: StopSignal,
    quit_mode: QuitMode,
    out: W,
}

impl<W: Write> InputListener<W> {
    pub fn new(pause: PauseController, stop: StopSignal, quit_mode: QuitMode, out: W) -> Self {
        Self {
            pause,
            stop,
            quit_mode,
            out,
        }
    }

    /// Apply one control event.
    pub fn handle(&mut self, event: ControlEvent) -> Flow {
        match event {
            ControlEvent::TogglePause => {
                let message = if self.pause.toggle() {
                    PAUSED_MESSAGE
                } else {
                    RESUMED_MESSAGE
                };
                self.say(message);
                Flow::Continue
            }
            ControlEvent::Quit => {
                self.say(QUIT_MESSAGE);
                match self.quit_mode {
                    QuitMode::Immediate => {
                        crate::terminal::restore();
                        std::process::exit(0);
                    }
                    QuitMode::Graceful => {
                        self.stop.request();
                        Flow::Exit
                    }
                }
            }
            ControlEvent::Ignore => Flow::Continue,
        }
    }

    /// Read terminal key events until quit. Never returns in `Immediate` mode.
    pub fn run(mut self) {
        loop {
            if self.stop.is_requested() {
                return;
            }
            // Poll so an external stop (SIGTERM) also ends this thread
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tlog!("[input] Failed to poll terminal events: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                    continue;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) => {
                    if self.handle(classify_key(&key)) == Flow::Exit {
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tlog!("[input] Failed to read terminal event: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    }

    fn say(&mut self, message: &str) {
        // Leading blank line separates the message from the live frame lines
        let _ = write!(self.out, "\r\n{}\r\n", message).and_then(|_| self.out.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_classify_keys() {
        assert_eq!(
            classify_key(&press(KeyCode::Char(' '), KeyModifiers::NONE)),
            ControlEvent::TogglePause
        );
        assert_eq!(
            classify_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            ControlEvent::TogglePause
        );
        assert_eq!(classify_key(&press(KeyCode::Esc, KeyModifiers::NONE)), ControlEvent::Quit);
        assert_eq!(
            classify_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            ControlEvent::Ignore
        );
        assert_eq!(
            classify_key(&press(KeyCode::Enter, KeyModifiers::NONE)),
            ControlEvent::Ignore
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Char(' '), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(classify_key(&key), ControlEvent::Ignore);
    }

    #[test]
    fn test_toggle_twice_restores_state_and_messages() {
        let pause = PauseController::new();
        let mut listener =
            InputListener::new(pause.clone(), StopSignal::new(), QuitMode::Graceful, Vec::new());

        assert_eq!(listener.handle(ControlEvent::TogglePause), Flow::Continue);
        assert!(pause.is_paused());
        assert_eq!(listener.handle(ControlEvent::TogglePause), Flow::Continue);
        assert!(!pause.is_paused());

        let out = String::from_utf8(listener.out).unwrap();
        let paused_at = out.find(PAUSED_MESSAGE).unwrap();
        let resumed_at = out.find(RESUMED_MESSAGE).unwrap();
        assert!(paused_at < resumed_at);
    }

    #[test]
    fn test_graceful_quit_requests_stop() {
        let stop = StopSignal::new();
        let mut listener =
            InputListener::new(PauseController::new(), stop.clone(), QuitMode::Graceful, Vec::new());

        assert_eq!(listener.handle(ControlEvent::Quit), Flow::Exit);
        assert!(stop.is_requested());
        assert!(String::from_utf8(listener.out).unwrap().contains(QUIT_MESSAGE));
    }

    #[test]
    fn test_ignored_input_changes_nothing() {
        let pause = PauseController::new();
        let stop = StopSignal::new();
        let mut listener =
            InputListener::new(pause.clone(), stop.clone(), QuitMode::Graceful, Vec::new());

        assert_eq!(listener.handle(ControlEvent::Ignore), Flow::Continue);
        assert!(!pause.is_paused());
        assert!(!stop.is_requested());
        assert!(listener.out.is_empty());
    }
}
