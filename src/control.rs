// src/control.rs
//
// Shared live-control state between the input listener and the stream consumer.
// Both handles are cheap clones over the same atomic flag.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Pause flag. Toggled by the input listener, read by the consumer before every byte read.
#[derive(Clone, Debug, Default)]
pub struct PauseController {
    paused: Arc<AtomicBool>,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Request for the consumer loop to stop and release the transport.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_starts_unpaused() {
        assert!(!PauseController::new().is_paused());
    }

    #[test]
    fn test_toggle_returns_new_state() {
        let pause = PauseController::new();
        assert!(pause.toggle());
        assert!(pause.is_paused());
        assert!(!pause.toggle());
        assert!(!pause.is_paused());
    }

    #[test]
    fn test_clones_share_state() {
        let pause = PauseController::new();
        let listener_side = pause.clone();
        listener_side.toggle();
        assert!(pause.is_paused());

        let stop = StopSignal::new();
        let handler_side = stop.clone();
        assert!(!stop.is_requested());
        handler_side.request();
        assert!(stop.is_requested());
    }

    #[test]
    fn test_toggle_visible_across_threads() {
        let pause = PauseController::new();
        let remote = pause.clone();
        std::thread::spawn(move || {
            remote.toggle();
        })
        .join()
        .unwrap();
        assert!(pause.is_paused());
    }
}
