// src/consumer.rs
//
// The read loop: one byte at a time from the source, broadcast to every frame
// channel, completed frames logged, then one display line per byte.

use std::io::Write;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::control::{PauseController, StopSignal};
use crate::display::Display;
use crate::error::Result;
use crate::frame_log::FrameSink;
use crate::io::serial::{framer::hex_tokens, FrameAccumulator};
use crate::io::ByteSource;

/// Sleep between pause-flag checks while paused
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One frame width: its accumulator, its log and its display slot.
pub struct FrameChannel {
    accumulator: FrameAccumulator,
    sink: FrameSink,
    latest: String,
    frames_logged: u64,
}

impl FrameChannel {
    pub fn new(frame_len: NonZeroUsize, sink: FrameSink) -> Self {
        Self {
            accumulator: FrameAccumulator::new(frame_len),
            sink,
            latest: String::new(),
            frames_logged: 0,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.accumulator.frame_len()
    }

    fn offer(&mut self, byte: u8) -> Result<()> {
        if let Some(frame) = self.accumulator.offer(byte) {
            self.sink.record(&frame)?;
            self.latest = frame.to_hex_tokens();
            self.frames_logged += 1;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ConsumerOptions {
    /// Delay after a failed read. Zero retries immediately.
    pub error_backoff: Duration,
    pub pause_poll: Duration,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            error_backoff: Duration::ZERO,
            pause_poll: PAUSE_POLL_INTERVAL,
        }
    }
}

/// Counters reported when the loop ends
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes_read: u64,
    pub read_errors: u64,
    /// (frame length, frames logged)
    pub frames_logged: Vec<(usize, u64)>,
}

pub struct StreamConsumer<S: ByteSource, W: Write> {
    source: S,
    channels: Vec<FrameChannel>,
    display: Display<W>,
    pause: PauseController,
    stop: StopSignal,
    options: ConsumerOptions,
    bytes_read: u64,
    read_errors: u64,
}

impl<S: ByteSource, W: Write> StreamConsumer<S, W> {
    pub fn new(
        source: S,
        channels: Vec<FrameChannel>,
        display: Display<W>,
        pause: PauseController,
        stop: StopSignal,
    ) -> Self {
        Self {
            source,
            channels,
            display,
            pause,
            stop,
            options: ConsumerOptions::default(),
            bytes_read: 0,
            read_errors: 0,
        }
    }

    pub fn with_options(mut self, options: ConsumerOptions) -> Self {
        self.options = options;
        self
    }

    /// Run until the stop signal is set. Returns early only on a fatal log or display error.
    pub fn run(mut self) -> Result<StreamStats> {
        tlog!(
            "[consumer] Streaming from {} (frame lengths: {:?})",
            self.source.name(),
            self.channels.iter().map(|c| c.frame_len()).collect::<Vec<_>>()
        );

        let result = self.read_loop();
        self.source.close();

        for channel in &self.channels {
            let pending = channel.accumulator.pending();
            if !pending.is_empty() {
                tlog!(
                    "[consumer] {}-byte frame incomplete at stop, dropped: {}",
                    channel.frame_len(),
                    hex_tokens(pending)
                );
            }
        }

        result?;
        Ok(self.stats())
    }

    fn read_loop(&mut self) -> Result<()> {
        loop {
            if self.stop.is_requested() {
                return Ok(());
            }

            if self.pause.is_paused() {
                std::thread::sleep(self.options.pause_poll);
                continue;
            }

            match self.source.read_one_byte() {
                Ok(Some(byte)) => self.process_byte(byte)?,
                Ok(None) => {}
                Err(e) => {
                    self.read_errors += 1;
                    tlog!(
                        "[consumer] Error reading from {}: {}. Continuing.",
                        self.source.name(),
                        e
                    );
                    if !self.options.error_backoff.is_zero() {
                        std::thread::sleep(self.options.error_backoff);
                    }
                }
            }
        }
    }

    fn process_byte(&mut self, byte: u8) -> Result<()> {
        self.bytes_read += 1;
        for channel in &mut self.channels {
            channel.offer(byte)?;
        }
        let slots: Vec<&str> = self.channels.iter().map(|c| c.latest.as_str()).collect();
        self.display.update(&slots)
    }

    fn stats(&self) -> StreamStats {
        StreamStats {
            bytes_read: self.bytes_read,
            read_errors: self.read_errors,
            frames_logged: self
                .channels
                .iter()
                .map(|c| (c.frame_len(), c.frames_logged))
                .collect(),
        }
    }
}
