// src/display.rs
//
// Live terminal line: the latest frame of each width side by side.
//
//   |01 02 03 04|          |01 02 03 04 05|          |01 02 03 04 05 06|

use std::io::Write;

use crate::error::{Error, Result};

const SLOT_GAP: &str = "          ";

/// Format one display line (without terminator) from the per-width slots.
pub fn format_line<S: AsRef<str>>(slots: &[S]) -> String {
    slots
        .iter()
        .map(|s| format!("|{}|", s.as_ref()))
        .collect::<Vec<_>>()
        .join(SLOT_GAP)
}

pub struct Display<W: Write> {
    out: W,
    line_ending: &'static str,
}

impl<W: Write> Display<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_ending: "\n",
        }
    }

    /// Use `\r\n` line endings. Needed while the terminal is in raw mode.
    pub fn raw_mode(mut self, raw: bool) -> Self {
        self.line_ending = if raw { "\r\n" } else { "\n" };
        self
    }

    pub fn update<S: AsRef<str>>(&mut self, slots: &[S]) -> Result<()> {
        let line = format_line(slots);
        write!(self.out, "{}{}", line, self.line_ending)
            .and_then(|_| self.out.flush())
            .map_err(Error::Display)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_all_empty() {
        let slots = ["", "", ""];
        assert_eq!(format_line(&slots), "||          ||          ||");
    }

    #[test]
    fn test_format_line_mixed() {
        let slots = ["01 02 03 04", "", "01 02 03 04 05 06"];
        assert_eq!(
            format_line(&slots),
            "|01 02 03 04|          ||          |01 02 03 04 05 06|"
        );
    }

    #[test]
    fn test_update_writes_one_line_per_call() {
        let mut display = Display::new(Vec::new());
        display.update(&["a", "b", "c"]).unwrap();
        display.update(&["d", "e", "f"]).unwrap();

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(out, "|a|          |b|          |c|\n|d|          |e|          |f|\n");
    }

    #[test]
    fn test_raw_mode_line_ending() {
        let mut display = Display::new(Vec::new()).raw_mode(true);
        display.update(&["", "", ""]).unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert!(out.ends_with("||\r\n"));
    }
}
