//! Copying generated SQL out of the terminal.
//!
//! Uses the OSC 52 escape sequence: the terminal emulator places the text on
//! the system clipboard, so copies also work over SSH without a display
//! server. Terminals that do not support it ignore the sequence.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;

/// How long the "Copied" marker stays visible.
pub const COPIED_MARKER_DURATION: Duration = Duration::from_secs(2);

pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> io::Result<()>;
}

pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy_text(&mut self, text: &str) -> io::Result<()> {
        execute!(self.out, CopyToClipboard::to_clipboard_from(text))
    }
}

/// Which SQL a copy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// The most recent result that has SQL.
    LatestResult,
    /// A history entry, by index (newest first).
    History(usize),
}

/// A successful copy, shown as "Copied" until it expires.
#[derive(Debug, Clone, Copy)]
pub struct CopiedMarker {
    pub target: CopyTarget,
    pub at: Instant,
}

impl CopiedMarker {
    pub fn new(target: CopyTarget) -> Self {
        Self {
            target,
            at: Instant::now(),
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.at) < COPIED_MARKER_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_carries_base64_text() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy_text("SELECT 1").unwrap();
        let written = String::from_utf8(clipboard.out).unwrap();
        assert_eq!(written, "\x1b]52;c;U0VMRUNUIDE=\x1b\\");
    }

    #[test]
    fn non_ascii_sql_is_encoded_as_utf8() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy_text("SELECT \"é\"").unwrap();
        let written = String::from_utf8(clipboard.out).unwrap();
        assert!(written.contains("U0VMRUNUICLDqSI="));
    }

    #[test]
    fn marker_expires_after_two_seconds() {
        let marker = CopiedMarker::new(CopyTarget::LatestResult);
        assert!(marker.is_visible(marker.at));
        assert!(marker.is_visible(marker.at + Duration::from_millis(1999)));
        assert!(!marker.is_visible(marker.at + COPIED_MARKER_DURATION));
    }
}
