//! Byte stream to line splitting.
//!
//! rommon consoles are inconsistent about line endings, so `\n`, `\r\n`
//! and a bare `\r` all end a line. A `\r` that arrives at the end of one
//! read and a `\n` at the start of the next still count as one terminator.

use std::collections::VecDeque;

/// Incremental line splitter fed with raw reads.
///
/// # Examples
///
/// ```
/// use rommon_dump::transport::LineSplitter;
///
/// let mut lines = LineSplitter::new();
/// lines.push(b"aa\rbb\r");
/// lines.push(b"\ncc");
/// assert_eq!(lines.next_line(), Some("aa".to_string()));
/// assert_eq!(lines.next_line(), Some("bb".to_string()));
/// assert_eq!(lines.next_line(), None);
/// assert_eq!(lines.take_partial(), Some("cc".to_string()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineSplitter {
    complete: VecDeque<String>,
    partial: Vec<u8>,
    after_cr: bool,
}

impl LineSplitter {
    /// Creates an empty splitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds received bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if std::mem::take(&mut self.after_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\r' => {
                    self.finish_line();
                    self.after_cr = true;
                }
                b'\n' => self.finish_line(),
                _ => self.partial.push(byte),
            }
        }
    }

    /// Next complete line, without its terminator.
    pub fn next_line(&mut self) -> Option<String> {
        self.complete.pop_front()
    }

    /// Takes the unterminated tail, if any.
    ///
    /// Used when a read times out mid-line.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.partial);
        Some(decode(&raw))
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty() && self.partial.is_empty()
    }

    /// Drops everything buffered.
    pub fn clear(&mut self) {
        self.complete.clear();
        self.partial.clear();
        self.after_cr = false;
    }

    fn finish_line(&mut self) {
        let raw = std::mem::take(&mut self.partial);
        self.complete.push_back(decode(&raw));
    }
}

// rommon output is plain ASCII; anything else is replaced.
fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
