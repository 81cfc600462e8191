//! Bounded text writer for command replies and snapshot payloads.
//!
//! Handlers write through `core::fmt::Write`; the writer truncates instead
//! of overflowing and keeps the payload NUL-terminated at all times, so a
//! buffer it touched can always be composed into a frame.

use core::fmt;

/// Writes into the payload region of an outbound buffer.
///
/// The wrapped slice includes the NUL slot: at most `len - 1` payload
/// bytes are ever written, and the byte after the payload is always NUL.
pub struct ReplyWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    truncated: bool,
}

impl<'a> ReplyWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        debug_assert!(!buf.is_empty());
        buf[0] = 0;
        Self {
            buf,
            pos: 0,
            truncated: false,
        }
    }

    /// Payload bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Whether any write was cut short by the buffer bound.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Discard everything written so far.
    pub fn clear(&mut self) {
        self.pos = 0;
        self.buf[0] = 0;
    }

    /// The payload written so far, without the trailing NUL.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        let avail = self.buf.len() - 1 - self.pos;
        let take = bytes.len().min(avail);
        if take < bytes.len() {
            self.truncated = true;
        }
        self.buf[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
        self.pos += take;
        self.buf[self.pos] = 0;
    }
}

impl fmt::Write for ReplyWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────
