// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Link and clock abstractions for the beacon loop.
//!
//! The loop is written against these traits so it can run on the host with
//! fake peripherals; the firmware crate provides the USB CDC and RP2040
//! timer implementations.

use heapless::String;

/// Longest line the link read primitive will buffer. Longer lines are
/// discarded by the link, not truncated.
pub const MAX_LINE_LEN: usize = 256;

/// One received text line, delimiter stripped.
pub type Line = String<MAX_LINE_LEN>;

/// Line-oriented text link to the peer.
pub trait LineLink {
    /// Returns true when a complete line is waiting to be read.
    fn available(&mut self) -> bool;

    /// Take the waiting line. Returns an empty line if none is waiting.
    fn read_line(&mut self) -> Line;

    /// Write text to the peer.
    fn print(&mut self, text: &str);

    /// Write text to the peer followed by the newline delimiter.
    fn println(&mut self, text: &str);
}

/// Monotonic millisecond clock.
pub trait Monotonic {
    fn now_ms(&mut self) -> u64;
}

/// Byte accumulator that frames an incoming stream into newline-delimited
/// lines. Links feed it one received byte at a time and hand out the
/// buffered line through their [`LineLink`] impl.
pub struct LineBuffer {
    buf: [u8; MAX_LINE_LEN],
    pos: usize,
    overflowed: bool,
    ready: Option<Line>,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_LINE_LEN],
            pos: 0,
            overflowed: false,
            ready: None,
        }
    }

    /// Feed one received byte.
    pub fn push(&mut self, byte: u8) {
        match byte {
            // Line delimiter
            b'\n' => self.finish_line(),
            // Regular data byte
            _ => self.append_byte(byte),
        }
    }

    /// Returns true when a complete line is waiting.
    pub fn has_line(&self) -> bool {
        self.ready.is_some()
    }

    /// Take the waiting line.
    pub fn take_line(&mut self) -> Option<Line> {
        self.ready.take()
    }

    /// Append a byte to the line buffer, handling overflow. An over-long
    /// line is discarded whole once its delimiter arrives.
    fn append_byte(&mut self, byte: u8) {
        if self.pos < MAX_LINE_LEN {
            self.buf[self.pos] = byte;
            self.pos += 1;
        } else {
            self.overflowed = true;
        }
    }

    /// Promote the accumulated bytes to the ready line slot. An overflowed
    /// line or one that is not valid UTF-8 is dropped; a line arriving
    /// before the previous one was consumed overwrites it.
    fn finish_line(&mut self) {
        if !self.overflowed {
            if let Ok(text) = core::str::from_utf8(&self.buf[..self.pos]) {
                let mut line = Line::new();
                line.push_str(text).ok();
                self.ready = Some(line);
            }
        }
        self.pos = 0;
        self.overflowed = false;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl Monotonic for rp2040_hal::Timer {
    fn now_ms(&mut self) -> u64 {
        self.get_counter().ticks() / 1_000
    }
}
