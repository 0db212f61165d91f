// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Beacon loop state machine.
//!
//! One `poll` call is one loop iteration: drain at most one line from the
//! link and acknowledge it, or derive the indicator state from the time
//! since the last message.

use crate::link::{Line, LineLink, Monotonic};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Silence threshold: two missed 30-second report cycles.
pub const SILENCE_TIMEOUT_MS: u64 = 61_000;
/// Toggle period of the silence blink.
pub const SILENCE_BLINK_INTERVAL_MS: u64 = 1_000;
/// Half period of the blocking receive pulse.
pub const PULSE_HALF_PERIOD_MS: u32 = 500;
/// Rate-limit sleep between loop iterations.
pub const POLL_DELAY_MS: u32 = 10;

/// All mutable beacon state, owned by the loop driver.
pub struct Beacon {
    /// Last received line, trimmed. Empty until the first message.
    last_message: Line,
    /// When the last message arrived.
    last_message_at_ms: u64,
    /// When the indicator last toggled in the silence-blink phase.
    blink_at_ms: u64,
    /// Software copy of the indicator state; the output pin is write-only.
    led_on: bool,
}

impl Beacon {
    pub const fn new() -> Self {
        Self {
            last_message: Line::new(),
            last_message_at_ms: 0,
            blink_at_ms: 0,
            led_on: false,
        }
    }

    /// Last received line after trimming.
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Current indicator state.
    pub fn led_on(&self) -> bool {
        self.led_on
    }

    /// Run one loop iteration. `timer` serves as both the monotonic clock
    /// and the blocking delay for the receive pulse.
    pub fn poll<L, P, T>(&mut self, link: &mut L, led: &mut P, timer: &mut T)
    where
        L: LineLink,
        P: OutputPin,
        T: Monotonic + DelayNs,
    {
        if link.available() {
            self.receive(link, led, timer);
        } else {
            self.idle(led, timer);
        }
    }

    /// Handle one received line: store it trimmed, acknowledge it, run the
    /// receive pulse, and restart the silence timer.
    fn receive<L, P, T>(&mut self, link: &mut L, led: &mut P, timer: &mut T)
    where
        L: LineLink,
        P: OutputPin,
        T: Monotonic + DelayNs,
    {
        let line = link.read_line();
        let trimmed = line.trim();

        self.last_message.clear();
        self.last_message.push_str(trimmed).ok();

        #[cfg(feature = "defmt")]
        defmt::println!("Received: {}", trimmed);

        link.print("ACK:");
        link.println(trimmed);

        // Receive pulse. Blocking: the link is not serviced while it runs.
        led.set_low().ok();
        timer.delay_ms(PULSE_HALF_PERIOD_MS);
        led.set_high().ok();
        timer.delay_ms(PULSE_HALF_PERIOD_MS);
        self.led_on = true;

        self.last_message_at_ms = timer.now_ms();
    }

    /// No input this iteration: blink once the silence threshold has
    /// elapsed, otherwise hold the indicator high iff a non-empty message
    /// has been seen.
    fn idle<P, T>(&mut self, led: &mut P, timer: &mut T)
    where
        P: OutputPin,
        T: Monotonic,
    {
        let now = timer.now_ms();

        if now - self.last_message_at_ms >= SILENCE_TIMEOUT_MS {
            if now - self.blink_at_ms >= SILENCE_BLINK_INTERVAL_MS {
                self.blink_at_ms = now;
                self.set_led(led, !self.led_on);
            }
        } else {
            self.set_led(led, !self.last_message.is_empty());
        }
    }

    fn set_led<P: OutputPin>(&mut self, led: &mut P, on: bool) {
        if on {
            led.set_high().ok();
        } else {
            led.set_low().ok();
        }
        self.led_on = on;
    }
}

impl Default for Beacon {
    fn default() -> Self {
        Self::new()
    }
}
