// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and utilities for the serial beacon firmware.
//!
//! This crate supports both `no_std` (embedded) and host environments:
//! - Default: the beacon state machine and link traits only, testable on the
//!   host with fake peripherals
//! - `embedded` feature: Enables embedded-specific board support (rp2040-hal)

#![no_std]

pub mod beacon;
pub mod link;

// Re-export commonly used types
pub use beacon::{Beacon, POLL_DELAY_MS, PULSE_HALF_PERIOD_MS};
pub use beacon::{SILENCE_BLINK_INTERVAL_MS, SILENCE_TIMEOUT_MS};
pub use link::{Line, LineBuffer, LineLink, Monotonic, MAX_LINE_LEN};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Blink an LED a specified number of times.
pub fn blink(led: &mut impl OutputPin, timer: &mut impl DelayNs, count: u32, period_ms: u32) {
    for _ in 0..count {
        led.set_high().ok();
        timer.delay_ms(period_ms);
        led.set_low().ok();
        timer.delay_ms(period_ms);
    }
}
