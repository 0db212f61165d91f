// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

#![no_std]
#![no_main]

mod usb_link;

use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use panic_probe as _;

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;
use rp2040_hal::{clocks, gpio, pac, Sio, Timer, Watchdog};
use usb_device::class_prelude::UsbBusAllocator;

use beacon_common::{Beacon, POLL_DELAY_MS};
use usb_link::UsbLink;

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

/// External crystal frequency on the Pico board.
const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;

#[entry]
fn main() -> ! {
    defmt::println!("Beacon init");

    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = clocks::init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);
    let pins = gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut led_pin = pins.gpio25.into_push_pull_output();
    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    beacon_common::blink(&mut led_pin, &mut timer, 3, 200);

    let usb_bus = cortex_m::singleton!(
        : UsbBusAllocator<rp2040_hal::usb::UsbBus> =
            UsbBusAllocator::new(rp2040_hal::usb::UsbBus::new(
                pac.USBCTRL_REGS,
                pac.USBCTRL_DPRAM,
                clocks.usb_clock,
                true,
                &mut pac.RESETS,
            ))
    )
    .unwrap();

    let mut link = match UsbLink::new(usb_bus) {
        Ok(link) => link,
        Err(e) => {
            defmt::error!("Failed to initialize USB link: {:?}", e);
            led_pin.set_high().ok();
            loop {
                cortex_m::asm::nop();
            }
        }
    };

    defmt::println!("Serial beacon started. Waiting for messages...");

    let mut beacon = Beacon::new();
    loop {
        beacon.poll(&mut link, &mut led_pin, &mut timer);
        timer.delay_ms(POLL_DELAY_MS);
    }
}
