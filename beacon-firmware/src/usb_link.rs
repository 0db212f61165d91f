// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC link carrying newline-delimited text lines.

use beacon_common::link::{Line, LineBuffer, LineLink};
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

#[derive(Debug, defmt::Format)]
pub enum LinkError {
    StringTooLong,
}

pub struct UsbLink {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
    rx: LineBuffer,
}

impl UsbLink {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus>) -> Result<Self, LinkError> {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x2E8A, 0x000A))
            .strings(&[StringDescriptors::default()
                .manufacturer("ADNT")
                .product("Serial Beacon")
                .serial_number("0001")])
            .map_err(|_| LinkError::StringTooLong)?
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Ok(Self {
            serial,
            usb_dev,
            rx: LineBuffer::new(),
        })
    }

    /// Poll the USB device and drain pending bytes into the line buffer.
    /// Must be called frequently.
    pub fn poll(&mut self) {
        self.usb_dev.poll(&mut [&mut self.serial]);

        const USB_READ_BUF_SIZE: usize = 64;
        let mut tmp = [0u8; USB_READ_BUF_SIZE];

        let Ok(count) = self.serial.read(&mut tmp) else {
            return;
        };

        for &byte in &tmp[..count] {
            self.rx.push(byte);
        }
    }

    /// Write all bytes to USB serial, handling WouldBlock by polling.
    fn write_all(&mut self, data: &[u8]) {
        let mut offset = 0;
        while offset < data.len() {
            match self.serial.write(&data[offset..]) {
                Ok(n) => offset += n,
                Err(UsbError::WouldBlock) => {
                    self.usb_dev.poll(&mut [&mut self.serial]);
                }
                Err(_) => break,
            }
        }
    }
}

impl LineLink for UsbLink {
    fn available(&mut self) -> bool {
        self.poll();
        self.rx.has_line()
    }

    fn read_line(&mut self) -> Line {
        self.rx.take_line().unwrap_or_default()
    }

    fn print(&mut self, text: &str) {
        self.write_all(text.as_bytes());
    }

    fn println(&mut self, text: &str) {
        self.write_all(text.as_bytes());
        self.write_all(b"\n");
    }
}
