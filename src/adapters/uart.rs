//! UART link adapter (ESP-IDF).
//!
//! The driver is split: the transmit half sits behind the [`Link`] trait,
//! the receive half runs in a dedicated pump thread that feeds the
//! interrupt-side [`Receiver`]. The blocking write path completes
//! synchronously, so the transmit-complete signal fires before `send`
//! returns.

use std::sync::Mutex;

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::uart::{UartRxDriver, UartTxDriver};
use log::warn;

use crate::wire::{Link, Receiver, WireSlots};

/// Blocking UART transmitter.
pub struct UartLink {
    tx: Mutex<UartTxDriver<'static>>,
    slots: &'static WireSlots,
}

impl UartLink {
    pub fn new(tx: UartTxDriver<'static>, slots: &'static WireSlots) -> Self {
        Self {
            tx: Mutex::new(tx),
            slots,
        }
    }
}

impl Link for UartLink {
    fn send(&self, data: &[u8]) {
        let tx = self.tx.lock().unwrap();
        if let Err(e) = tx.write(data) {
            warn!("UART write failed: {}", e);
        }
        // Blocking write: the frame is on the wire once write returns.
        self.slots.tx_complete();
    }
}

/// Receive pump: blocks on the UART and feeds the receive state machine.
/// Run on a dedicated thread; stands in for the receive interrupt.
pub fn pump_rx(rx_driver: &UartRxDriver<'_>, rx: &mut Receiver<'_>) -> ! {
    let mut buf = [0u8; 64];
    loop {
        match rx_driver.read(&mut buf, BLOCK) {
            Ok(n) => rx.on_bytes(&buf[..n]),
            Err(e) => warn!("UART read failed: {}", e),
        }
    }
}
