//! Link endpoint abstraction — any byte-oriented half-duplex channel.
//!
//! Concrete implementations:
//! - UART (the `espidf` adapter)
//! - in-memory harnesses for the test suite
//!
//! The arbiter and the dispatcher are generic over `Link`, so swapping the
//! physical wire requires zero changes to the protocol logic.

use super::slots::WireSlots;

/// Byte sink half of the link endpoint.
///
/// `send` initiates a transmission and returns without blocking on the
/// wire. The caller marks [`WireSlots::mark_tx_pending`] *before* calling
/// `send`; the driver must guarantee exactly one
/// [`WireSlots::tx_complete`] afterwards (typically from its transmit
/// interrupt). Until that completion fires, `data` stays valid and
/// unmodified — the slot's valid bit holds every producer off.
///
/// Receive is push-based and does not appear here: the driver feeds
/// incoming bytes to [`super::Receiver::on_byte`] from its receive
/// interrupt.
///
/// Transmission errors are not surfaced; the transport is best-effort. A
/// driver that can stall must be watchdogged by its integrator.
pub trait Link {
    fn send(&self, data: &[u8]);
}

/// A link that discards every frame and completes it immediately.
/// Useful as a default when no debug host is attached.
pub struct NullLink<'a> {
    slots: &'a WireSlots,
}

impl<'a> NullLink<'a> {
    pub fn new(slots: &'a WireSlots) -> Self {
        Self { slots }
    }
}

impl Link for NullLink<'_> {
    fn send(&self, _data: &[u8]) {
        self.slots.tx_complete();
    }
}
