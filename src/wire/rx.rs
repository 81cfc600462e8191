//! Receive state machine, driven byte-per-byte from interrupt context.
//!
//! ```text
//!            FLOW_SCHED_TO_TARGET          CONTENT_ID_CMD_IN
//!  ┌───────┐ ──────────────────▶ ┌───────────┐ ─────────────▶ ┌──────┐
//!  │ Start │                     │ ContentId │                │ Data │
//!  └───────┘ ◀────────────────── └───────────┘ ◀───────────── └──────┘
//!      ▲        anything else        gate closed      CONTENT_END
//!      │                                              or overrun
//!      └── FLOW_TARGET_TO_SCHED latches the turn, state unchanged
//! ```
//!
//! Everything here is bounded-time and lock-free: classification writes one
//! latch, payload bytes are appended to `InCmd`, and the publish store is
//! last so the foreground never observes a half-written frame.

use super::proto::{CONTENT_END, CONTENT_ID_CMD_IN, FLOW_SCHED_TO_TARGET, FLOW_TARGET_TO_SCHED};
use super::slots::{SlotId, WireSlots};
use super::IN_CMD_CAPACITY;

enum RcvState {
    Start,
    ContentId,
    Data,
}

/// Interrupt-side half of the frame codec.
///
/// Owns the transient receive state; the payload lands in the shared
/// [`WireSlots`]. Not reentrant — exactly one instance per link, invoked
/// from one interrupt context.
pub struct Receiver<'a> {
    slots: &'a WireSlots,
    state: RcvState,
    write_idx: usize,
}

impl<'a> Receiver<'a> {
    pub fn new(slots: &'a WireSlots) -> Self {
        Self {
            slots,
            state: RcvState::Start,
            write_idx: 0,
        }
    }

    /// Feed a burst of received bytes in arrival order.
    pub fn on_bytes(&mut self, data: &[u8]) {
        for b in data {
            self.on_byte(*b);
        }
    }

    /// Process one received byte.
    pub fn on_byte(&mut self, byte: u8) {
        match self.state {
            RcvState::Start => {
                if byte == FLOW_TARGET_TO_SCHED {
                    self.slots.grant_turn();
                    return;
                }
                if byte == FLOW_SCHED_TO_TARGET {
                    self.state = RcvState::ContentId;
                }
                // Anything else is line noise between frames.
            }
            RcvState::ContentId => {
                if byte != CONTENT_ID_CMD_IN {
                    self.state = RcvState::Start;
                    return;
                }
                if self.slots.cmd_pending() || self.slots.is_valid(SlotId::InCmd) {
                    // Previous command not consumed yet: reject the frame.
                    self.state = RcvState::Start;
                    return;
                }
                self.write_idx = 0;
                self.state = RcvState::Data;
            }
            RcvState::Data => {
                // SAFETY: sole writer — the inbound gate above guarantees
                // the foreground is not reading InCmd while we append.
                let buf = unsafe { self.slots.slot_mut(SlotId::InCmd) };
                buf[self.write_idx] = byte;
                self.write_idx += 1;

                if byte == CONTENT_END {
                    self.slots.publish_cmd();
                    self.state = RcvState::Start;
                    return;
                }

                if self.write_idx >= IN_CMD_CAPACITY - 1 {
                    // Overrun: discard the frame silently.
                    self.state = RcvState::Start;
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
