//! Outbound turn arbiter.
//!
//! Foreground state machine that answers the host's turn-taking. The target
//! never transmits spontaneously: every outbound frame responds to a
//! [`FLOW_TARGET_TO_SCHED`](super::proto::FLOW_TARGET_TO_SCHED) poll latched
//! by the receive interrupt (the one exception, the immediate log push,
//! synthesizes that poll itself and lives in the dispatcher).
//!
//! ```text
//!          ┌───────────────────── FlowWait ◀────────────────────┐
//!          │ inbound latch                │ turn latch          │
//!          ▼                              ▼                     │
//!     CmdReceive                   ContentOutSend ──▶ ContentOutSentWait
//!    (terminate line)             (pick slot, send)        │ tx done
//!          │                              ▲ synced          ▼
//!          └──────────────────────────────┴──────────── ContentOutSent
//!                                                    (release slot bit)
//! ```
//!
//! Priority per turn: command reply, then log, then process tree — the
//! latter two are held back while an inbound command awaits its reply, so
//! replies never reorder behind telemetry.

use log::info;

use super::link::Link;
use super::proto::{self, ContentId, CONTENT_ID_NONE};
use super::slots::{SlotId, WireSlots, STARTED_TRANSFER};
use crate::error::{Error, Result};

/// Placeholder frame for turns with nothing staged. Static so the slice
/// outlives the call into the link driver.
static NONE_FRAME: [u8; 1] = [CONTENT_ID_NONE];

enum XferState {
    Start,
    FlowWait,
    ContentOutSend,
    ContentOutSentWait,
    ContentOutSent,
    CmdReceive,
}

/// The transfer arbiter. One per [`WireSlots`] pool, enforced at start.
pub struct Transfer<'a, L: Link> {
    slots: &'a WireSlots,
    link: &'a L,
    state: XferState,
    /// Busy-wait completion inside the send state so frames interleave
    /// deterministically with immediate log pushes.
    synced: bool,
    /// Slot chosen for the turn in flight; `None` for the placeholder.
    tx_slot: Option<SlotId>,
}

impl<'a, L: Link> Transfer<'a, L> {
    pub fn new(slots: &'a WireSlots, link: &'a L, synced: bool) -> Self {
        Self {
            slots,
            link,
            state: XferState::Start,
            synced,
            tx_slot: None,
        }
    }

    /// Advance the arbiter by one cooperative tick.
    ///
    /// Fails only in the start state (double start); afterwards every tick
    /// returns `Ok` and does a bounded amount of work.
    pub fn step(&mut self) -> Result<()> {
        let slots = self.slots;

        match self.state {
            XferState::Start => {
                if !slots.claim_started(STARTED_TRANSFER) {
                    return Err(Error::Init("transfer already started"));
                }
                info!("single-wire transfer up (synced: {})", self.synced);
                slots.set_send_ready();
                self.state = XferState::FlowWait;
            }

            XferState::FlowWait => {
                // A published command that is not yet terminated takes
                // precedence over everything.
                if slots.cmd_pending() && !slots.is_valid(SlotId::InCmd) {
                    self.state = XferState::CmdReceive;
                    return Ok(());
                }

                // Production builds stay silent: polls are only honoured
                // in debug mode.
                if !slots.debug_mode() {
                    return Ok(());
                }

                if slots.take_turn() {
                    self.state = XferState::ContentOutSend;
                }
            }

            XferState::ContentOutSend => {
                self.content_out_send();

                if self.synced {
                    slots.wait_tx_idle();
                    self.state = XferState::ContentOutSent;
                } else {
                    self.state = XferState::ContentOutSentWait;
                }
            }

            XferState::ContentOutSentWait => {
                if slots.is_tx_pending() {
                    return Ok(());
                }
                self.state = XferState::ContentOutSent;
            }

            XferState::ContentOutSent => {
                if let Some(slot) = self.tx_slot.take() {
                    slots.release(slot);
                    if slot == SlotId::OutCmd {
                        // Reply left the wire: reopen the receive gate.
                        slots.clear_cmd();
                    }
                }
                self.state = XferState::FlowWait;
            }

            XferState::CmdReceive => {
                // SAFETY: inbound latch is set, the interrupt writer is
                // gated off until the latch clears.
                let buf = unsafe { slots.slot_mut(SlotId::InCmd) };

                if proto::terminate_command(buf) {
                    let claimed = slots.claim(SlotId::InCmd);
                    debug_assert!(claimed);
                } else {
                    // No terminator: aborted frame, drop it.
                    slots.clear_cmd();
                }
                self.state = XferState::FlowWait;
            }
        }

        Ok(())
    }

    /// Select the highest-priority staged buffer, compose its frame in
    /// place and hand it to the link.
    fn content_out_send(&mut self) {
        let slots = self.slots;
        let cmd_pending = slots.is_valid(SlotId::InCmd);

        let choice = if slots.is_valid(SlotId::OutCmd) {
            Some((SlotId::OutCmd, ContentId::CmdOut))
        } else if slots.is_valid(SlotId::OutLog) && !cmd_pending {
            Some((SlotId::OutLog, ContentId::Log))
        } else if slots.is_valid(SlotId::OutProc) && !cmd_pending {
            Some((SlotId::OutProc, ContentId::Proc))
        } else {
            None
        };

        match choice {
            Some((slot, id)) => {
                // SAFETY: the valid bit is set, so the producer is done and
                // holds off until release; the arbiter is the sole writer.
                let buf = unsafe { slots.slot_mut(slot) };
                let len = proto::compose_frame(buf, id);
                self.tx_slot = Some(slot);
                slots.mark_tx_pending();
                self.link.send(&buf[..len]);
            }
            None => {
                self.tx_slot = None;
                slots.mark_tx_pending();
                self.link.send(&NONE_FRAME);
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
