//! Fuzz the byte-level receive state machine with arbitrary wire input,
//! interleaved with the foreground terminate/consume cycle.

#![no_main]

use libfuzzer_sys::fuzz_target;
use singlewire::wire::proto::terminate_command;
use singlewire::wire::{Receiver, SlotId, WireSlots};

fuzz_target!(|data: &[u8]| {
    let slots = WireSlots::new();
    let mut rx = Receiver::new(&slots);

    for chunk in data.chunks(7) {
        rx.on_bytes(chunk);

        // Foreground: terminate and consume published commands so the
        // gate reopens and deeper states stay reachable.
        if slots.cmd_pending() && !slots.is_valid(SlotId::InCmd) {
            // SAFETY: latch set, interrupt side is gated off.
            let buf = unsafe { slots.slot_mut(SlotId::InCmd) };
            if terminate_command(buf) {
                let _ = slots.claim(SlotId::InCmd);
                slots.release(SlotId::InCmd);
            }
            slots.clear_cmd();
        }
    }
});
