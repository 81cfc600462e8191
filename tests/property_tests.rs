//! Property tests for the framing layer and the command table.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use singlewire::debug::{Registry, ReplyWriter};
use singlewire::wire::proto::{
    compose_frame, terminate_command, ContentId, CONTENT_END, CONTENT_ID_CMD_IN,
    CONTENT_ID_CMD_OUT, FLOW_SCHED_TO_TARGET,
};
use singlewire::wire::{Receiver, SlotId, WireSlots, IN_CMD_CAPACITY, OUT_CMD_CAPACITY};

fn ascii_payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0x20u8..=0x7Eu8, 0..=max_len)
}

proptest! {
    /// Any printable-ASCII payload that fits the buffer survives framing:
    /// the composed frame carries the payload verbatim, one trailing NUL
    /// and the frame-end marker.
    #[test]
    fn frame_round_trip(payload in ascii_payload(OUT_CMD_CAPACITY - 3)) {
        let mut buf = [0u8; OUT_CMD_CAPACITY];
        buf[1..1 + payload.len()].copy_from_slice(&payload);
        buf[1 + payload.len()] = 0;

        let len = compose_frame(&mut buf, ContentId::CmdOut);

        prop_assert_eq!(len, payload.len() + 3);
        prop_assert_eq!(buf[0], CONTENT_ID_CMD_OUT);
        prop_assert_eq!(&buf[1..1 + payload.len()], payload.as_slice());
        prop_assert_eq!(buf[1 + payload.len()], 0);
        prop_assert_eq!(buf[len - 1], CONTENT_END);
    }

    /// A command frame delivered byte-wise through the receive machine is
    /// published exactly once and terminates to the original line.
    #[test]
    fn inbound_command_round_trip(payload in ascii_payload(IN_CMD_CAPACITY - 2)) {
        let slots = WireSlots::new();
        let mut rx = Receiver::new(&slots);

        rx.on_byte(FLOW_SCHED_TO_TARGET);
        rx.on_byte(CONTENT_ID_CMD_IN);
        rx.on_bytes(&payload);
        rx.on_byte(CONTENT_END);

        prop_assert!(slots.cmd_pending());

        // SAFETY: latch set, the interrupt writer is gated off.
        let buf = unsafe { slots.slot_mut(SlotId::InCmd) };
        prop_assert!(terminate_command(buf));
        prop_assert_eq!(&buf[..payload.len()], payload.as_slice());
        prop_assert_eq!(buf[payload.len()], 0);
    }

    /// Overfilling the command buffer never publishes a frame and never
    /// wedges the receive machine.
    #[test]
    fn inbound_overrun_is_contained(
        extra in 0usize..=64,
        junk_byte in 0x20u8..=0x7Eu8,
    ) {
        let slots = WireSlots::new();
        let mut rx = Receiver::new(&slots);

        rx.on_byte(FLOW_SCHED_TO_TARGET);
        rx.on_byte(CONTENT_ID_CMD_IN);
        for _ in 0..IN_CMD_CAPACITY + extra {
            rx.on_byte(junk_byte);
        }

        prop_assert!(!slots.cmd_pending());
        prop_assert!(!slots.is_valid(SlotId::InCmd));

        // A well-formed frame still lands afterwards.
        rx.on_byte(FLOW_SCHED_TO_TARGET);
        rx.on_byte(CONTENT_ID_CMD_IN);
        rx.on_bytes(b"ok");
        rx.on_byte(CONTENT_END);
        prop_assert!(slots.cmd_pending());
    }

    /// Without the frame-opening flow byte, arbitrary noise never produces
    /// a phantom command.
    #[test]
    fn noise_never_publishes(noise in proptest::collection::vec(any::<u8>(), 0..=256)) {
        let slots = WireSlots::new();
        let mut rx = Receiver::new(&slots);

        for &b in &noise {
            if b == FLOW_SCHED_TO_TARGET {
                continue;
            }
            rx.on_byte(b);
        }

        prop_assert!(!slots.cmd_pending());
        prop_assert!(!slots.is_valid(SlotId::InCmd));
    }

    /// Lookup never panics and never matches a line that extends the id
    /// without a token boundary.
    #[test]
    fn lookup_is_total(line in "[ -~]{0,40}") {
        let mut reg = Registry::new();
        reg.register("ping", |_, _| {}, Some("p"), None, None).unwrap();
        reg.register("levelLogSys", |_, _| {}, None, None, None).unwrap();

        let hit = reg.lookup(&line).is_some();
        let expected = {
            let token = |t: &str| {
                line.strip_prefix(t)
                    .is_some_and(|r| r.is_empty() || r.as_bytes()[0].is_ascii_whitespace())
            };
            token("ping") || token("p") || token("levelLogSys")
        };
        prop_assert_eq!(hit, expected);
    }

    /// The reply writer never writes past its bound and always leaves a
    /// NUL terminator behind.
    #[test]
    fn reply_writer_is_bounded(chunks in proptest::collection::vec("[ -~]{0,64}", 0..=8)) {
        let mut buf = [0xA5u8; 48];
        let mut w = ReplyWriter::new(&mut buf);
        for c in &chunks {
            let _ = core::fmt::Write::write_str(&mut w, c);
        }

        let pos = w.len();
        prop_assert!(pos <= 47);
        prop_assert_eq!(buf[pos], 0);
    }
}
