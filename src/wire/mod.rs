//! Half-duplex single-wire debug transport.
//!
//! One serial link is shared between the host scheduler and the target.
//! The host owns the turn-taking: it grants the target a transmit turn
//! with one reserved flow byte, or announces its own command frame with
//! the other.
//!
//! ```text
//! host → target, command turn:
//! ┌──────────────────────┬────────────────────┬─────────────┬─────────────┐
//! │ FLOW_SCHED_TO_TARGET │ CONTENT_ID_CMD_IN  │ payload …   │ CONTENT_END │
//! └──────────────────────┴────────────────────┴─────────────┴─────────────┘
//!
//! host → target, poll turn:          target → host, one frame per turn:
//! ┌──────────────────────┐           ┌────────────┬───────────┬────┬─────────────┐
//! │ FLOW_TARGET_TO_SCHED │           │ Content-ID │ payload … │ 00 │ CONTENT_END │
//! └──────────────────────┘           └────────────┴───────────┴────┴─────────────┘
//! ```
//!
//! Receive runs byte-per-byte in interrupt context ([`rx::Receiver`]);
//! the foreground [`transfer::Transfer`] state machine answers poll turns
//! with the highest-priority staged buffer. The two sides share the four
//! classified buffers of [`slots::WireSlots`] without locks.

pub mod link;
pub mod proto;
pub mod rx;
pub mod slots;
pub mod transfer;

pub use link::{Link, NullLink};
pub use proto::ContentId;
pub use rx::Receiver;
pub use slots::{SlotId, WireSlots};
pub use transfer::Transfer;

/// Inbound command buffer capacity.
pub const IN_CMD_CAPACITY: usize = 64;

/// Command reply buffer capacity.
pub const OUT_CMD_CAPACITY: usize = 128;

/// Log entry buffer capacity.
pub const OUT_LOG_CAPACITY: usize = 256;

/// Process-tree snapshot buffer capacity.
pub const OUT_PROC_CAPACITY: usize = 1024;

// A frame needs at least the header byte plus the NUL + CONTENT_END tail.
const _: () = assert!(IN_CMD_CAPACITY >= 3);
const _: () = assert!(OUT_CMD_CAPACITY >= 3);
const _: () = assert!(OUT_LOG_CAPACITY >= 3);
const _: () = assert!(OUT_PROC_CAPACITY >= 3);
