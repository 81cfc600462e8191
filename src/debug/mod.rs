//! Command dispatch and instrumentation over the single-wire transport.
//!
//! ```text
//! ┌──────────────┐  InCmd   ┌───────────────┐  OutCmd  ┌──────────────┐
//! │  WireSlots    │─────────▶│ DebugService  │─────────▶│  WireSlots    │
//! │ (terminated   │          │ registry +    │  OutLog  │ (staged for   │
//! │  command)     │          │ interpret FSM │  OutProc │  next turn)   │
//! └──────────────┘          └───────────────┘          └──────────────┘
//! ```
//!
//! The dispatcher interprets command lines against the [`registry`],
//! snapshots the process tree at a fixed cadence, and funnels log entries
//! into the outbound log slot — immediately pushed to the host when synced
//! transfer is configured.

pub mod logfmt;
pub mod registry;
pub mod reply;
pub mod service;

pub use logfmt::{Formatter, Severity, Timestamp};
pub use registry::{CommandFn, Registry, COMMAND_CAPACITY};
pub use reply::ReplyWriter;
pub use service::DebugService;
