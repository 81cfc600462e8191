//! Process-supervisor boundary.
//!
//! The cooperative scheduler owns the live process hierarchy; the debug
//! dispatcher only needs a string rendering of it. This trait is the seam:
//! adapters on the scheduler side implement it, the dispatcher consumes it
//! through a trait object and never learns the tree's shape.

use crate::debug::reply::ReplyWriter;

/// Renders a snapshot of the supervision tree into an outbound buffer.
pub trait ProcessTree {
    /// Write a human-readable tree into `out`. `detailed` includes
    /// per-process state lines; `colored` permits ANSI sequences.
    /// Output is truncated by the writer, never by the implementor.
    fn render(&self, out: &mut ReplyWriter<'_>, detailed: bool, colored: bool);
}
