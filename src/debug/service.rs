//! Debug dispatcher: command interpretation, tree snapshots, log funnel.
//!
//! Runs as a cooperative foreground task next to the transfer arbiter.
//! Commands are consumed from the inbound slot, executed against the
//! registry, and answered through the reply slot; a delay counter paces
//! process-tree snapshots; `log_enqueue` stages entries for the next
//! outbound turn or pushes them to the host immediately in synced mode.

use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use log::info;

use crate::config::DebugConfig;
use crate::error::{Error, Result};
use crate::tree::ProcessTree;
use crate::wire::link::Link;
use crate::wire::proto::{self, ContentId, FLOW_TARGET_TO_SCHED};
use crate::wire::slots::{SlotId, WireSlots, STARTED_DEBUG};
use crate::wire::{IN_CMD_CAPACITY, OUT_CMD_CAPACITY, OUT_LOG_CAPACITY, OUT_PROC_CAPACITY};

use super::logfmt::Severity;
use super::registry::{Builtin, Handler, Registry};
use super::reply::ReplyWriter;

/// Unsolicited-turn request for the immediate log push. Static so the
/// slice outlives the call into the link driver.
static FLOW_REQUEST: [u8; 1] = [FLOW_TARGET_TO_SCHED];

enum DbgState {
    Start,
    SendReadyWait,
    Main,
}

enum CmdState {
    RcvdWait,
    Interpret,
    SendStart,
}

/// The debug dispatcher. One per [`WireSlots`] pool, enforced at start.
pub struct DebugService<'a, L: Link> {
    slots: &'a WireSlots,
    link: &'a L,
    tree: &'a dyn ProcessTree,
    registry: Registry,

    state: DbgState,
    cmd_state: CmdState,

    debug_key: heapless::String<16>,
    log_level: AtomicU8,
    log_overflow: AtomicBool,
    log_immediate: bool,

    help_cursor: usize,
    refresh_ticks: u16,
    cnt_delay: u16,
    ready: bool,
}

impl<'a, L: Link> DebugService<'a, L> {
    pub fn new(
        slots: &'a WireSlots,
        link: &'a L,
        tree: &'a dyn ProcessTree,
        config: &DebugConfig,
    ) -> Self {
        Self {
            slots,
            link,
            tree,
            registry: Registry::new(),
            state: DbgState::Start,
            cmd_state: CmdState::RcvdWait,
            debug_key: config.debug_key.clone(),
            log_level: AtomicU8::new(config.log_level),
            log_overflow: AtomicBool::new(false),
            log_immediate: config.synced_transfer,
            help_cursor: 0,
            refresh_ticks: config.proc_refresh_ticks,
            cnt_delay: 0,
            ready: false,
        }
    }

    /// The command table, for startup registration.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatcher finished its start handshake with the arbiter.
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// A log entry was dropped because the log slot was still staged.
    pub fn log_overflowed(&self) -> bool {
        self.log_overflow.load(Ordering::Relaxed)
    }

    pub fn log_level(&self) -> u8 {
        self.log_level.load(Ordering::Relaxed)
    }

    pub fn set_log_level(&self, level: u8) {
        self.log_level.store(level, Ordering::Relaxed);
    }

    /// Advance the dispatcher by one cooperative tick.
    pub fn step(&mut self) -> Result<()> {
        match self.state {
            DbgState::Start => {
                if !self.slots.claim_started(STARTED_DEBUG) {
                    return Err(Error::Init("dispatcher already started"));
                }
                self.registry
                    .register_builtin("infoHelp", Builtin::Help, None)?;
                self.registry
                    .register_builtin("levelLogSys", Builtin::LogLevel, None)?;
                self.state = DbgState::SendReadyWait;
            }

            DbgState::SendReadyWait => {
                if !self.slots.send_ready() {
                    return Ok(());
                }
                info!("debug dispatcher ready");
                self.ready = true;
                self.state = DbgState::Main;
            }

            DbgState::Main => {
                self.command_interpret();
                self.proc_tree_send();
            }
        }

        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    fn command_interpret(&mut self) {
        let slots = self.slots;

        match self.cmd_state {
            CmdState::RcvdWait => {
                if !slots.is_valid(SlotId::InCmd) || slots.is_valid(SlotId::OutCmd) {
                    return;
                }
                self.cmd_state = CmdState::Interpret;
            }

            CmdState::Interpret => {
                // Copy the line out of the shared slot; the borrow must not
                // outlive this arm.
                let mut line = heapless::String::<IN_CMD_CAPACITY>::new();
                {
                    // SAFETY: InCmd is valid, the receive interrupt is gated
                    // off until the slot is released.
                    let buf = unsafe { slots.slot(SlotId::InCmd) };
                    let end = buf.iter().position(|&b| b == 0).unwrap_or(0);
                    let _ = line.push_str(core::str::from_utf8(&buf[..end]).unwrap_or(""));
                }

                // SAFETY: OutCmd is not valid (gate above) and the
                // dispatcher is its sole producer.
                let out = unsafe { slots.slot_mut(SlotId::OutCmd) };
                // Reserve the header byte in front, NUL + frame end behind.
                let mut reply = ReplyWriter::new(&mut out[1..OUT_CMD_CAPACITY - 1]);

                if line.starts_with(self.debug_key.as_str()) {
                    let mode = slots.toggle_debug_mode();
                    let _ = write!(reply, "Debug mode {}", u8::from(mode));
                    self.cmd_state = CmdState::SendStart;
                    return;
                }

                if !slots.debug_mode() {
                    // Production: don't answer, drop the frame entirely.
                    slots.release(SlotId::InCmd);
                    slots.clear_cmd();
                    self.cmd_state = CmdState::RcvdWait;
                    return;
                }

                let hit = self
                    .registry
                    .lookup(line.as_str())
                    .map(|(cmd, args)| (cmd.handler, args));

                match hit {
                    Some((Handler::Fn(f), args)) => {
                        f(args, &mut reply);
                        if reply.is_empty() {
                            let _ = reply.write_str("Done");
                        }
                    }
                    Some((Handler::Builtin(builtin), args)) => {
                        self.run_builtin(builtin, args, &mut reply);
                    }
                    None => {
                        let _ = reply.write_str("Unknown command");
                    }
                }
                self.cmd_state = CmdState::SendStart;
            }

            CmdState::SendStart => {
                // SAFETY: InCmd still valid, interrupt gated off.
                unsafe { slots.slot_mut(SlotId::InCmd)[0] = 0 };

                let _ = slots.claim(SlotId::OutCmd);
                slots.release(SlotId::InCmd);
                self.cmd_state = CmdState::RcvdWait;
            }
        }
    }

    fn run_builtin(&mut self, builtin: Builtin, args: &str, reply: &mut ReplyWriter<'_>) {
        match builtin {
            Builtin::Help => {
                // One entry per invocation; an empty page past the end
                // resets the cursor (and stays empty — no "Done" here).
                match self.registry.entry(self.help_cursor) {
                    Some(cmd) => {
                        self.help_cursor += 1;
                        let _ = write!(
                            reply,
                            "{}|{}|{}|{}",
                            cmd.id,
                            cmd.shortcut.unwrap_or(""),
                            cmd.desc.unwrap_or(""),
                            cmd.group.unwrap_or("")
                        );
                    }
                    None => self.help_cursor = 0,
                }
            }

            Builtin::LogLevel => {
                let level = args
                    .bytes()
                    .next()
                    .filter(u8::is_ascii_digit)
                    .map(|b| b - b'0')
                    .filter(|l| *l <= 5)
                    .unwrap_or(2);
                self.set_log_level(level);
                let _ = write!(reply, "System log level set to {}", level);
            }
        }
    }

    // ── Process-tree snapshots ────────────────────────────────

    fn proc_tree_send(&mut self) {
        let slots = self.slots;

        if !slots.debug_mode() {
            // Minimize CPU load in production.
            return;
        }

        if self.cnt_delay < self.refresh_ticks {
            self.cnt_delay += 1;
            return;
        }

        if !slots.claim(SlotId::OutProc) {
            // Snapshot still in flight; retry next tick.
            return;
        }
        self.cnt_delay = 0;

        // SAFETY: claimed above, sole producer until the arbiter releases.
        let out = unsafe { slots.slot_mut(SlotId::OutProc) };
        let mut snapshot = ReplyWriter::new(&mut out[1..OUT_PROC_CAPACITY - 1]);
        self.tree.render(&mut snapshot, true, true);
    }

    // ── Log funnel ────────────────────────────────────────────

    /// Stage a log entry for the host.
    ///
    /// Drops the entry when the dispatcher is not ready or the severity is
    /// filtered; flags an overflow when the log slot is still staged. In
    /// synced-transfer mode the entry is pushed out immediately: the turn
    /// request and the frame are transmitted back-to-back, each awaited.
    pub fn log_enqueue(&self, severity: Severity, msg: &str) {
        if !self.ready {
            return;
        }
        if severity as u8 > self.log_level.load(Ordering::Relaxed) {
            return;
        }

        let slots = self.slots;
        if !slots.claim(SlotId::OutLog) {
            self.log_overflow.store(true, Ordering::Relaxed);
            return;
        }

        // SAFETY: claimed above, sole producer until release.
        let out = unsafe { slots.slot_mut(SlotId::OutLog) };
        let mut entry = ReplyWriter::new(&mut out[1..OUT_LOG_CAPACITY - 1]);
        let _ = entry.write_str(msg);

        if !self.log_immediate {
            // The arbiter picks the entry up on the next outbound turn.
            return;
        }

        // Unsolicited turn, then the frame itself.
        slots.mark_tx_pending();
        self.link.send(&FLOW_REQUEST);
        slots.wait_tx_idle();

        // SAFETY: still claimed; composing in place before transmission.
        let out = unsafe { slots.slot_mut(SlotId::OutLog) };
        let len = proto::compose_frame(out, ContentId::Log);
        slots.mark_tx_pending();
        self.link.send(&out[..len]);
        slots.wait_tx_idle();

        slots.release(SlotId::OutLog);
    }
}

// ── Tests ────────────────────────────────────────────────────
