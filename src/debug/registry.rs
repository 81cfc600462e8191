//! Fixed-capacity command table.
//!
//! Commands are registered at startup and are immutable afterwards; there
//! is no deregistration. Lookup is a linear scan in insertion order — the
//! table never exceeds a few dozen entries, and a scan over a fixed array
//! works in no-heap environments.

use log::info;

use crate::error::RegistryError;
use crate::wire::IN_CMD_CAPACITY;

use super::reply::ReplyWriter;

/// Number of command slots.
pub const COMMAND_CAPACITY: usize = 23;

/// User command handler: receives the argument tail of the line and a
/// bounded writer over the reply buffer. A handler that writes nothing
/// gets a `"Done"` reply substituted by the dispatcher.
pub type CommandFn = fn(args: &str, out: &mut ReplyWriter<'_>);

/// Commands executed by the dispatcher itself because they need dispatcher
/// state (the help pagination cursor, the log severity filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// Paginated listing of the registry, one entry per invocation.
    Help,
    /// Set the system log severity filter.
    LogLevel,
}

#[derive(Clone, Copy)]
pub(crate) enum Handler {
    Fn(CommandFn),
    Builtin(Builtin),
}

/// One registered command.
pub struct Command {
    pub id: &'static str,
    pub shortcut: Option<&'static str>,
    pub desc: Option<&'static str>,
    pub group: Option<&'static str>,
    pub(crate) handler: Handler,
}

/// The command table.
pub struct Registry {
    slots: [Option<Command>; COMMAND_CAPACITY],
}

impl Registry {
    pub fn new() -> Self {
        Self {
            slots: [const { None }; COMMAND_CAPACITY],
        }
    }

    /// Register a user command.
    ///
    /// `id` must be non-empty, short enough to arrive through the command
    /// buffer, and free of the `|` help-field separator.
    pub fn register(
        &mut self,
        id: &'static str,
        handler: CommandFn,
        shortcut: Option<&'static str>,
        desc: Option<&'static str>,
        group: Option<&'static str>,
    ) -> Result<(), RegistryError> {
        self.insert(Command {
            id,
            shortcut,
            desc,
            group,
            handler: Handler::Fn(handler),
        })
    }

    pub(crate) fn register_builtin(
        &mut self,
        id: &'static str,
        builtin: Builtin,
        desc: Option<&'static str>,
    ) -> Result<(), RegistryError> {
        self.insert(Command {
            id,
            shortcut: None,
            desc,
            group: None,
            handler: Handler::Builtin(builtin),
        })
    }

    fn insert(&mut self, cmd: Command) -> Result<(), RegistryError> {
        if cmd.id.is_empty() || cmd.id.len() >= IN_CMD_CAPACITY - 2 || cmd.id.contains('|') {
            return Err(RegistryError::InvalidId);
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(RegistryError::TableFull)?;

        info!("registered command '{}'", cmd.id);
        *slot = Some(cmd);
        Ok(())
    }

    /// Find the first entry whose id (or shortcut) opens `line` as a whole
    /// token. Returns the entry and the argument tail with one separator
    /// byte skipped.
    pub fn lookup<'l>(&self, line: &'l str) -> Option<(&Command, &'l str)> {
        for cmd in self.slots.iter().flatten() {
            let matched = if token_matches(line, cmd.id) {
                Some(cmd.id.len())
            } else {
                cmd.shortcut
                    .filter(|s| !s.is_empty() && token_matches(line, s))
                    .map(str::len)
            };

            if let Some(len) = matched {
                let rest = &line[len..];
                let args = if rest.is_empty() { rest } else { &rest[1..] };
                return Some((cmd, args));
            }
        }
        None
    }

    /// Entry at `idx` in insertion order (the table is dense).
    pub fn entry(&self, idx: usize) -> Option<&Command> {
        self.slots.get(idx)?.as_ref()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// `line` starts with `token` and the next byte is a boundary (end of line
/// or whitespace).
fn token_matches(line: &str, token: &str) -> bool {
    line.strip_prefix(token)
        .is_some_and(|rest| rest.is_empty() || rest.as_bytes()[0].is_ascii_whitespace())
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_args: &str, _out: &mut ReplyWriter<'_>) {}

    #[test]
    fn register_and_lookup() {
        let mut reg = Registry::new();
        reg.register("ping", noop, None, Some("liveness probe"), None)
            .unwrap();

        let (cmd, args) = reg.lookup("ping").unwrap();
        assert!(matches!(cmd.handler, Handler::Fn(_)));
        assert_eq!(cmd.desc, Some("liveness probe"));
        assert_eq!(args, "");
    }

    #[test]
    fn args_skip_one_separator() {
        let mut reg = Registry::new();
        reg.register("set", noop, None, None, None).unwrap();

        let (_, args) = reg.lookup("set 42").unwrap();
        assert_eq!(args, "42");
    }

    #[test]
    fn prefix_without_boundary_does_not_match() {
        let mut reg = Registry::new();
        reg.register("ping", noop, None, None, None).unwrap();

        assert!(reg.lookup("pingx").is_none());
        assert!(reg.lookup("pin").is_none());
    }

    #[test]
    fn shortcut_matches() {
        let mut reg = Registry::new();
        reg.register("statusRead", noop, Some("st"), None, None)
            .unwrap();

        assert!(reg.lookup("st").is_some());
        let (_, args) = reg.lookup("st now").unwrap();
        assert_eq!(args, "now");
    }

    #[test]
    fn insertion_order_wins() {
        let mut reg = Registry::new();
        fn first(_: &str, out: &mut ReplyWriter<'_>) {
            let _ = core::fmt::Write::write_str(out, "first");
        }
        reg.register("cmd", first, None, None, None).unwrap();
        reg.register("cmd", noop, None, None, None).unwrap();

        let (cmd, _) = reg.lookup("cmd").unwrap();
        let Handler::Fn(f) = cmd.handler else {
            panic!("expected fn handler");
        };
        let mut buf = [0u8; 16];
        let mut w = ReplyWriter::new(&mut buf);
        f("", &mut w);
        assert_eq!(w.as_bytes(), b"first");
    }

    #[test]
    fn rejects_invalid_ids() {
        let mut reg = Registry::new();
        assert_eq!(
            reg.register("", noop, None, None, None),
            Err(RegistryError::InvalidId)
        );
        assert_eq!(
            reg.register("bad|id", noop, None, None, None),
            Err(RegistryError::InvalidId)
        );

        let long: &'static str = "x".repeat(IN_CMD_CAPACITY).leak();
        assert_eq!(
            reg.register(long, noop, None, None, None),
            Err(RegistryError::InvalidId)
        );
    }

    #[test]
    fn table_full() {
        let mut reg = Registry::new();
        for _ in 0..COMMAND_CAPACITY {
            reg.register("fill", noop, None, None, None).unwrap();
        }
        assert_eq!(
            reg.register("overflow", noop, None, None, None),
            Err(RegistryError::TableFull)
        );
        assert_eq!(reg.len(), COMMAND_CAPACITY);
    }

    #[test]
    fn entries_are_dense() {
        let mut reg = Registry::new();
        reg.register("a", noop, None, None, None).unwrap();
        reg.register("b", noop, None, None, None).unwrap();

        assert_eq!(reg.entry(0).unwrap().id, "a");
        assert_eq!(reg.entry(1).unwrap().id, "b");
        assert!(reg.entry(2).is_none());
    }
}
