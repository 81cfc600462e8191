//! Log entry text formatting.
//!
//! Entries carry a wall-clock stamp, the delta since the previous entry,
//! severity, origin and message:
//!
//! ```text
//! 2026-08-01  14:03:59.102  +0.047  INF  wifi_poll  net/wifi.rs:181  rssi -61
//! ```
//!
//! The delta saturates at `>9.999` so a quiet hour does not widen the
//! column. Timestamps are passed in explicitly — the formatter never reads
//! a clock, which keeps entries reproducible in tests and leaves clock
//! ownership to the integrating firmware.

use core::fmt::Write;

/// Longest formatted entry; longer messages are cut at this bound.
pub const LOG_LINE_MAX: usize = 1024;

const DIFF_SEC_MAX: u32 = 9;
const DIFF_MS_MAX: u32 = 999;

// ── Severity ──────────────────────────────────────────────────

/// Log severities, wire-compatible with the `levelLogSys` filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    Core = 5,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERR",
            Self::Warning => "WRN",
            Self::Info => "INF",
            Self::Debug => "DBG",
            Self::Core => "COR",
        }
    }

    /// Filter value → severity; out-of-range values are rejected.
    pub const fn from_value(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Info),
            4 => Some(Self::Debug),
            5 => Some(Self::Core),
            _ => None,
        }
    }

    /// Mapping for entries arriving through the `log` facade.
    pub const fn from_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Core,
        }
    }
}

// ── Timestamp ─────────────────────────────────────────────────

/// Wall-clock instant, resolved by the integrator's clock source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Milliseconds since local midnight.
    pub ms_of_day: u32,
}

impl Timestamp {
    fn hms(self) -> (u32, u32, u32, u32) {
        let ms = self.ms_of_day % 1000;
        let s = self.ms_of_day / 1000;
        (s / 3600 % 24, s / 60 % 60, s % 60, ms)
    }
}

// ── Formatter ─────────────────────────────────────────────────

/// Stateful entry formatter; tracks the previous entry's stamp for the
/// delta column.
pub struct Formatter {
    prev_ms: u32,
}

impl Formatter {
    pub fn new() -> Self {
        Self { prev_ms: 0 }
    }

    /// Render one entry. Returns the formatted line, truncated at
    /// [`LOG_LINE_MAX`] if needed.
    pub fn entry(
        &mut self,
        ts: Timestamp,
        severity: Severity,
        function: &str,
        file: &str,
        line: u32,
        msg: &str,
    ) -> heapless::String<LOG_LINE_MAX> {
        let (hour, min, sec, ms) = ts.hms();

        let diff = i64::from(ts.ms_of_day) - i64::from(self.prev_ms);
        let (sign, diff_sec, diff_ms) = if (0..=i64::from(DIFF_SEC_MAX * 1000 + DIFF_MS_MAX))
            .contains(&diff)
        {
            ('+', diff as u32 / 1000, diff as u32 % 1000)
        } else {
            ('>', DIFF_SEC_MAX, DIFF_MS_MAX)
        };
        self.prev_ms = ts.ms_of_day;

        let mut out = heapless::String::new();
        // A full line always fits; only an oversized message truncates,
        // in which case the write below stops at the bound.
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}  {:02}:{:02}:{:02}.{:03}  {}{}.{:03}  {}  {}  {}:{}  {}",
            ts.year,
            ts.month,
            ts.day,
            hour,
            min,
            sec,
            ms,
            sign,
            diff_sec,
            diff_ms,
            severity.as_str(),
            function,
            file,
            line,
            msg
        );
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(ms_of_day: u32) -> Timestamp {
        Timestamp {
            year: 2026,
            month: 8,
            day: 1,
            ms_of_day,
        }
    }

    #[test]
    fn entry_layout() {
        let mut f = Formatter::new();
        // First entry since midnight: 14:03:59.102, delta saturated.
        let line = f.entry(
            stamp(50_639_102),
            Severity::Info,
            "wifi_poll",
            "net/wifi.rs",
            181,
            "rssi -61",
        );
        assert_eq!(
            line.as_str(),
            "2026-08-01  14:03:59.102  >9.999  INF  wifi_poll  net/wifi.rs:181  rssi -61"
        );
    }

    #[test]
    fn delta_between_entries() {
        let mut f = Formatter::new();
        let _ = f.entry(stamp(1000), Severity::Info, "a", "x.rs", 1, "first");
        let line = f.entry(stamp(2047), Severity::Info, "a", "x.rs", 2, "second");
        assert!(line.as_str().contains("  +1.047  "));
    }

    #[test]
    fn delta_saturates_past_ten_seconds() {
        let mut f = Formatter::new();
        let _ = f.entry(stamp(0), Severity::Info, "a", "x.rs", 1, "first");
        let line = f.entry(stamp(10_000), Severity::Info, "a", "x.rs", 2, "late");
        assert!(line.as_str().contains("  >9.999  "));
    }

    #[test]
    fn delta_at_exact_bound_is_not_saturated() {
        let mut f = Formatter::new();
        let _ = f.entry(stamp(0), Severity::Info, "a", "x.rs", 1, "first");
        let line = f.entry(stamp(9_999), Severity::Info, "a", "x.rs", 2, "edge");
        assert!(line.as_str().contains("  +9.999  "));
    }

    #[test]
    fn backwards_clock_saturates() {
        let mut f = Formatter::new();
        let _ = f.entry(stamp(5000), Severity::Info, "a", "x.rs", 1, "first");
        let line = f.entry(stamp(100), Severity::Info, "a", "x.rs", 2, "wrapped");
        assert!(line.as_str().contains("  >9.999  "));
    }

    #[test]
    fn severity_strings() {
        assert_eq!(Severity::Error.as_str(), "ERR");
        assert_eq!(Severity::Warning.as_str(), "WRN");
        assert_eq!(Severity::Info.as_str(), "INF");
        assert_eq!(Severity::Debug.as_str(), "DBG");
        assert_eq!(Severity::Core.as_str(), "COR");
    }

    #[test]
    fn severity_from_value_bounds() {
        assert_eq!(Severity::from_value(0), None);
        assert_eq!(Severity::from_value(1), Some(Severity::Error));
        assert_eq!(Severity::from_value(5), Some(Severity::Core));
        assert_eq!(Severity::from_value(6), None);
    }

    #[test]
    fn facade_level_mapping() {
        assert_eq!(Severity::from_level(log::Level::Warn), Severity::Warning);
        assert_eq!(Severity::from_level(log::Level::Trace), Severity::Core);
    }
}
