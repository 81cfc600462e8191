//! System configuration parameters
//!
//! All tunable parameters for the debug transport and the WiFi station.
//! Buffer capacities are compile-time constants in [`crate::wire`]; this
//! module holds everything that can change per deployment.

use serde::{Deserialize, Serialize};

/// Debug transport / dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Token that toggles debug mode on the target. While debug mode is
    /// off the target answers no command except this toggle.
    pub debug_key: heapless::String<16>,
    /// Initial log severity filter (1=ERR .. 5=COR); entries above it are
    /// dropped before they reach the log slot.
    pub log_level: u8,
    /// Synchronous transfer: the arbiter busy-waits transmit completion
    /// and log entries are pushed to the host immediately on enqueue.
    pub synced_transfer: bool,
    /// Ticks between process-tree snapshots while debug mode is on.
    pub proc_refresh_ticks: u16,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let mut key = heapless::String::new();
        let _ = key.push_str("aaaaa");
        Self {
            debug_key: key,
            log_level: 2,
            synced_transfer: false,
            proc_refresh_ticks: 5000,
        }
    }
}

/// WiFi station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiConfig {
    /// Network hostname announced to the access point.
    pub hostname: heapless::String<32>,
    /// Station SSID.
    pub ssid: heapless::String<32>,
    /// Station password.
    pub password: heapless::String<64>,
    /// RSSI poll interval while connected (milliseconds).
    pub rssi_poll_interval_ms: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        let mut hostname = heapless::String::new();
        let _ = hostname.push_str("singlewire-target");
        Self {
            hostname,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            rssi_poll_interval_ms: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_contract() {
        let cfg = DebugConfig::default();
        assert_eq!(cfg.debug_key.as_str(), "aaaaa");
        assert_eq!(cfg.log_level, 2);
        assert!(!cfg.synced_transfer);
        assert_eq!(cfg.proc_refresh_ticks, 5000);
    }

    #[test]
    fn wifi_defaults_empty_credentials() {
        let cfg = WifiConfig::default();
        assert!(cfg.ssid.is_empty());
        assert!(cfg.password.is_empty());
        assert_eq!(cfg.rssi_poll_interval_ms, 200);
    }
}
