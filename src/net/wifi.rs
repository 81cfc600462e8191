//! WiFi station supervisor.
//!
//! Three-state bring-up driven by the cooperative tick:
//!
//! ```text
//! Start ──configure──▶ ConnectedWait ──got IP──▶ Main
//!                            ▲                    │
//!                            └──connection lost───┘
//! ```
//!
//! `Start` validates credentials and configures the interface once;
//! `ConnectedWait` paces reconnect attempts until the driver reports an
//! address; `Main` polls RSSI at a fixed cadence and falls back on loss.
//! Reconnects are attempted forever — the retry counter is informational
//! and resets whenever a connection is (re-)established.
//!
//! The ESP-IDF driver lives behind [`StationPort`]; host tests supply a
//! scripted port.

use log::{debug, info, warn};

use crate::config::WifiConfig;
use crate::error::{Result, WifiError};

/// Driver-side surface of the station supervisor.
pub trait StationPort {
    /// Set hostname, register event handlers and start station mode.
    /// Called exactly once.
    fn configure(&mut self, config: &WifiConfig) -> core::result::Result<(), WifiError>;

    /// The interface has an address (set on got-IP, cleared on disconnect).
    fn is_connected(&self) -> bool;

    /// Ask the driver for a (re-)connect attempt.
    fn reconnect(&mut self) -> core::result::Result<(), WifiError>;

    /// Create the IPv6 link-local address once connected. Returns `false`
    /// when the driver refused (non-fatal).
    fn enable_link_local(&mut self) -> bool;

    /// Whether the underlying network interface is administratively up.
    fn interface_up(&self) -> bool;

    /// Current received signal strength (dBm).
    fn rssi(&self) -> i8;

    fn disconnect(&mut self);
    fn stop(&mut self);
    fn deinit(&mut self);
}

enum WifiState {
    Start,
    ConnectedWait,
    Main,
}

/// The station supervisor. Owns its port; stepped from the foreground.
pub struct WifiStation<P: StationPort> {
    port: P,
    config: WifiConfig,
    state: WifiState,
    last_ms: u32,
    retries: u32,
    rssi: i8,
}

impl<P: StationPort> WifiStation<P> {
    pub fn new(port: P, config: WifiConfig) -> Self {
        Self {
            port,
            config,
            state: WifiState::Start,
            last_ms: 0,
            retries: 0,
            rssi: 0,
        }
    }

    /// Reconnect attempts since the last successful connection.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Last RSSI reading (valid while connected).
    pub fn rssi(&self) -> i8 {
        self.rssi
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_connected()
    }

    /// Advance the supervisor. `now_ms` is a monotonic millisecond clock.
    pub fn step(&mut self, now_ms: u32) -> Result<()> {
        match self.state {
            WifiState::Start => {
                if self.config.hostname.is_empty() {
                    return Err(WifiError::CredentialsMissing("network hostname").into());
                }
                if self.config.ssid.is_empty() {
                    return Err(WifiError::CredentialsMissing("WiFi SSID").into());
                }
                if self.config.password.is_empty() {
                    return Err(WifiError::CredentialsMissing("WiFi password").into());
                }

                self.port.configure(&self.config)?;
                debug!("WiFi configured");

                self.last_ms = now_ms;
                self.state = WifiState::ConnectedWait;
            }

            WifiState::ConnectedWait => {
                if !self.port.is_connected() {
                    // Pace reconnect attempts with the poll interval.
                    if now_ms.wrapping_sub(self.last_ms) < self.config.rssi_poll_interval_ms {
                        return Ok(());
                    }
                    self.last_ms = now_ms;

                    self.retries += 1;
                    if self.port.reconnect().is_err() {
                        warn!("WiFi reconnect rejected (attempt {})", self.retries);
                    }
                    return Ok(());
                }

                info!("WiFi connected");
                debug!(
                    "network interface is {}",
                    if self.port.interface_up() { "up" } else { "down" }
                );

                if !self.port.enable_link_local() {
                    warn!("could not create IPv6 linklocal");
                }

                self.retries = 0;
                self.last_ms = now_ms;
                self.state = WifiState::Main;
            }

            WifiState::Main => {
                if now_ms.wrapping_sub(self.last_ms) < self.config.rssi_poll_interval_ms {
                    return Ok(());
                }
                self.last_ms = now_ms;

                if !self.port.is_connected() {
                    debug!("WiFi disconnected. Waiting for reconnect");
                    self.state = WifiState::ConnectedWait;
                    return Ok(());
                }

                self.rssi = self.port.rssi();
            }
        }

        Ok(())
    }

    /// Disconnect, stop station mode and release the driver.
    pub fn shutdown(&mut self) {
        if self.port.is_connected() {
            self.port.disconnect();
        }
        self.port.stop();
        self.port.deinit();
    }
}

// ── Tests ────────────────────────────────────────────────────
