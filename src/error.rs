//! Unified error types for the singlewire crate.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level tick loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed out of `step()`
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A transport or dispatcher instance was started twice, or started
    /// out of order. The message names the violated precondition.
    Init(&'static str),
    /// Command registration failed.
    Registry(RegistryError),
    /// WiFi station bring-up failed.
    Wifi(WifiError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Wifi(e) => write!(f, "wifi: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Command registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// All command slots are occupied.
    TableFull,
    /// Identifier is empty, too long for the command buffer, or contains
    /// the reserved `|` help-field separator.
    InvalidId,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableFull => write!(f, "command table full"),
            Self::InvalidId => write!(f, "invalid command id"),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// WiFi errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    /// Hostname, SSID or password missing before start.
    CredentialsMissing(&'static str),
    /// Interface configuration or station start failed.
    ConfigureFailed,
    /// The station driver rejected a reconnect request.
    ReconnectFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialsMissing(what) => write!(f, "{what} not set"),
            Self::ConfigureFailed => write!(f, "could not configure WiFi"),
            Self::ReconnectFailed => write!(f, "reconnect rejected"),
        }
    }
}

impl From<WifiError> for Error {
    fn from(e: WifiError) -> Self {
        Self::Wifi(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
