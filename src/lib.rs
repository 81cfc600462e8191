//! Single-wire debug transport and command dispatch.
//!
//! Instruments embedded firmware over one serial link shared with a host
//! scheduler: command replies, log entries and process-tree snapshots are
//! multiplexed outbound, commands inbound, under strict half-duplex
//! turn-taking owned by the host.
//!
//! All protocol logic is hardware-free and tested on the host; the
//! ESP-IDF UART and WiFi adapters are guarded by the `espidf` feature.

#![deny(unused_must_use)]

pub mod config;
pub mod debug;
pub mod net;
pub mod tree;
pub mod wire;

mod error;

pub mod adapters;

pub use error::{Error, RegistryError, Result, WifiError};
