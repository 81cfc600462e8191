//! Connectivity collaborators (not part of the wire protocol).

pub mod wifi;

pub use wifi::{StationPort, WifiStation};
