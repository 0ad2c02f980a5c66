//! Host bridge - the only way the panel reaches the outside world
//!
//! The bridge actor writes outbound envelopes to the host and forwards
//! inbound envelopes to the App actor. It performs no HTTP, storage or
//! variable substitution itself.

pub mod actor;
pub mod process;

pub use actor::HostBridge;
