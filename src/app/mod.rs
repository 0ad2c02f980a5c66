//! App layer - central state management and command processing
//!
//! The App actor receives UI events and host envelopes,
//! updates state, and emits outbound envelopes and render state.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::{AppState, PanelState};
pub use actor::AppActor;
