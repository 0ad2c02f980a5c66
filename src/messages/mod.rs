//! Message types for inter-layer communication in the actor-based architecture.
//!
//! Host envelopes cross the process boundary; UI events and render state stay
//! inside the panel between the view and the App layer.

pub mod host;
pub mod ui_events;
pub mod render;

pub use host::{InboundMessage, OutboundMessage};
pub use ui_events::UiEvent;
pub use render::RenderState;
