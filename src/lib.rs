//! # Request Panel
//!
//! The client side of a request editor panel embedded in a host process.
//! The panel never performs network or file I/O: every effect (send, save,
//! cancel, environment switch) is relayed to the host as a message, and every
//! result comes back the same way.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS
//! - Query params and headers with enable toggles
//! - Body kinds: json, raw, form-urlencoded, form-data
//! - Auth: Basic, Bearer, API key
//! - Environment selection (host owned)
//! - Safe JSON syntax highlighting of untrusted response bodies
//!
//! ## Architecture
//! Actor-based with channels:
//! - View Layer (Ratatui) - synchronous
//! - App Layer (request lifecycle state machine)
//! - Bridge Layer (host process, JSON lines over stdio)

pub mod constants;
pub mod config;
pub mod models;
pub mod key_values;
pub mod highlight;
pub mod display;
pub mod ui;
pub mod messages;
pub mod app;
pub mod bridge;

// Re-export commonly used types
pub use models::{Environment, HttpAuth, HttpBody, HttpMethod, HttpRequest, HttpResponse, KeyValueItem, RequestEdit};
pub use highlight::{render as render_body, Highlighted};
pub use messages::{InboundMessage, OutboundMessage, RenderState, UiEvent};
pub use app::{AppActor, AppState, PanelState};
pub use bridge::HostBridge;
pub use config::PanelConfig;
