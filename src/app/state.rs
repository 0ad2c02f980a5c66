//! App state - pure data structures with no I/O logic
//!
//! [`PanelState`] is the lifecycle container. Its fields are private; the only
//! way to change it is through the transitions in `commands.rs`, which keeps
//! the response/error exclusion and the dirty flag consistent.

use crate::constants::NO_ENVIRONMENT_LABEL;
use crate::highlight::{self, Highlighted};
use crate::messages::ui_events::{EditTarget, InputMode, Panel, RequestTab, ResponseTab};
use crate::models::{Environment, HttpRequest, HttpResponse};

/// Last settled outcome. Holding it in one enum makes "response and error
/// both set" unrepresentable.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Outcome {
    #[default]
    Empty,
    Response(HttpResponse),
    Error(String),
}

/// Request lifecycle state shared with the host
#[derive(Clone, Debug)]
pub struct PanelState {
    pub(crate) request: HttpRequest,
    pub(crate) is_loading: bool,
    pub(crate) is_dirty: bool,
    pub(crate) outcome: Outcome,
    pub(crate) environments: Vec<Environment>,
    pub(crate) active_environment_id: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::with_request(HttpRequest::default())
    }

    pub fn with_request(request: HttpRequest) -> Self {
        PanelState {
            request,
            is_loading: false,
            is_dirty: false,
            outcome: Outcome::Empty,
            environments: Vec::new(),
            active_environment_id: None,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match &self.outcome {
            Outcome::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn active_environment_id(&self) -> Option<&str> {
        self.active_environment_id.as_deref()
    }

    /// The environment matching the active id. An id with no match is "no selection".
    pub fn active_environment(&self) -> Option<&Environment> {
        let id = self.active_environment_id.as_deref()?;
        self.environments.iter().find(|env| env.id == id)
    }

    pub fn active_environment_label(&self) -> String {
        self.active_environment()
            .map(|env| env.name.clone())
            .unwrap_or_else(|| NO_ENVIRONMENT_LABEL.to_string())
    }

    /// Send is enabled only for a non-empty URL while idle
    pub fn can_send(&self) -> bool {
        self.request.has_url() && !self.is_loading
    }

    /// Cancel is enabled only while a request is in flight
    pub fn can_cancel(&self) -> bool {
        self.is_loading
    }
}

/// Text editor attached to one request field
#[derive(Clone, Debug, PartialEq)]
pub struct EditBuffer {
    pub target: EditTarget,
    pub text: String,
    /// Byte offset, always on a char boundary
    pub cursor: usize,
}

impl EditBuffer {
    pub fn new(target: EditTarget, text: String) -> Self {
        let cursor = text.len();
        EditBuffer { target, text, cursor }
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().last() {
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.text[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    pub fn right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

/// View-local state: focus, tabs and the active editor
#[derive(Clone, Debug)]
pub struct ViewState {
    pub active_panel: Panel,
    pub request_tab: RequestTab,
    pub response_tab: ResponseTab,
    pub input_mode: InputMode,
    pub editor: Option<EditBuffer>,
    pub selected_row: usize,
    pub response_scroll: u16,
    pub show_help: bool,
    /// Highlighted body of the current response, refreshed when it changes
    pub rendered_body: Option<Highlighted>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_panel: Panel::Url,
            request_tab: RequestTab::Params,
            response_tab: ResponseTab::Body,
            input_mode: InputMode::Normal,
            editor: None,
            selected_row: 0,
            response_scroll: 0,
            show_help: false,
            rendered_body: None,
        }
    }
}

/// Main application state - pure data, no I/O
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub panel: PanelState,
    pub view: ViewState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the highlighter after the settled outcome changed
    pub fn refresh_rendered_body(&mut self) {
        self.view.rendered_body = self
            .panel
            .response()
            .map(|response| highlight::render(&response.body, &response.content_type));
        self.view.response_scroll = 0;
    }
}
