//! Command handlers - the request lifecycle transitions and the view logic built on them

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app::state::{AppState, EditBuffer, Outcome, PanelState};
use crate::key_values::{KeyValueField, KeyValueOp};
use crate::messages::ui_events::{AuthField, EditTarget, InputMode, Panel, RequestTab, UiEvent};
use crate::messages::{InboundMessage, OutboundMessage};
use crate::models::{ApiKeyLocation, HttpAuth, HttpBody, HttpRequest, RequestEdit};

impl PanelState {
    // ========================
    // Host messages
    // ========================

    /// Apply one inbound envelope. This is the only place host messages touch state.
    pub fn handle_inbound(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::LoadRequest { request } => {
                info!(id = %request.id, name = %request.name, "Request loaded");
                self.request = request;
                self.is_dirty = false;
                self.outcome = Outcome::Empty;
            }
            InboundMessage::RequestStarted => {
                self.is_loading = true;
                self.outcome = Outcome::Empty;
            }
            InboundMessage::ResponseReceived { response } => {
                info!(status = response.status, time_ms = response.time, size = response.size, "Response received");
                self.is_loading = false;
                self.outcome = Outcome::Response(response);
            }
            InboundMessage::RequestError { error } => {
                info!(%error, "Request failed");
                self.is_loading = false;
                self.outcome = Outcome::Error(error);
            }
            InboundMessage::RequestCancelled => {
                // Only ever clears loading; the last outcome stays
                self.is_loading = false;
            }
            InboundMessage::RequestSaved => {
                self.is_dirty = false;
            }
            InboundMessage::LoadEnvironments { environments, active_id } => {
                debug!(count = environments.len(), active = ?active_id, "Environments loaded");
                self.environments = environments;
                self.active_environment_id = active_id;
            }
            InboundMessage::Unknown => {
                debug!("Ignoring unknown host message");
            }
        }
    }

    // ========================
    // User intents
    // ========================

    /// Dispatch the current request. Ignored while loading or with an empty URL.
    pub fn send(&self) -> Option<OutboundMessage> {
        if !self.can_send() {
            debug!(loading = self.is_loading, "Send ignored");
            return None;
        }
        Some(OutboundMessage::SendRequest {
            request: self.request.clone(),
        })
    }

    /// Ask the host to cancel. Loading is cleared locally without waiting for the host.
    pub fn cancel(&mut self) -> Option<OutboundMessage> {
        if !self.can_cancel() {
            debug!("Cancel ignored while idle");
            return None;
        }
        self.is_loading = false;
        Some(OutboundMessage::CancelRequest)
    }

    /// Save, or Save As when `save_as` is set. The dirty flag waits for `requestSaved`.
    pub fn save(&self, save_as: bool) -> Option<OutboundMessage> {
        Some(OutboundMessage::SaveRequest {
            request: self.request.clone(),
            save_as: save_as.then_some(true),
        })
    }

    pub fn copy_as_curl(&self) -> Option<OutboundMessage> {
        Some(OutboundMessage::CopyAsCurl {
            request: self.request.clone(),
        })
    }

    /// Request an environment switch. Local state changes only when the host echoes `loadEnvironments`.
    pub fn select_environment(&self, environment_id: Option<String>) -> OutboundMessage {
        OutboundMessage::SelectEnvironment { environment_id }
    }

    /// The single mutation point for request fields
    pub fn edit(&mut self, edit: RequestEdit) {
        self.edit_at(edit, Utc::now());
    }

    pub fn edit_at(&mut self, edit: RequestEdit, now: DateTime<Utc>) {
        debug!(field = edit.field_name(), "Request edited");
        self.request = self.request.with_edit(edit, now);
        self.is_dirty = true;
    }

    /// Environment ids in selection order, starting with "No Environment"
    fn environment_choices(&self) -> Vec<Option<String>> {
        std::iter::once(None)
            .chain(self.environments.iter().map(|env| Some(env.id.clone())))
            .collect()
    }

    /// The choice after the current one, wrapping around
    pub fn next_environment_choice(&self) -> Option<String> {
        let choices = self.environment_choices();
        let current = choices
            .iter()
            .position(|choice| choice.is_some() && choice.as_deref() == self.active_environment_id())
            .unwrap_or(0);
        choices[(current + 1) % choices.len()].clone()
    }
}

// ========================
// Field binding helpers
// ========================

/// Current text of the field an editor is bound to
fn field_value(request: &HttpRequest, target: EditTarget) -> Option<String> {
    match target {
        EditTarget::Name => Some(request.name.clone()),
        EditTarget::Url => Some(request.url.clone()),
        EditTarget::Body => Some(request.body.content.clone()),
        EditTarget::ParamKey(i) => request.query_params.get(i).map(|p| p.key.clone()),
        EditTarget::ParamValue(i) => request.query_params.get(i).map(|p| p.value.clone()),
        EditTarget::HeaderKey(i) => request.headers.get(i).map(|h| h.key.clone()),
        EditTarget::HeaderValue(i) => request.headers.get(i).map(|h| h.value.clone()),
        EditTarget::Auth(field) => match (&request.auth, field) {
            (HttpAuth::Basic { username, .. }, AuthField::Username) => Some(username.clone()),
            (HttpAuth::Basic { password, .. }, AuthField::Password) => Some(password.clone()),
            (HttpAuth::Bearer { token }, AuthField::Token) => Some(token.clone()),
            (HttpAuth::ApiKey { name, .. }, AuthField::KeyName) => Some(name.clone()),
            (HttpAuth::ApiKey { value, .. }, AuthField::KeyValue) => Some(value.clone()),
            _ => None,
        },
    }
}

/// Edit that writes `text` into the bound field
fn field_edit(request: &HttpRequest, target: EditTarget, text: String) -> Option<RequestEdit> {
    let edit = match target {
        EditTarget::Name => RequestEdit::Name(text),
        EditTarget::Url => RequestEdit::Url(text),
        EditTarget::Body => RequestEdit::Body(HttpBody::new(request.body.kind, text)),
        EditTarget::ParamKey(i) => RequestEdit::query_params(request, KeyValueOp::Update(i, KeyValueField::Key(text))),
        EditTarget::ParamValue(i) => RequestEdit::query_params(request, KeyValueOp::Update(i, KeyValueField::Value(text))),
        EditTarget::HeaderKey(i) => RequestEdit::headers(request, KeyValueOp::Update(i, KeyValueField::Key(text))),
        EditTarget::HeaderValue(i) => RequestEdit::headers(request, KeyValueOp::Update(i, KeyValueField::Value(text))),
        EditTarget::Auth(field) => {
            let auth = match (request.auth.clone(), field) {
                (HttpAuth::Basic { password, .. }, AuthField::Username) => HttpAuth::Basic { username: text, password },
                (HttpAuth::Basic { username, .. }, AuthField::Password) => HttpAuth::Basic { username, password: text },
                (HttpAuth::Bearer { .. }, AuthField::Token) => HttpAuth::Bearer { token: text },
                (HttpAuth::ApiKey { value, location, .. }, AuthField::KeyName) => HttpAuth::ApiKey { name: text, value, location },
                (HttpAuth::ApiKey { name, location, .. }, AuthField::KeyValue) => HttpAuth::ApiKey { name, value: text, location },
                _ => return None,
            };
            RequestEdit::Auth(auth)
        }
    };
    Some(edit)
}

fn first_auth_field(auth: &HttpAuth) -> Option<AuthField> {
    match auth {
        HttpAuth::None => None,
        HttpAuth::Basic { .. } => Some(AuthField::Username),
        HttpAuth::Bearer { .. } => Some(AuthField::Token),
        HttpAuth::ApiKey { .. } => Some(AuthField::KeyName),
    }
}

impl AppState {
    // ========================
    // Event dispatch
    // ========================

    /// Apply an inbound envelope and keep derived view state in step
    pub fn handle_inbound(&mut self, message: InboundMessage) {
        let refresh = matches!(
            message,
            InboundMessage::LoadRequest { .. }
                | InboundMessage::RequestStarted
                | InboundMessage::ResponseReceived { .. }
                | InboundMessage::RequestError { .. }
        );
        let replaces_request = matches!(message, InboundMessage::LoadRequest { .. });

        self.panel.handle_inbound(message);

        if replaces_request {
            self.stop_editing();
            self.view.selected_row = 0;
        }
        if refresh {
            self.refresh_rendered_body();
        }
    }

    /// Handle a user event, returning the envelope to send to the host, if any
    pub fn handle_ui_event(&mut self, event: UiEvent) -> Option<OutboundMessage> {
        match event {
            UiEvent::Send => {
                self.stop_editing();
                return self.panel.send();
            }
            UiEvent::Cancel => return self.panel.cancel(),
            UiEvent::Save => return self.panel.save(false),
            UiEvent::SaveAs => return self.panel.save(true),
            UiEvent::CopyAsCurl => return self.panel.copy_as_curl(),
            UiEvent::SelectEnvironment(id) => return Some(self.panel.select_environment(id)),
            UiEvent::CycleEnvironment => {
                let next = self.panel.next_environment_choice();
                return Some(self.panel.select_environment(next));
            }
            UiEvent::Edit(edit) => self.panel.edit(edit),

            UiEvent::CycleMethod => {
                let method = self.panel.request().method.next();
                self.panel.edit(RequestEdit::Method(method));
            }
            UiEvent::CycleBodyType => {
                let body = &self.panel.request().body;
                let next = HttpBody::new(body.kind.next(), body.content.clone());
                self.panel.edit(RequestEdit::Body(next));
            }
            UiEvent::CycleAuth => {
                let auth = self.panel.request().auth.cycle();
                self.panel.edit(RequestEdit::Auth(auth));
            }
            UiEvent::ToggleApiKeyLocation => self.toggle_api_key_location(),
            UiEvent::Rename => self.begin_edit(EditTarget::Name),

            UiEvent::NextPanel => self.view.active_panel = self.view.active_panel.next(),
            UiEvent::PrevPanel => self.view.active_panel = self.view.active_panel.prev(),
            UiEvent::NextRequestTab => self.switch_request_tab(self.view.request_tab.next()),
            UiEvent::PrevRequestTab => self.switch_request_tab(self.view.request_tab.prev()),
            UiEvent::NextResponseTab => self.view.response_tab = self.view.response_tab.next(),
            UiEvent::NextRow => self.move_row(1),
            UiEvent::PrevRow => self.move_row(-1),
            UiEvent::ScrollUp => self.view.response_scroll = self.view.response_scroll.saturating_sub(1),
            UiEvent::ScrollDown => self.view.response_scroll = self.view.response_scroll.saturating_add(1),

            UiEvent::AddRow => self.add_row(),
            UiEvent::DeleteRow => self.apply_row_op(KeyValueOp::Delete(self.view.selected_row)),
            UiEvent::ToggleRow => self.apply_row_op(KeyValueOp::Toggle(self.view.selected_row)),

            UiEvent::StartEditing => self.start_editing(),
            UiEvent::StopEditing => self.stop_editing(),
            UiEvent::NextField => self.next_field(),
            UiEvent::CharInput(c) => self.edit_buffer(|buf| buf.insert(c)),
            UiEvent::Backspace => self.edit_buffer(EditBuffer::backspace),
            UiEvent::CursorLeft => self.move_cursor(EditBuffer::left),
            UiEvent::CursorRight => self.move_cursor(EditBuffer::right),

            UiEvent::ToggleHelp => self.view.show_help = !self.view.show_help,
            UiEvent::CloseHelp => self.view.show_help = false,

            UiEvent::Quit => {}
        }
        None
    }

    // ========================
    // Key/value rows
    // ========================

    fn row_count(&self) -> usize {
        let request = self.panel.request();
        match self.view.request_tab {
            RequestTab::Params => request.query_params.len(),
            RequestTab::Headers => request.headers.len(),
            _ => 0,
        }
    }

    fn switch_request_tab(&mut self, tab: RequestTab) {
        self.view.request_tab = tab;
        self.view.selected_row = 0;
    }

    fn move_row(&mut self, delta: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        self.view.selected_row = (self.view.selected_row as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn apply_row_op(&mut self, op: KeyValueOp) {
        let request = self.panel.request();
        let edit = match self.view.request_tab {
            RequestTab::Params => RequestEdit::query_params(request, op),
            RequestTab::Headers => RequestEdit::headers(request, op),
            _ => return,
        };
        self.panel.edit(edit);
        self.view.selected_row = self.view.selected_row.min(self.row_count().saturating_sub(1));
    }

    fn add_row(&mut self) {
        self.apply_row_op(KeyValueOp::Add);
        self.view.selected_row = self.row_count().saturating_sub(1);
    }

    // ========================
    // Auth
    // ========================

    fn toggle_api_key_location(&mut self) {
        if let HttpAuth::ApiKey { name, value, location } = self.panel.request().auth.clone() {
            let location = match location {
                ApiKeyLocation::Header => ApiKeyLocation::Query,
                ApiKeyLocation::Query => ApiKeyLocation::Header,
            };
            self.panel.edit(RequestEdit::Auth(HttpAuth::ApiKey { name, value, location }));
        }
    }

    // ========================
    // Text editing
    // ========================

    /// Field the editor would bind to for the focused panel and tab
    fn focused_target(&mut self) -> Option<EditTarget> {
        match self.view.active_panel {
            Panel::Url => Some(EditTarget::Url),
            Panel::Response => None,
            Panel::Editor => match self.view.request_tab {
                RequestTab::Params | RequestTab::Headers => {
                    if self.row_count() == 0 {
                        self.add_row();
                    }
                    let row = self.view.selected_row;
                    Some(match self.view.request_tab {
                        RequestTab::Params => EditTarget::ParamKey(row),
                        _ => EditTarget::HeaderKey(row),
                    })
                }
                RequestTab::Body => Some(EditTarget::Body),
                RequestTab::Auth => first_auth_field(&self.panel.request().auth).map(EditTarget::Auth),
            },
        }
    }

    fn start_editing(&mut self) {
        if let Some(target) = self.focused_target() {
            self.begin_edit(target);
        }
    }

    fn begin_edit(&mut self, target: EditTarget) {
        if let Some(text) = field_value(self.panel.request(), target) {
            self.view.editor = Some(EditBuffer::new(target, text));
            self.view.input_mode = InputMode::Editing;
        }
    }

    fn stop_editing(&mut self) {
        self.view.editor = None;
        self.view.input_mode = InputMode::Normal;
    }

    fn next_field(&mut self) {
        if let Some(target) = self.view.editor.as_ref().map(|buf| buf.target.next_field()) {
            self.begin_edit(target);
        }
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut EditBuffer)) {
        if let Some(buf) = self.view.editor.as_mut() {
            f(buf);
        }
    }

    /// Change the buffer and push the new text through the request edit point
    fn edit_buffer(&mut self, f: impl FnOnce(&mut EditBuffer)) {
        let Some(buf) = self.view.editor.as_mut() else {
            return;
        };
        f(buf);
        let (target, text) = (buf.target, buf.text.clone());
        if let Some(edit) = field_edit(self.panel.request(), target, text) {
            self.panel.edit(edit);
        }
    }
}
