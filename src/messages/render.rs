//! Render state - snapshot sent from the App layer to the view

use crate::app::state::{AppState, Outcome};
use crate::display::{format_size, format_time, StatusClass};
use crate::highlight::Highlighted;
use crate::key_values::badge;
use crate::messages::ui_events::{EditTarget, InputMode, Panel, RequestTab, ResponseTab};
use crate::models::HttpRequest;

/// One entry of the environment picker
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentOption {
    pub id: String,
    pub name: String,
    pub active_variables: usize,
    pub selected: bool,
}

/// Settled response, formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseView {
    pub status: u16,
    pub status_text: String,
    pub status_class: StatusClass,
    pub time: String,
    pub size: String,
    pub headers: Vec<(String, String)>,
    pub body: Highlighted,
    pub curl_command: String,
}

/// Complete state needed by the view to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Request
    pub request: HttpRequest,
    pub is_dirty: bool,
    pub is_loading: bool,
    pub can_send: bool,
    pub can_cancel: bool,
    pub params_badge: Option<usize>,
    pub headers_badge: Option<usize>,

    // Environments
    pub environments: Vec<EnvironmentOption>,
    pub environment_label: String,

    // Outcome
    pub response: Option<ResponseView>,
    pub error: Option<String>,

    // View
    pub active_panel: Panel,
    pub request_tab: RequestTab,
    pub response_tab: ResponseTab,
    pub input_mode: InputMode,
    pub edit_target: Option<EditTarget>,
    pub cursor_position: usize,
    pub selected_row: usize,
    pub response_scroll: u16,
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        AppState::default().to_render_state()
    }
}

impl RenderState {
    pub fn editing_multiline(&self) -> bool {
        self.edit_target.map_or(false, |target| target.is_multiline())
    }
}

impl AppState {
    /// Convert state to RenderState for the view
    pub fn to_render_state(&self) -> RenderState {
        let panel = &self.panel;
        let request = panel.request();
        let active_id = panel.active_environment_id();

        let (response, error) = match panel.outcome() {
            Outcome::Empty => (None, None),
            Outcome::Response(response) => {
                let view = ResponseView {
                    status: response.status,
                    status_text: response.status_text.clone(),
                    status_class: StatusClass::from_status(response.status),
                    time: format_time(response.time),
                    size: format_size(response.size),
                    headers: response
                        .headers
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    body: self.view.rendered_body.clone().unwrap_or_default(),
                    curl_command: response.curl_command.clone(),
                };
                (Some(view), None)
            }
            Outcome::Error(error) => (None, Some(error.clone())),
        };

        RenderState {
            request: request.clone(),
            is_dirty: panel.is_dirty(),
            is_loading: panel.is_loading(),
            can_send: panel.can_send(),
            can_cancel: panel.can_cancel(),
            params_badge: badge(&request.query_params),
            headers_badge: badge(&request.headers),
            environments: panel
                .environments()
                .iter()
                .map(|env| EnvironmentOption {
                    id: env.id.clone(),
                    name: env.name.clone(),
                    active_variables: env.active_variable_count(),
                    selected: Some(env.id.as_str()) == active_id,
                })
                .collect(),
            environment_label: panel.active_environment_label(),
            response,
            error,
            active_panel: self.view.active_panel,
            request_tab: self.view.request_tab,
            response_tab: self.view.response_tab,
            input_mode: self.view.input_mode,
            edit_target: self.view.editor.as_ref().map(|buf| buf.target),
            cursor_position: self.view.editor.as_ref().map_or(0, |buf| buf.cursor),
            selected_row: self.view.selected_row,
            response_scroll: self.view.response_scroll,
            show_help: self.view.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::InboundMessage;
    use crate::models::{Environment, EnvironmentVariable, HttpResponse, KeyValueItem, RequestEdit, VariableType};

    #[test]
    fn test_badges_count_enabled_rows() {
        let mut app = AppState::new();
        let mut disabled = KeyValueItem::new("b", "2");
        disabled.enabled = false;
        app.panel.edit(RequestEdit::Headers(vec![KeyValueItem::new("a", "1"), disabled.clone()]));
        app.panel.edit(RequestEdit::QueryParams(vec![disabled]));

        let render = app.to_render_state();
        assert_eq!(render.headers_badge, Some(1));
        assert_eq!(render.params_badge, None);
    }

    #[test]
    fn test_environment_options() {
        let mut app = AppState::new();
        let var = |enabled| EnvironmentVariable {
            key: "k".into(),
            value: "v".into(),
            kind: VariableType::Default,
            enabled,
        };
        app.handle_inbound(InboundMessage::LoadEnvironments {
            environments: vec![Environment {
                id: "dev".into(),
                name: "Dev".into(),
                variables: vec![var(true), var(false), var(true)],
                is_active: false,
            }],
            active_id: Some("dev".into()),
        });

        let render = app.to_render_state();
        assert_eq!(render.environment_label, "Dev");
        assert_eq!(render.environments[0].active_variables, 2);
        assert!(render.environments[0].selected);
    }

    #[test]
    fn test_response_view_formatting() {
        let mut app = AppState::new();
        app.handle_inbound(InboundMessage::ResponseReceived {
            response: HttpResponse {
                status: 302,
                status_text: "Found".into(),
                headers: [("location".to_string(), "/x".to_string())].into_iter().collect(),
                body: "moved".into(),
                content_type: "text/plain".into(),
                size: 2048,
                time: 1500.0,
                curl_command: "curl -X GET".into(),
            },
        });

        let view = app.to_render_state().response.unwrap();
        assert_eq!(view.status_class, StatusClass::Redirect);
        assert_eq!(view.time, "1.50 s");
        assert_eq!(view.size, "2.0 KB");
        assert_eq!(view.headers, vec![("location".to_string(), "/x".to_string())]);
        assert_eq!(view.body.display_text(), "moved");
    }

    #[test]
    fn test_outcome_maps_to_exactly_one_field() {
        let mut app = AppState::new();
        let render = app.to_render_state();
        assert!(render.response.is_none() && render.error.is_none());

        app.handle_inbound(InboundMessage::RequestError { error: "timeout".into() });
        let render = app.to_render_state();
        assert!(render.response.is_none());
        assert_eq!(render.error.as_deref(), Some("timeout"));
    }
}
