//! Request Panel - actor-based request editor driven by a host process
//!
//! Architecture:
//! - View Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - request lifecycle state machine
//! - Bridge Layer (Tokio) - JSON-line envelopes to and from the host process

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use request_panel::config::PanelConfig;
use request_panel::constants::{APP_NAME, APP_VERSION};
use request_panel::messages::ui_events::{key_to_ui_event, AuthField, EditTarget, InputMode, Panel, RequestTab, ResponseTab};
use request_panel::messages::{InboundMessage, OutboundMessage, RenderState, UiEvent};
use request_panel::models::{ApiKeyLocation, HttpAuth};
use request_panel::ui::{highlighted_lines, method_color, render_key_value_list, render_tabs, status_color, tab_title};
use request_panel::{AppActor, HostBridge};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PanelConfig::load()?;
    config.validate()?;

    // Initialize logging to file
    let log_dir = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let log_name = config
        .log_file
        .file_name()
        .context("log_file must name a file")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(version = APP_VERSION, host = %config.host_command, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<InboundMessage>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn host bridge
    let bridge_config = config.clone();
    tokio::spawn(async move {
        if let Err(e) = HostBridge::new(inbound_tx).run_process(&bridge_config, outbound_rx).await {
            tracing::error!(error = %e, "Host bridge terminated");
        }
    });

    // Spawn app actor
    let app_actor = AppActor::new(outbound_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, inbound_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.request_tab,
                    current_state.input_mode,
                    current_state.editing_multiline(),
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Length(3),  // Method + URL
            Constraint::Length(10), // Params/Headers/Body/Auth
            Constraint::Min(5),     // Response
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);
    draw_url_bar(f, state, chunks[1]);
    draw_editor(f, state, chunks[2]);
    draw_response(f, state, chunks[3]);
    draw_status_bar(f, state, chunks[4]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let editing_name = state.edit_target == Some(EditTarget::Name);
    let name_style = if editing_name {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", state.request.name), name_style),
        Span::styled(
            if state.is_dirty { " *" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Env: {}", state.environment_label),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!(" ({} available)", state.environments.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn focus_style(state: &RenderState, panel: Panel) -> Style {
    if state.active_panel != panel {
        Style::default()
    } else if state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let method = state.request.method;
    let loading = if state.is_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(state, Panel::Url))
        .title(format!(" {}{} ", method.as_str(), loading))
        .title_style(Style::default().fg(method_color(method)).bold());

    let url = if state.request.url.is_empty() && state.edit_target != Some(EditTarget::Url) {
        Paragraph::new("Enter a URL (e to edit)").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(state.request.url.as_str())
    };
    f.render_widget(url.block(block), area);

    // Cursor
    if state.edit_target == Some(EditTarget::Url) {
        let prefix = state.request.url.get(..state.cursor_position).unwrap_or(state.request.url.as_str());
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + prefix.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_editor(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let titles = RequestTab::ALL
        .iter()
        .map(|tab| match tab {
            RequestTab::Params => tab_title(tab.title(), state.params_badge),
            RequestTab::Headers => tab_title(tab.title(), state.headers_badge),
            _ => tab.title().to_string(),
        })
        .collect();
    f.render_widget(render_tabs(titles, state.request_tab.index()), chunks[0]);

    let is_focused = state.active_panel == Panel::Editor;
    let selected = is_focused.then_some(state.selected_row);

    match state.request_tab {
        RequestTab::Params => {
            let list = render_key_value_list(&state.request.query_params, " Query Params (a/d/space) ", selected, is_focused);
            f.render_widget(list, chunks[1]);
        }
        RequestTab::Headers => {
            let list = render_key_value_list(&state.request.headers, " Headers (a/d/space) ", selected, is_focused);
            f.render_widget(list, chunks[1]);
        }
        RequestTab::Body => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(state, Panel::Editor))
                .title(format!(" Body: {} (t=type) ", state.request.body.kind.as_str()));
            let body = Paragraph::new(state.request.body.content.as_str())
                .block(block)
                .wrap(Wrap { trim: false });
            f.render_widget(body, chunks[1]);
        }
        RequestTab::Auth => draw_auth(f, state, chunks[1]),
    }
}

fn draw_auth(f: &mut Frame, state: &RenderState, area: Rect) {
    let field_line = |label: &str, value: &str, field: AuthField| {
        let style = if state.edit_target == Some(EditTarget::Auth(field)) {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), style),
        ])
    };

    let lines = match &state.request.auth {
        HttpAuth::None => vec![Line::from("No authentication (t to change)")],
        HttpAuth::Basic { username, password } => vec![
            field_line("Username", username, AuthField::Username),
            field_line("Password", &"*".repeat(password.chars().count()), AuthField::Password),
        ],
        HttpAuth::Bearer { token } => vec![field_line("Token", token, AuthField::Token)],
        HttpAuth::ApiKey { name, value, location } => vec![
            field_line("Name", name, AuthField::KeyName),
            field_line("Value", value, AuthField::KeyValue),
            Line::from(format!(
                "Add to    {} (l to switch)",
                match location {
                    ApiKeyLocation::Header => "header",
                    ApiKeyLocation::Query => "query",
                }
            )),
        ],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(state, Panel::Editor))
        .title(format!(" Auth: {} (t=type) ", state.request.auth.as_str()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(state, Panel::Response));

    let lines: Vec<Line> = if state.is_loading {
        block = block.title(" Response ");
        vec![Line::from(Span::styled("Sending request... (x to cancel)", Style::default().fg(Color::Yellow)))]
    } else if let Some(error) = &state.error {
        block = block.title(Span::styled(" Error ", Style::default().fg(Color::Red).bold()));
        error.lines().map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Red)))).collect()
    } else if let Some(response) = &state.response {
        let tab = match state.response_tab {
            ResponseTab::Body => "Body",
            ResponseTab::Headers => "Headers",
            ResponseTab::Curl => "cURL",
        };
        block = block
            .title(Span::styled(
                format!(" {} {} ", response.status, response.status_text),
                Style::default().fg(status_color(response.status_class)).bold(),
            ))
            .title(format!(" [{}] ", tab))
            .title_bottom(Line::from(format!(" {} | {} ", response.time, response.size)).right_aligned());

        match state.response_tab {
            ResponseTab::Body => highlighted_lines(&response.body),
            ResponseTab::Headers => response
                .headers
                .iter()
                .map(|(k, v)| {
                    Line::from(vec![
                        Span::styled(format!("{}: ", k), Style::default().fg(Color::Cyan)),
                        Span::raw(v.clone()),
                    ])
                })
                .collect(),
            ResponseTab::Curl => response.curl_command.lines().map(|l| Line::from(l.to_string())).collect(),
        }
    } else {
        block = block.title(" Response ");
        vec![Line::from(Span::styled(
            "Press 's' to send the request.",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... x:cancel "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field "
    } else if state.can_send {
        " Tab:panel | e:edit | m:method | s:send | Ctrl+S:save | v:env | ?:help | q:quit "
    } else {
        " Tab:panel | e:edit | m:method | Ctrl+S:save | v:env | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 REQUEST PANEL - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   [ / ]              Switch editor tab
   ]                  Switch response tab (response panel)
   ↑ / ↓              Scroll response / select row

 REQUEST
   m                  Cycle HTTP method
   r                  Rename request
   s / Enter          Send request (Enter while editing URL)
   x / Ctrl+X         Cancel request
   Ctrl+S / S         Save / Save As
   c                  Copy as cURL
   v                  Next environment

 PARAMS / HEADERS
   a / d / space      Add / delete / toggle row
   e                  Edit row (Tab: key/value)

 BODY / AUTH
   t                  Cycle body or auth type
   l                  Switch API key location

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
