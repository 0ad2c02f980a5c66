//! UI events - user intents sent from the view to the App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::RequestEdit;

/// Events generated from user input in the view
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Lifecycle intents
    Send,
    Cancel,
    Save,
    SaveAs,
    CopyAsCurl,
    SelectEnvironment(Option<String>),
    CycleEnvironment,
    Edit(RequestEdit),

    // Field shortcuts
    CycleMethod,
    CycleBodyType,
    CycleAuth,
    ToggleApiKeyLocation,
    Rename,

    // Navigation
    NextPanel,
    PrevPanel,
    NextRequestTab,
    PrevRequestTab,
    NextResponseTab,
    NextRow,
    PrevRow,
    ScrollUp,
    ScrollDown,

    // Key/value rows
    AddRow,
    DeleteRow,
    ToggleRow,

    // Input editing
    StartEditing,
    StopEditing,
    NextField,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable panel
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Url,
    Editor,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Url => Panel::Editor,
            Panel::Editor => Panel::Response,
            Panel::Response => Panel::Url,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Url => Panel::Response,
            Panel::Editor => Panel::Url,
            Panel::Response => Panel::Editor,
        }
    }
}

/// Request editor tabs
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RequestTab {
    Params,
    Headers,
    Body,
    Auth,
}

impl RequestTab {
    pub const ALL: [RequestTab; 4] = [
        RequestTab::Params,
        RequestTab::Headers,
        RequestTab::Body,
        RequestTab::Auth,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RequestTab::Params => "Params",
            RequestTab::Headers => "Headers",
            RequestTab::Body => "Body",
            RequestTab::Auth => "Auth",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RequestTab::Params => 0,
            RequestTab::Headers => 1,
            RequestTab::Body => 2,
            RequestTab::Auth => 3,
        }
    }

    pub fn next(&self) -> RequestTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> RequestTab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Response viewer tabs
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResponseTab {
    Body,
    Headers,
    Curl,
}

impl ResponseTab {
    pub fn next(&self) -> ResponseTab {
        match self {
            ResponseTab::Body => ResponseTab::Headers,
            ResponseTab::Headers => ResponseTab::Curl,
            ResponseTab::Curl => ResponseTab::Body,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Credential field of the auth editor
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthField {
    Username,
    Password,
    Token,
    KeyName,
    KeyValue,
}

/// Request field bound to the text editor
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditTarget {
    Name,
    Url,
    Body,
    ParamKey(usize),
    ParamValue(usize),
    HeaderKey(usize),
    HeaderValue(usize),
    Auth(AuthField),
}

impl EditTarget {
    /// Field the Tab key moves to while editing
    pub fn next_field(&self) -> EditTarget {
        match *self {
            EditTarget::ParamKey(i) => EditTarget::ParamValue(i),
            EditTarget::ParamValue(i) => EditTarget::ParamKey(i),
            EditTarget::HeaderKey(i) => EditTarget::HeaderValue(i),
            EditTarget::HeaderValue(i) => EditTarget::HeaderKey(i),
            EditTarget::Auth(AuthField::Username) => EditTarget::Auth(AuthField::Password),
            EditTarget::Auth(AuthField::Password) => EditTarget::Auth(AuthField::Username),
            EditTarget::Auth(AuthField::KeyName) => EditTarget::Auth(AuthField::KeyValue),
            EditTarget::Auth(AuthField::KeyValue) => EditTarget::Auth(AuthField::KeyName),
            other => other,
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, EditTarget::Body)
    }
}

/// Convert a key event to a UiEvent based on current view context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    request_tab: RequestTab,
    input_mode: InputMode,
    editing_multiline: bool,
    show_help: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return Some(UiEvent::Cancel),
            KeyCode::Char('s') => return Some(UiEvent::Save),
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            _ => {}
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Enter if editing_multiline => Some(UiEvent::CharInput('\n')),
            KeyCode::Enter if active_panel == Panel::Url => Some(UiEvent::Send),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => {
            let global = match key.code {
                KeyCode::Char('q') => Some(UiEvent::Quit),
                KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
                KeyCode::Tab => Some(UiEvent::NextPanel),
                KeyCode::BackTab => Some(UiEvent::PrevPanel),
                KeyCode::Char('s') => Some(UiEvent::Send),
                KeyCode::Char('x') => Some(UiEvent::Cancel),
                KeyCode::Char('S') => Some(UiEvent::SaveAs),
                KeyCode::Char('c') => Some(UiEvent::CopyAsCurl),
                KeyCode::Char('v') => Some(UiEvent::CycleEnvironment),
                KeyCode::Char('m') => Some(UiEvent::CycleMethod),
                KeyCode::Char('r') => Some(UiEvent::Rename),
                _ => None,
            };
            if global.is_some() {
                return global;
            }

            match active_panel {
                Panel::Url => match key.code {
                    KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
                    _ => None,
                },
                Panel::Editor => editor_keys(key, request_tab),
                Panel::Response => match key.code {
                    KeyCode::Up => Some(UiEvent::ScrollUp),
                    KeyCode::Down => Some(UiEvent::ScrollDown),
                    KeyCode::Char(']') => Some(UiEvent::NextResponseTab),
                    _ => None,
                },
            }
        }
    }
}

fn editor_keys(key: KeyEvent, request_tab: RequestTab) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char(']') => return Some(UiEvent::NextRequestTab),
        KeyCode::Char('[') => return Some(UiEvent::PrevRequestTab),
        KeyCode::Char('e') | KeyCode::Enter => return Some(UiEvent::StartEditing),
        _ => {}
    }

    match request_tab {
        RequestTab::Params | RequestTab::Headers => match key.code {
            KeyCode::Up => Some(UiEvent::PrevRow),
            KeyCode::Down => Some(UiEvent::NextRow),
            KeyCode::Char('a') => Some(UiEvent::AddRow),
            KeyCode::Char('d') => Some(UiEvent::DeleteRow),
            KeyCode::Char(' ') => Some(UiEvent::ToggleRow),
            _ => None,
        },
        RequestTab::Body => match key.code {
            KeyCode::Char('t') => Some(UiEvent::CycleBodyType),
            _ => None,
        },
        RequestTab::Auth => match key.code {
            KeyCode::Char('t') => Some(UiEvent::CycleAuth),
            KeyCode::Char('l') => Some(UiEvent::ToggleApiKeyLocation),
            _ => None,
        },
    }
}
