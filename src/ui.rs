use ratatui::{prelude::*, widgets::*};

use crate::display::StatusClass;
use crate::highlight::{Highlighted, TokenKind};
use crate::models::{HttpMethod, KeyValueItem};

/// Renders a key-value list (headers, query params)
pub fn render_key_value_list<'a>(
    items: &'a [KeyValueItem],
    title: &'a str,
    selected: Option<usize>,
    is_focused: bool,
) -> List<'a> {
    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if !item.enabled {
                Style::default().fg(Color::DarkGray)
            } else if Some(i) == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };

            let marker = if Some(i) == selected { ">" } else { " " };
            let prefix = if item.enabled { "[x]" } else { "[ ]" };
            ListItem::new(format!("{}{} {}: {}", marker, prefix, item.key, item.value)).style(style)
        })
        .collect();

    let border_style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    )
}

/// Renders tabs
pub fn render_tabs<'a>(titles: Vec<String>, selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.into_iter().map(Line::from).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Tab title with its badge, the badge hidden when nothing is enabled
pub fn tab_title(title: &str, badge: Option<usize>) -> String {
    match badge {
        Some(n) => format!("{} ({})", title, n),
        None => title.to_string(),
    }
}

fn token_style(kind: Option<TokenKind>) -> Style {
    match kind {
        Some(TokenKind::Key) => Style::default().fg(Color::Cyan),
        Some(TokenKind::String) => Style::default().fg(Color::Green),
        Some(TokenKind::Number) => Style::default().fg(Color::Yellow),
        Some(TokenKind::Boolean) | Some(TokenKind::Null) => Style::default().fg(Color::Magenta),
        Some(TokenKind::Punctuation) => Style::default().fg(Color::White),
        None => Style::default(),
    }
}

/// Turn highlighted segments into styled terminal lines
pub fn highlighted_lines(body: &Highlighted) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for segment in &body.segments {
        let style = token_style(segment.kind);
        let text = segment.display_text();
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    lines
}

/// Status badge color
pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Green,
        StatusClass::Redirect => Color::Cyan,
        StatusClass::ClientError => Color::Red,
        StatusClass::ServerError => Color::Magenta,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        HttpMethod::HEAD | HttpMethod::OPTIONS => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::render;

    #[test]
    fn test_highlighted_lines_split_on_newlines() {
        let body = render(r#"{"a":"<b>"}"#, "application/json");
        let lines = highlighted_lines(&body);
        assert_eq!(lines.len(), 3);

        let middle: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(middle, "  \"a\": \"<b>\"");
        assert_eq!(lines[1].spans[1].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_tab_title_hides_zero_badge() {
        assert_eq!(tab_title("Headers", Some(2)), "Headers (2)");
        assert_eq!(tab_title("Params", None), "Params");
    }
}
