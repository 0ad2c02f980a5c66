//! Response body rendering
//!
//! Bodies are untrusted. The whole text is markup-escaped first and only the
//! escaped text is ever tokenized, so classification markers wrap safe text
//! and nothing inside the payload can be read back as markup.
//!
//! Tokenizing is pattern based rather than a structural parse. It is a
//! cosmetic pass: odd inputs may be misclassified, and if the pattern is not
//! available the escaped text is shown without classification.
//!
//! Pretty-printed JSON is re-serialized by serde_json, so number text is not
//! kept verbatim: `-1.5e3` is shown as `-1500.0`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::constants::JSON_CONTENT_TYPE;

/// String (optionally followed by a colon), literal, or number
const TOKEN_PATTERN: &str =
    r#""(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+\-]?\d+)?"#;

/// Classification attached to a highlighted segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Key,
    String,
    Boolean,
    Null,
    Number,
    Punctuation,
}

impl TokenKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            TokenKind::Key => "json-key",
            TokenKind::String => "json-string",
            TokenKind::Boolean => "json-boolean",
            TokenKind::Null => "json-null",
            TokenKind::Number => "json-number",
            TokenKind::Punctuation => "json-punctuation",
        }
    }
}

/// Run of escaped text, classified or plain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub kind: Option<TokenKind>,
    /// Always markup-escaped
    pub text: String,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Segment {
            kind: None,
            text: text.to_string(),
        }
    }

    fn classified(kind: TokenKind, text: &str) -> Self {
        Segment {
            kind: Some(kind),
            text: text.to_string(),
        }
    }

    /// Text for surfaces that never interpret markup (the terminal)
    pub fn display_text(&self) -> String {
        unescape_markup(&self.text)
    }
}

/// Rendered body ready for a display surface
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlighted {
    pub segments: Vec<Segment>,
    /// True when the body parsed as JSON and was pretty-printed
    pub is_json: bool,
}

impl Highlighted {
    /// Markup form: classified segments wrapped in spans
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment.kind {
                Some(kind) => {
                    out.push_str("<span class=\"");
                    out.push_str(kind.class_name());
                    out.push_str("\">");
                    out.push_str(&segment.text);
                    out.push_str("</span>");
                }
                None => out.push_str(&segment.text),
            }
        }
        out
    }

    /// Escaped text with no classification markers
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Unescaped text, as a surface without markup shows it
    pub fn display_text(&self) -> String {
        unescape_markup(&self.plain_text())
    }
}

/// Escape `&`, `<` and `>`. `&` goes first so entities are not double-escaped.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_markup`]
pub fn unescape_markup(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Whether a raw content type selects JSON rendering
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains(JSON_CONTENT_TYPE)
}

/// Two-space pretty print, or `None` when the body is not valid JSON
pub fn pretty_json(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Text to display before escaping: pretty JSON when possible, otherwise the raw body
pub fn format_body(body: &str, content_type: &str) -> (String, bool) {
    if is_json_content_type(content_type) {
        if let Some(pretty) = pretty_json(body) {
            return (pretty, true);
        }
    }
    (body.to_string(), false)
}

fn token_regex() -> Option<&'static Regex> {
    static TOKEN: OnceLock<Option<Regex>> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(TOKEN_PATTERN).ok()).as_ref()
}

fn classify(caps: &Captures<'_>) -> Vec<Segment> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    let text = whole.as_str();

    if text.starts_with('"') {
        return match caps.get(2) {
            Some(colon) if text.trim_end().ends_with(':') => {
                let split = colon.start() - whole.start();
                vec![
                    Segment::classified(TokenKind::Key, &text[..split]),
                    Segment::classified(TokenKind::Punctuation, &text[split..]),
                ]
            }
            _ => vec![Segment::classified(TokenKind::String, text)],
        };
    }

    let kind = match text {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        _ => TokenKind::Number,
    };
    vec![Segment::classified(kind, text)]
}

/// Split already-escaped text into segments. `None` if the tokenizer is unavailable.
pub fn tokenize(escaped: &str) -> Option<Vec<Segment>> {
    let re = token_regex()?;
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in re.captures_iter(escaped) {
        let whole = caps.get(0)?;
        if whole.start() > last {
            segments.push(Segment::plain(&escaped[last..whole.start()]));
        }
        segments.extend(classify(&caps));
        last = whole.end();
    }
    if last < escaped.len() {
        segments.push(Segment::plain(&escaped[last..]));
    }

    Some(segments)
}

/// Render a response body for display
pub fn render(body: &str, content_type: &str) -> Highlighted {
    let (text, is_json) = format_body(body, content_type);
    let escaped = escape_markup(&text);

    if escaped.is_empty() {
        return Highlighted {
            segments: Vec::new(),
            is_json,
        };
    }

    let segments = if is_json {
        tokenize(&escaped).unwrap_or_else(|| {
            tracing::warn!("JSON tokenizer unavailable, rendering plain text");
            vec![Segment::plain(&escaped)]
        })
    } else {
        vec![Segment::plain(&escaped)]
    };

    Highlighted { segments, is_json }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_spans(html: &str) -> String {
        let re = Regex::new(r#"<span class="json-[a-z]+">|</span>"#).unwrap();
        re.replace_all(html, "").into_owned()
    }

    fn kinds(h: &Highlighted) -> Vec<Option<TokenKind>> {
        h.segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_escape_ampersand_first() {
        assert_eq!(escape_markup("a&b<c>"), "a&amp;b&lt;c&gt;");
        assert_eq!(escape_markup("&lt;"), "&amp;lt;");
        assert_eq!(unescape_markup(&escape_markup("&lt;<&>")), "&lt;<&>");
    }

    #[test]
    fn test_pretty_print_two_spaces() {
        let h = render(r#"{"a":1}"#, "application/json");
        assert!(h.is_json);
        assert_eq!(h.plain_text(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_pretty_print_keeps_key_order() {
        let pretty = pretty_json(r#"{"z":1,"a":[true,null]}"#).unwrap();
        assert_eq!(pretty, "{\n  \"z\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let bodies = [r#"{"a":{"b":[1,2.5,-3e2]},"c":"x"}"#, "[]", "\"s\"", "42"];
        for body in bodies {
            let once = pretty_json(body).unwrap();
            let twice = pretty_json(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_non_json_content_is_verbatim() {
        let body = "{\"a\":1}  <b>bold</b> & more";
        let h = render(body, "text/html");
        assert!(!h.is_json);
        assert_eq!(kinds(&h), vec![None]);
        assert_eq!(h.display_text(), body);
    }

    #[test]
    fn test_invalid_json_falls_back_to_raw() {
        let body = "{not json <script>";
        let h = render(body, "application/json");
        assert!(!h.is_json);
        assert_eq!(h.segments.len(), 1);
        assert_eq!(h.plain_text(), "{not json &lt;script&gt;");
    }

    #[test]
    fn test_content_type_match_is_substring_and_case_sensitive() {
        assert!(render("[1]", "application/json; charset=utf-8").is_json);
        assert!(render("[1]", "application/json+x").is_json);
        assert!(!render("[1]", "APPLICATION/JSON").is_json);
        assert!(!render("[1]", "application/problem+json").is_json);
    }

    #[test]
    fn test_classification() {
        let h = render(r#"{"k":"v","n":-1.5e3,"t":true,"f":false,"z":null}"#, "application/json");
        let classified: Vec<(TokenKind, &str)> = h
            .segments
            .iter()
            .filter_map(|s| s.kind.map(|k| (k, s.text.as_str())))
            .collect();

        assert_eq!(
            classified,
            vec![
                (TokenKind::Key, "\"k\""),
                (TokenKind::Punctuation, ":"),
                (TokenKind::String, "\"v\""),
                (TokenKind::Key, "\"n\""),
                (TokenKind::Punctuation, ":"),
                (TokenKind::Number, "-1500.0"),
                (TokenKind::Key, "\"t\""),
                (TokenKind::Punctuation, ":"),
                (TokenKind::Boolean, "true"),
                (TokenKind::Key, "\"f\""),
                (TokenKind::Punctuation, ":"),
                (TokenKind::Boolean, "false"),
                (TokenKind::Key, "\"z\""),
                (TokenKind::Punctuation, ":"),
                (TokenKind::Null, "null"),
            ]
        );
    }

    #[test]
    fn test_escaped_quotes_stay_inside_string() {
        let h = render(r#"{"q":"say \"hi\""}"#, "application/json");
        let strings: Vec<&str> = h
            .segments
            .iter()
            .filter(|s| s.kind == Some(TokenKind::String))
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(strings, vec![r#""say \"hi\"""#]);
    }

    #[test]
    fn test_markup_in_payload_never_escapes() {
        let bodies = [
            (r#"{"<img src=x onerror=alert(1)>":"</span><script>alert(1)</script>"}"#, "application/json"),
            ("<script>alert('x')</script>", "application/json"),
            ("<b>&amp;</b>", "text/html"),
        ];
        for (body, content_type) in bodies {
            let html = render(body, content_type).to_html();
            let payload = strip_spans(&html);
            assert!(!payload.contains('<'), "unescaped < in {payload}");
            assert!(!payload.contains('>'), "unescaped > in {payload}");
        }
    }

    #[test]
    fn test_html_wraps_classified_segments() {
        let html = render(r#"{"a":1}"#, "application/json").to_html();
        assert_eq!(
            html,
            "{\n  <span class=\"json-key\">\"a\"</span><span class=\"json-punctuation\">:</span> \
             <span class=\"json-number\">1</span>\n}"
        );
    }

    #[test]
    fn test_empty_body() {
        let h = render("", "text/plain");
        assert!(h.segments.is_empty());
        assert_eq!(h.to_html(), "");
    }
}
