use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REQUEST_NAME;
use crate::key_values::{self, KeyValueOp, Toggleable};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::HEAD,
            HttpMethod::HEAD => HttpMethod::OPTIONS,
            HttpMethod::OPTIONS => HttpMethod::GET,
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Header or query parameter row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueItem {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl KeyValueItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValueItem {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

impl Default for KeyValueItem {
    fn default() -> Self {
        KeyValueItem::new("", "")
    }
}

impl Toggleable for KeyValueItem {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Kind of request body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    #[default]
    None,
    Json,
    Raw,
    FormUrlencoded,
    FormData,
}

impl BodyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::None => "none",
            BodyType::Json => "json",
            BodyType::Raw => "raw",
            BodyType::FormUrlencoded => "form-urlencoded",
            BodyType::FormData => "form-data",
        }
    }

    pub fn next(&self) -> BodyType {
        match self {
            BodyType::None => BodyType::Json,
            BodyType::Json => BodyType::Raw,
            BodyType::Raw => BodyType::FormUrlencoded,
            BodyType::FormUrlencoded => BodyType::FormData,
            BodyType::FormData => BodyType::None,
        }
    }
}

/// Request body: a kind tag plus its content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBody {
    #[serde(rename = "type")]
    pub kind: BodyType,
    #[serde(default)]
    pub content: String,
}

impl HttpBody {
    pub fn new(kind: BodyType, content: impl Into<String>) -> Self {
        HttpBody {
            kind,
            content: content.into(),
        }
    }
}

/// Where an API key is attached
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
}

/// Authentication settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HttpAuth {
    #[default]
    None,
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    Bearer {
        #[serde(default)]
        token: String,
    },
    ApiKey {
        #[serde(default)]
        name: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        location: ApiKeyLocation,
    },
}

impl HttpAuth {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpAuth::None => "none",
            HttpAuth::Basic { .. } => "basic",
            HttpAuth::Bearer { .. } => "bearer",
            HttpAuth::ApiKey { .. } => "api-key",
        }
    }

    /// Next auth kind with empty credentials
    pub fn cycle(&self) -> HttpAuth {
        match self {
            HttpAuth::None => HttpAuth::Basic {
                username: String::new(),
                password: String::new(),
            },
            HttpAuth::Basic { .. } => HttpAuth::Bearer {
                token: String::new(),
            },
            HttpAuth::Bearer { .. } => HttpAuth::ApiKey {
                name: String::new(),
                value: String::new(),
                location: ApiKeyLocation::Header,
            },
            HttpAuth::ApiKey { .. } => HttpAuth::None,
        }
    }
}

/// A single-field change coming from one of the request editors
#[derive(Clone, Debug, PartialEq)]
pub enum RequestEdit {
    Name(String),
    Method(HttpMethod),
    Url(String),
    QueryParams(Vec<KeyValueItem>),
    Headers(Vec<KeyValueItem>),
    Body(HttpBody),
    Auth(HttpAuth),
}

impl RequestEdit {
    /// Edit for the query param list after applying a list op
    pub fn query_params(request: &HttpRequest, op: KeyValueOp) -> Self {
        RequestEdit::QueryParams(key_values::apply(&request.query_params, op))
    }

    /// Edit for the header list after applying a list op
    pub fn headers(request: &HttpRequest, op: KeyValueOp) -> Self {
        RequestEdit::Headers(key_values::apply(&request.headers, op))
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            RequestEdit::Name(_) => "name",
            RequestEdit::Method(_) => "method",
            RequestEdit::Url(_) => "url",
            RequestEdit::QueryParams(_) => "queryParams",
            RequestEdit::Headers(_) => "headers",
            RequestEdit::Body(_) => "body",
            RequestEdit::Auth(_) => "auth",
        }
    }
}

/// The request being edited. Treated as a value: edits produce a new request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub query_params: Vec<KeyValueItem>,
    #[serde(default)]
    pub headers: Vec<KeyValueItem>,
    #[serde(default)]
    pub body: HttpBody,
    #[serde(default)]
    pub auth: HttpAuth,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HttpRequest {
    /// Built-in request the panel starts with
    pub fn new_default(now: DateTime<Utc>) -> Self {
        HttpRequest {
            id: format!("request-{}", now.timestamp_millis()),
            name: String::from(DEFAULT_REQUEST_NAME),
            method: HttpMethod::GET,
            url: String::new(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: HttpBody::default(),
            auth: HttpAuth::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge one field change into a copy of this request and stamp `updated_at`
    pub fn with_edit(&self, edit: RequestEdit, now: DateTime<Utc>) -> HttpRequest {
        let mut next = self.clone();
        match edit {
            RequestEdit::Name(name) => next.name = name,
            RequestEdit::Method(method) => next.method = method,
            RequestEdit::Url(url) => next.url = url,
            RequestEdit::QueryParams(params) => next.query_params = params,
            RequestEdit::Headers(headers) => next.headers = headers,
            RequestEdit::Body(body) => next.body = body,
            RequestEdit::Auth(auth) => next.auth = auth,
        }
        next.updated_at = now;
        next
    }

    /// Whether the request can be dispatched
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        HttpRequest::new_default(Utc::now())
    }
}

/// Response delivered by the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub curl_command: String,
}

/// Environment variable kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Default,
    Secret,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: VariableType,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Toggleable for EnvironmentVariable {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Named variable set owned by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<EnvironmentVariable>,
    /// Host-side hint only; the panel tracks the active id itself
    #[serde(default)]
    pub is_active: bool,
}

impl Environment {
    pub fn active_variable_count(&self) -> usize {
        key_values::enabled_count(&self.variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_default_request() {
        let req = HttpRequest::new_default(at(0));
        assert_eq!(req.name, "New Request");
        assert_eq!(req.method, HttpMethod::GET);
        assert!(req.url.is_empty());
        assert!(req.headers.is_empty() && req.query_params.is_empty());
        assert_eq!(req.body.kind, BodyType::None);
        assert_eq!(req.auth, HttpAuth::None);
    }

    #[test]
    fn test_with_edit_returns_new_value_and_stamps_time() {
        let req = HttpRequest::new_default(at(0));
        let edited = req.with_edit(RequestEdit::Url("https://example.com".into()), at(10));

        assert_eq!(edited.url, "https://example.com");
        assert_eq!(edited.updated_at, at(10));
        assert_eq!(edited.created_at, at(0));
        assert!(req.url.is_empty());
        assert_eq!(req.updated_at, at(0));
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{
            "id": "r1",
            "name": "List users",
            "method": "POST",
            "url": "https://api.example.com/users",
            "queryParams": [{"key": "page", "value": "2", "enabled": false}],
            "headers": [{"key": "Accept", "value": "*/*", "enabled": true}],
            "body": {"type": "form-urlencoded", "content": "a=1"},
            "auth": {"type": "api-key", "name": "X-Key", "value": "k", "location": "query"},
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;

        let req: HttpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, HttpMethod::POST);
        assert!(!req.query_params[0].enabled);
        assert_eq!(req.body.kind, BodyType::FormUrlencoded);
        assert_eq!(
            req.auth,
            HttpAuth::ApiKey {
                name: "X-Key".into(),
                value: "k".into(),
                location: ApiKeyLocation::Query,
            }
        );

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["queryParams"][0]["key"], "page");
        assert_eq!(value["auth"]["type"], "api-key");
        assert_eq!(value["body"]["type"], "form-urlencoded");
    }

    #[test]
    fn test_response_headers_keep_order() {
        let json = r#"{"status": 200, "statusText": "OK",
            "headers": {"z-last": "1", "a-first": "2", "m-mid": "3"},
            "body": "", "contentType": "text/plain", "size": 0, "time": 12.5,
            "curlCommand": "curl x"}"#;
        let response: HttpResponse = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = response.headers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z-last", "a-first", "m-mid"]);
    }

    #[test]
    fn test_environment_active_variables() {
        let env: Environment = serde_json::from_str(
            r#"{"id": "dev", "name": "Dev", "variables": [
                {"key": "host", "value": "localhost", "type": "default", "enabled": true},
                {"key": "token", "value": "s3cr3t", "type": "secret", "enabled": false}
            ]}"#,
        )
        .unwrap();
        assert_eq!(env.variables[1].kind, VariableType::Secret);
        assert_eq!(env.active_variable_count(), 1);
        assert!(!env.is_active);
    }
}
