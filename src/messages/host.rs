//! Host messages - envelopes exchanged between the panel and the host process
//!
//! Each envelope is a JSON object tagged by `type`. On the wire every envelope
//! occupies exactly one line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Environment, HttpRequest, HttpResponse};

/// Envelopes sent from the panel to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Sent once at startup; the host answers with `loadRequest` and `loadEnvironments`
    Ready,
    SendRequest {
        request: HttpRequest,
    },
    SaveRequest {
        request: HttpRequest,
        #[serde(rename = "saveAs", default, skip_serializing_if = "Option::is_none")]
        save_as: Option<bool>,
    },
    CancelRequest,
    CopyAsCurl {
        request: HttpRequest,
    },
    /// `None` selects "No Environment"
    SelectEnvironment {
        #[serde(rename = "environmentId")]
        environment_id: Option<String>,
    },
}

impl OutboundMessage {
    pub fn type_name(&self) -> &'static str {
        match self {
            OutboundMessage::Ready => "ready",
            OutboundMessage::SendRequest { .. } => "sendRequest",
            OutboundMessage::SaveRequest { .. } => "saveRequest",
            OutboundMessage::CancelRequest => "cancelRequest",
            OutboundMessage::CopyAsCurl { .. } => "copyAsCurl",
            OutboundMessage::SelectEnvironment { .. } => "selectEnvironment",
        }
    }

    /// Serialize to a single JSON line (without the trailing newline)
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .with_context(|| format!("failed to encode {} envelope", self.type_name()))
    }
}

/// Envelopes delivered by the host to the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    LoadRequest {
        request: HttpRequest,
    },
    ResponseReceived {
        response: HttpResponse,
    },
    RequestError {
        error: String,
    },
    RequestStarted,
    RequestCancelled,
    RequestSaved,
    LoadEnvironments {
        #[serde(default)]
        environments: Vec<Environment>,
        #[serde(rename = "activeId", default)]
        active_id: Option<String>,
    },
    /// Any `type` this panel does not know about
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    pub fn type_name(&self) -> &'static str {
        match self {
            InboundMessage::LoadRequest { .. } => "loadRequest",
            InboundMessage::ResponseReceived { .. } => "responseReceived",
            InboundMessage::RequestError { .. } => "requestError",
            InboundMessage::RequestStarted => "requestStarted",
            InboundMessage::RequestCancelled => "requestCancelled",
            InboundMessage::RequestSaved => "requestSaved",
            InboundMessage::LoadEnvironments { .. } => "loadEnvironments",
            InboundMessage::Unknown => "unknown",
        }
    }

    /// Parse one line received from the host
    pub fn decode(line: &str) -> Result<InboundMessage> {
        serde_json::from_str(line.trim()).context("malformed host envelope")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpRequest;
    use serde_json::{json, Value};

    fn to_value(msg: &OutboundMessage) -> Value {
        serde_json::from_str(&msg.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_outbound_shapes() {
        assert_eq!(to_value(&OutboundMessage::Ready), json!({"type": "ready"}));
        assert_eq!(to_value(&OutboundMessage::CancelRequest), json!({"type": "cancelRequest"}));
        assert_eq!(
            to_value(&OutboundMessage::SelectEnvironment { environment_id: None }),
            json!({"type": "selectEnvironment", "environmentId": null})
        );
        assert_eq!(
            to_value(&OutboundMessage::SelectEnvironment { environment_id: Some("dev".into()) }),
            json!({"type": "selectEnvironment", "environmentId": "dev"})
        );
    }

    #[test]
    fn test_save_as_flag_only_when_set() {
        let request = HttpRequest::default();
        let save = to_value(&OutboundMessage::SaveRequest { request: request.clone(), save_as: None });
        assert_eq!(save["type"], "saveRequest");
        assert!(save.get("saveAs").is_none());
        assert_eq!(save["request"]["name"], "New Request");

        let save_as = to_value(&OutboundMessage::SaveRequest { request, save_as: Some(true) });
        assert_eq!(save_as["saveAs"], true);
    }

    #[test]
    fn test_encoded_envelope_is_one_line() {
        let mut request = HttpRequest::default();
        request.body.content = "line one\nline two".into();
        let line = OutboundMessage::SendRequest { request }.encode().unwrap();
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_decode_inbound() {
        assert_eq!(
            InboundMessage::decode(r#"{"type":"requestStarted"}"#).unwrap(),
            InboundMessage::RequestStarted
        );
        assert_eq!(
            InboundMessage::decode(r#"{"type":"requestError","error":"timeout"}"#).unwrap(),
            InboundMessage::RequestError { error: "timeout".into() }
        );

        let envs = InboundMessage::decode(
            r#"{"type":"loadEnvironments","environments":[{"id":"dev","name":"Dev","variables":[]}]}"#,
        )
        .unwrap();
        match envs {
            InboundMessage::LoadEnvironments { environments, active_id } => {
                assert_eq!(environments.len(), 1);
                assert_eq!(active_id, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let msg = InboundMessage::decode(r#"{"type":"themeChanged","theme":"dark"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Unknown);
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        assert!(InboundMessage::decode("not json").is_err());
        assert!(InboundMessage::decode(r#"{"type":"requestError"}"#).is_err());
        assert!(InboundMessage::decode(r#"{"error":"no tag"}"#).is_err());
    }
}
