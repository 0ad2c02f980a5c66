//! App actor - message loop processing UI events and host envelopes
//!
//! Everything that touches [`AppState`] runs here, one event at a time, so
//! there is never concurrent mutation of the lifecycle state.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::state::AppState;
use crate::messages::{InboundMessage, OutboundMessage, RenderState, UiEvent};

/// App actor that processes UI events and host envelopes
pub struct AppActor {
    state: AppState,
    host_tx: mpsc::UnboundedSender<OutboundMessage>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        host_tx: mpsc::UnboundedSender<OutboundMessage>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            host_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut host_rx: mpsc::UnboundedReceiver<InboundMessage>,
    ) {
        // Announce readiness exactly once; the host replies with the initial request and environments
        self.emit(OutboundMessage::Ready);
        self.render();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if matches!(event, UiEvent::Quit) {
                        info!("Quit requested");
                        break;
                    }
                    if let Some(message) = self.state.handle_ui_event(event) {
                        self.emit(message);
                    }
                    self.render();
                }
                Some(message) = host_rx.recv() => {
                    info!(kind = message.type_name(), "Host message received");
                    self.state.handle_inbound(message);
                    self.render();
                }
                else => break,
            }
        }
    }

    fn emit(&self, message: OutboundMessage) {
        info!(kind = message.type_name(), "Sending host message");
        if self.host_tx.send(message).is_err() {
            warn!("Host bridge is closed, message dropped");
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpResponse, RequestEdit};

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        inbound_tx: mpsc::UnboundedSender<InboundMessage>,
        outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
    }

    impl Harness {
        async fn start() -> Self {
            let (ui_tx, ui_rx) = mpsc::unbounded_channel();
            let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
            let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
            let (render_tx, mut render_rx) = mpsc::unbounded_channel();

            tokio::spawn(AppActor::new(outbound_tx, render_tx).run(ui_rx, inbound_rx));

            assert_eq!(outbound_rx.recv().await, Some(OutboundMessage::Ready));
            render_rx.recv().await.unwrap();

            Harness { ui_tx, inbound_tx, outbound_rx, render_rx }
        }

        async fn user(&mut self, event: UiEvent) -> RenderState {
            self.ui_tx.send(event).unwrap();
            self.render_rx.recv().await.unwrap()
        }

        async fn host(&mut self, message: InboundMessage) -> RenderState {
            self.inbound_tx.send(message).unwrap();
            self.render_rx.recv().await.unwrap()
        }
    }

    fn json_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".into(),
            headers: Default::default(),
            body: body.into(),
            content_type: "application/json".into(),
            size: body.len() as u64,
            time: 12.0,
            curl_command: String::new(),
        }
    }

    #[tokio::test]
    async fn test_send_then_response_end_to_end() {
        let mut h = Harness::start().await;

        h.user(UiEvent::Edit(RequestEdit::Url("https://example.com/a".into()))).await;
        h.user(UiEvent::Send).await;
        match h.outbound_rx.recv().await {
            Some(OutboundMessage::SendRequest { request }) => assert_eq!(request.url, "https://example.com/a"),
            other => panic!("unexpected {:?}", other),
        }

        let render = h.host(InboundMessage::RequestStarted).await;
        assert!(render.is_loading);
        assert!(!render.can_send);

        let render = h.host(InboundMessage::ResponseReceived { response: json_response(r#"{"a":1}"#) }).await;
        assert!(!render.is_loading);
        assert_eq!(render.error, None);
        let response = render.response.unwrap();
        assert_eq!(response.body.plain_text(), "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn test_error_while_loading() {
        let mut h = Harness::start().await;

        let render = h.host(InboundMessage::RequestStarted).await;
        assert!(render.is_loading);

        let render = h.host(InboundMessage::RequestError { error: "timeout".into() }).await;
        assert!(!render.is_loading);
        assert_eq!(render.error.as_deref(), Some("timeout"));
        assert!(render.response.is_none());
    }

    #[tokio::test]
    async fn test_disabled_actions_emit_nothing() {
        let mut h = Harness::start().await;

        // Empty URL, idle
        h.user(UiEvent::Send).await;
        h.user(UiEvent::Cancel).await;
        h.user(UiEvent::Save).await;

        assert!(matches!(h.outbound_rx.recv().await, Some(OutboundMessage::SaveRequest { .. })));
        assert!(h.outbound_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_then_environment_switch() {
        let mut h = Harness::start().await;

        h.host(InboundMessage::RequestStarted).await;
        let render = h.user(UiEvent::Cancel).await;
        assert!(!render.is_loading);
        assert_eq!(h.outbound_rx.recv().await, Some(OutboundMessage::CancelRequest));

        let render = h.user(UiEvent::SelectEnvironment(None)).await;
        assert_eq!(render.environment_label, "No Environment");
        assert_eq!(
            h.outbound_rx.recv().await,
            Some(OutboundMessage::SelectEnvironment { environment_id: None })
        );
    }

    #[tokio::test]
    async fn test_quit_stops_actor() {
        let mut h = Harness::start().await;
        h.ui_tx.send(UiEvent::Quit).unwrap();
        assert!(h.render_rx.recv().await.is_none());
    }
}
