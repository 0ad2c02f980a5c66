//! Host bridge actor - moves envelopes between the App actor and the host transport

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::messages::{InboundMessage, OutboundMessage};

/// Bridge between the App actor's channels and a line-oriented host transport
pub struct HostBridge {
    inbound_tx: mpsc::UnboundedSender<InboundMessage>,
}

impl HostBridge {
    pub fn new(inbound_tx: mpsc::UnboundedSender<InboundMessage>) -> Self {
        HostBridge { inbound_tx }
    }

    /// Pump envelopes until either side goes away.
    ///
    /// Outbound envelopes are written in the order they were issued and inbound
    /// lines are forwarded in the order they arrived; nothing is buffered or
    /// reordered in between.
    pub async fn run_io<R, W>(
        self,
        reader: R,
        mut writer: W,
        mut outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        loop {
            tokio::select! {
                message = outbound_rx.recv() => {
                    match message {
                        Some(message) => write_envelope(&mut writer, &message).await?,
                        None => {
                            info!("Panel closed, stopping host bridge");
                            break;
                        }
                    }
                }

                line = lines.next_line() => {
                    match line.context("failed to read from host")? {
                        Some(line) => {
                            if !self.forward(&line) {
                                break;
                            }
                        }
                        None => {
                            info!("Host closed its output");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Decode and forward one line. Returns false once the App actor is gone.
    fn forward(&self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        match InboundMessage::decode(line) {
            Ok(message) => {
                debug!(kind = message.type_name(), "Host envelope decoded");
                self.inbound_tx.send(message).is_ok()
            }
            Err(e) => {
                warn!(error = %e, "Dropping undecodable host line");
                true
            }
        }
    }
}

async fn write_envelope<W: AsyncWrite + Unpin>(writer: &mut W, message: &OutboundMessage) -> Result<()> {
    let line = message.encode()?;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer
        .flush()
        .await
        .with_context(|| format!("failed to deliver {} to host", message.type_name()))?;
    debug!(kind = message.type_name(), "Envelope written");
    Ok(())
}
