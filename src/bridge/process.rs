//! Host process transport - the host runs as a child process speaking JSON lines on stdio

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bridge::actor::HostBridge;
use crate::config::PanelConfig;
use crate::messages::OutboundMessage;

impl HostBridge {
    /// Spawn the configured host and bridge its stdio until either side closes
    pub async fn run_process(
        self,
        config: &PanelConfig,
        outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ) -> Result<()> {
        let mut child = Command::new(&config.host_command)
            .args(&config.host_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start host `{}`", config.host_command))?;

        info!(command = %config.host_command, pid = ?child.id(), "Host process started");

        let stdin = child.stdin.take().ok_or_else(|| anyhow!("host stdin unavailable"))?;
        let stdout = child.stdout.take().ok_or_else(|| anyhow!("host stdout unavailable"))?;

        // The terminal belongs to the view, so host diagnostics go to the log
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "host", "{}", line);
                }
            });
        }

        let result = self.run_io(stdout, stdin, outbound_rx).await;

        if let Err(e) = child.kill().await {
            debug!(error = %e, "Host process already gone");
        }
        match &result {
            Ok(()) => info!("Host bridge stopped"),
            Err(e) => warn!(error = %e, "Host bridge failed"),
        }
        result
    }
}
