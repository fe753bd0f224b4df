//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server: the server runs on
//! its own tokio runtime and talks to the loop only through channels.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::protocol::ServerMessage;
use crate::server::{run_server, ServerConfig};
use crate::types::AgentAction;

/// Request delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: u64,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// Tap this action on the next tick, then reply with an observation
    Action(AgentAction),
    /// Reply with an observation now
    Observe,
    /// Start a new session, then reply with an observation
    Reset,
}

/// Reply from the game loop to be delivered by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub client_id: u64,
    pub msg: ServerMessage,
}

/// Running adapter instance.
pub struct Adapter {
    /// `None` when the server runs on a runtime owned by someone else
    _rt: Option<Runtime>,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `QTETRIS_AI_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        let config = ServerConfig::from_env();
        if config.disabled {
            println!("[Adapter] AI control disabled via QTETRIS_AI_DISABLED");
            return Ok(None);
        }
        Self::start(config).map(Some)
    }

    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                eprintln!("[Adapter] Server stopped: {:#}", e);
            }
        });

        Ok(Self {
            _rt: Some(rt),
            cmd_rx,
            out_tx,
        })
    }

    /// Attach to a server already spawned on an existing runtime with
    /// [`run_server`].
    pub fn from_channels(
        cmd_rx: mpsc::Receiver<InboundCommand>,
        out_tx: mpsc::UnboundedSender<OutboundMessage>,
    ) -> Self {
        Self {
            _rt: None,
            cmd_rx,
            out_tx,
        }
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Queue a reply; dropped if the client has gone.
    pub fn reply(&self, client_id: u64, msg: ServerMessage) {
        let _ = self.out_tx.send(OutboundMessage { client_id, msg });
    }
}
