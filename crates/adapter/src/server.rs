//! TCP server - accepts agent connections and relays requests to the game loop
//!
//! Each client gets a reader loop and a writer task. Requests are validated
//! here (handshake, controller role, action names) and forwarded to the game
//! loop over a bounded channel; replies come back through the outbound
//! channel and are routed to the right client.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::{
    create_error, create_welcome, parse_action, parse_message, ClientMessage, ErrorCode, Role,
    ServerMessage,
};
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the request queue to the game loop
    pub max_pending_commands: usize,
    /// Append a JSON line per wire message to this file
    pub log_path: Option<String>,
    pub disabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            max_pending_commands: 16,
            log_path: None,
            disabled: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            host: get("QTETRIS_AI_HOST").unwrap_or(defaults.host),
            port: get("QTETRIS_AI_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            max_pending_commands: get("QTETRIS_AI_MAX_PENDING")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_pending_commands),
            log_path: get("QTETRIS_AI_LOG_PATH"),
            disabled: get("QTETRIS_AI_DISABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: u64,
    handshaken: bool,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

/// Shared server state
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<u64>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    async fn send_to(&self, client_id: u64, msg: ServerMessage) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn is_handshaken(&self, client_id: u64) -> bool {
        let clients = self.clients.read().await;
        clients.iter().any(|c| c.id == client_id && c.handshaken)
    }

    async fn is_controller(&self, client_id: u64) -> bool {
        *self.controller.read().await == Some(client_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    In,
    Out,
}

/// One line of the wire log
#[derive(Debug, Serialize)]
struct WireRecord {
    client_id: u64,
    dir: Direction,
    line: String,
}

type WireLog = Option<mpsc::UnboundedSender<WireRecord>>;

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<WireRecord> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Adapter] Cannot open wire log {}: {}", path, e);
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(rec) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &rec).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }
        let _ = file.flush().await;
    });
    tx
}

fn log_wire(log: &WireLog, client_id: u64, dir: Direction, line: &str) {
    if let Some(tx) = log {
        let _ = tx.send(WireRecord {
            client_id,
            dir,
            line: line.to_string(),
        });
    }
}

/// Run the TCP server until the listener fails.
///
/// `ready_tx` receives the bound address once the listener is up (useful with
/// port 0 in tests).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let wire_log: WireLog = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new());

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(OutboundMessage { client_id, msg }) = out_rx.recv().await {
                state.send_to(client_id, msg).await;
            }
        });
    }

    let mut next_client_id = 0u64;
    loop {
        let (socket, peer) = listener.accept().await?;
        next_client_id += 1;
        let client_id = next_client_id;
        println!("[Adapter] Client {} connected from {}", client_id, peer);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log = wire_log.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, &state, command_tx, wire_log).await {
                eprintln!("[Adapter] Client {} error: {:#}", client_id, e);
            }
            remove_client(&state, client_id).await;
            println!("[Adapter] Client {} disconnected", client_id);
        });
    }
}

async fn remove_client(state: &ServerState, client_id: u64) {
    state.clients.write().await.retain(|c| c.id != client_id);
    let mut controller = state.controller.write().await;
    if *controller == Some(client_id) {
        *controller = None;
        println!("[Adapter] Controller {} released", client_id);
    }
}

async fn handle_client(
    socket: TcpStream,
    client_id: u64,
    state: &ServerState,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log: WireLog,
) -> Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.clients.write().await.push(ClientHandle {
        id: client_id,
        handshaken: false,
        tx: tx.clone(),
    });

    let out_log = wire_log.clone();
    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Ok(mut line) = serde_json::to_string(&msg) else {
                continue;
            };
            log_wire(&out_log, client_id, Direction::Out, &line);
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    while let Some(raw) = lines.next_line().await? {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        log_wire(&wire_log, client_id, Direction::In, trimmed);

        let msg = match parse_message(trimmed) {
            Ok(m) => m,
            Err(e) => {
                let err = create_error(0, ErrorCode::ParseError, &e.to_string());
                let _ = tx.send(ServerMessage::Error(err));
                continue;
            }
        };
        let seq = msg.seq();

        if let ClientMessage::Hello { client, .. } = &msg {
            let role = handshake(state, client_id).await;
            if let Some(info) = client {
                println!("[Adapter] Client {} is {} ({:?})", client_id, info.name, role);
            }
            let _ = tx.send(ServerMessage::Welcome(create_welcome(seq, client_id, role)));
            continue;
        }

        if !state.is_handshaken(client_id).await {
            let err = create_error(seq, ErrorCode::HandshakeRequired, "send hello first");
            let _ = tx.send(ServerMessage::Error(err));
            continue;
        }

        let payload = match &msg {
            ClientMessage::Action { action, .. } => match parse_action(action) {
                Some(a) => InboundPayload::Action(a),
                None => {
                    let err = create_error(
                        seq,
                        ErrorCode::InvalidAction,
                        &format!("unknown action {:?}", action),
                    );
                    let _ = tx.send(ServerMessage::Error(err));
                    continue;
                }
            },
            ClientMessage::Reset { .. } => InboundPayload::Reset,
            ClientMessage::Observe { .. } => InboundPayload::Observe,
            ClientMessage::Hello { .. } => continue,
        };

        if payload != InboundPayload::Observe && !state.is_controller(client_id).await {
            let err = create_error(seq, ErrorCode::NotController, "only the controller may act");
            let _ = tx.send(ServerMessage::Error(err));
            continue;
        }

        let inbound = InboundCommand {
            client_id,
            seq,
            payload,
        };
        if command_tx.try_send(inbound).is_err() {
            let err = create_error(seq, ErrorCode::Backpressure, "game loop is busy");
            let _ = tx.send(ServerMessage::Error(err));
        }
    }

    // Let the writer flush what is already queued: once this client is out
    // of the shared list and `tx` is gone, its channel closes.
    drop(tx);
    remove_client(state, client_id).await;
    let _ = write_task.await;
    Ok(())
}

/// Mark the client handshaken and assign its role.
async fn handshake(state: &ServerState, client_id: u64) -> Role {
    {
        let mut clients = state.clients.write().await;
        if let Some(c) = clients.iter_mut().find(|c| c.id == client_id) {
            c.handshaken = true;
        }
    }

    let mut controller = state.controller.write().await;
    match *controller {
        Some(id) if id == client_id => Role::Controller,
        Some(_) => Role::Observer,
        None => {
            *controller = Some(client_id);
            println!("[Adapter] Client {} is now controller", client_id);
            Role::Controller
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 7777);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("QTETRIS_AI_HOST", "0.0.0.0"),
            ("QTETRIS_AI_PORT", "9000"),
            ("QTETRIS_AI_MAX_PENDING", "4"),
            ("QTETRIS_AI_LOG_PATH", " /tmp/wire.jsonl "),
            ("QTETRIS_AI_DISABLED", "TRUE"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_pending_commands, 4);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/wire.jsonl"));
        assert!(config.disabled);
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_lookup(|k| {
            (k == "QTETRIS_AI_PORT").then(|| "seventy".to_string())
        });
        assert_eq!(config.port, 7777);
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
