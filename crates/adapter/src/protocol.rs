//! Protocol module - JSON message types for external agents
//!
//! One JSON object per line. Every message carries a `type` tag and a client
//! chosen `seq`, which the server echoes in its reply. Timestamps (`ts`) are
//! milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, LockEvent, Observation};
use crate::types::AgentAction;

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Hello {
        seq: u64,
        #[serde(default)]
        client: Option<ClientInfo>,
    },
    /// One agent action: `left`, `right`, `down` or `up`
    Action { seq: u64, action: String },
    /// Request the current observation without acting
    Observe { seq: u64 },
    /// Abandon the session and start a new one
    Reset { seq: u64 },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Hello { seq, .. }
            | ClientMessage::Action { seq, .. }
            | ClientMessage::Observe { seq }
            | ClientMessage::Reset { seq } => *seq,
        }
    }
}

/// Parse one line from a client.
pub fn parse_message(line: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Parse the action name of an `action` message.
pub fn parse_action(name: &str) -> Option<AgentAction> {
    AgentAction::from_str(name)
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ParseError,
    HandshakeRequired,
    NotController,
    InvalidAction,
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Controller,
    Observer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: Role,
    /// Action names the server accepts
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub kind: String,
    pub x: i8,
    pub y: i8,
    pub color: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub hard_drop: bool,
    pub distance: u32,
    pub lines_cleared: u32,
    pub score: u32,
}

impl From<LockEvent> for LastEvent {
    fn from(e: LockEvent) -> Self {
        Self {
            hard_drop: e.hard_drop,
            distance: e.distance,
            lines_cleared: e.lines_cleared,
            score: e.placement_score + e.line_clear_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMessage {
    pub seq: u64,
    pub ts: u64,
    /// 20 rows of 10 cells, 1 where the rendered frame shows a block
    pub grid: Vec<Vec<u8>>,
    /// Compact hex key of `grid`
    pub state_key: String,
    pub active: Option<ActivePiece>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces: u32,
    pub fall_speed_ms: f64,
    pub game_over: bool,
    pub last_event: Option<LastEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ServerMessage::Welcome(m) => m.seq,
            ServerMessage::Observation(m) => m.seq,
            ServerMessage::Error(m) => m.seq,
        }
    }
}

pub fn create_welcome(seq: u64, client_id: u64, role: Role) -> WelcomeMessage {
    WelcomeMessage {
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        actions: AgentAction::ALL
            .iter()
            .map(|a| a.as_str().to_string())
            .collect(),
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Observation of a snapshot, replying to request `seq`.
pub fn build_observation(
    seq: u64,
    snap: &GameSnapshot,
    last_event: Option<LastEvent>,
) -> ObservationMessage {
    let obs = Observation::from_snapshot(snap);
    ObservationMessage {
        seq,
        ts: current_timestamp_ms(),
        grid: obs.rows(),
        state_key: obs.state_key(),
        active: snap.active.map(|a| ActivePiece {
            kind: a.kind.as_str().to_string(),
            x: a.x,
            y: a.y,
            color: a.color,
        }),
        score: snap.score,
        level: snap.level,
        lines: snap.lines,
        pieces: snap.pieces,
        fall_speed_ms: snap.fall_speed_ms,
        game_over: snap.game_over,
        last_event,
    }
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;

    #[test]
    fn test_parse_client_messages() {
        assert_eq!(
            parse_message(r#"{"type":"hello","seq":1,"client":{"name":"bot"}}"#).unwrap(),
            ClientMessage::Hello {
                seq: 1,
                client: Some(ClientInfo {
                    name: "bot".to_string(),
                    version: None
                })
            }
        );
        assert_eq!(
            parse_message(r#"{"type":"hello","seq":1}"#).unwrap(),
            ClientMessage::Hello { seq: 1, client: None }
        );
        assert_eq!(
            parse_message(r#"{"type":"action","seq":2,"action":"left"}"#).unwrap(),
            ClientMessage::Action {
                seq: 2,
                action: "left".to_string()
            }
        );
        assert_eq!(
            parse_message(r#"{"type":"observe","seq":3}"#).unwrap().seq(),
            3
        );
        assert_eq!(
            parse_message(r#"{"type":"reset","seq":4}"#).unwrap(),
            ClientMessage::Reset { seq: 4 }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(parse_message(r#"{"type":"command","seq":1}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_parse_action_names() {
        assert_eq!(parse_action("up"), Some(AgentAction::Rotate));
        assert_eq!(parse_action("hardDrop"), None);
    }

    #[test]
    fn test_server_message_tagging() {
        let msg = ServerMessage::Error(create_error(7, ErrorCode::NotController, "nope"));
        let v: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["code"], "not_controller");

        let welcome = ServerMessage::Welcome(create_welcome(1, 3, Role::Controller));
        let v: serde_json::Value = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["role"], "controller");
        assert_eq!(v["actions"], serde_json::json!(["left", "right", "down", "up"]));
    }

    #[test]
    fn test_build_observation() {
        let session = Session::with_seed(1);
        let snap = session.snapshot();
        let obs = build_observation(9, &snap, None);

        assert_eq!(obs.seq, 9);
        assert_eq!(obs.grid.len(), 20);
        assert!(obs.grid.iter().all(|r| r.len() == 10));
        let filled: u32 = obs.grid.iter().flatten().map(|&c| u32::from(c)).sum();
        assert_eq!(filled, 4);
        assert_eq!(obs.state_key.len(), 50);
        let active = obs.active.as_ref().unwrap();
        assert_eq!((active.x, active.y), (3, 0));
        assert_eq!(obs.level, 1);
        assert!(!obs.game_over);

        let v = serde_json::to_value(ServerMessage::Observation(obs)).unwrap();
        assert_eq!(v["type"], "observation");
        assert!(v["last_event"].is_null());
    }
}
