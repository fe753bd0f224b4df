//! Adapter module - agent control via TCP socket with a JSON protocol
//!
//! Lets out-of-process agents play through the same action/observation
//! contract that [`core::AgentEnv`] offers in-process.
//!
//! # Protocol Overview
//!
//! Line-delimited JSON over TCP:
//!
//! 1. **Connection**: client connects (default 127.0.0.1:7777)
//! 2. **Handshake**: client sends `hello`, server answers `welcome`
//! 3. **Controller**: the first client to say hello controls the game; later
//!    clients are observers until the controller disconnects
//! 4. **Acting**: the controller sends `action` (`left`, `right`, `down`,
//!    `up`) or `reset`; any client may send `observe`
//!
//! The game loop holds each action for one decision cycle (seven 16ms
//! frames, tapped on the last) and answers with the `observation` taken after
//! it. Problems are reported with `error`.
//!
//! # Environment Variables
//!
//! - `QTETRIS_AI_HOST`: bind address (default "127.0.0.1")
//! - `QTETRIS_AI_PORT`: port (default 7777)
//! - `QTETRIS_AI_MAX_PENDING`: request queue size (default 16)
//! - `QTETRIS_AI_LOG_PATH`: append every wire message to this JSONL file
//! - `QTETRIS_AI_DISABLED`: "1" or "true" disables the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"my-agent"}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller","actions":["left","right","down","up"]}
//! Client -> Server: {"type":"action","seq":2,"action":"left"}
//! Server -> Client: {"type":"observation","seq":2,"ts":...,"grid":[[0,0,...],...],"score":0,...}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use qtetris_core as core;
pub use qtetris_types as types;

pub use protocol::{build_observation, ClientMessage, ServerMessage};
pub use runtime::{Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, ServerConfig};
