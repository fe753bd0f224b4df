//! qtetris (workspace facade crate).
//!
//! Re-exports the workspace crates under `qtetris::{core,adapter,agent,term,input,types}`
//! and holds the command line parsing and the play loop shared by the binaries.

pub mod cli;
pub mod game;

pub use qtetris_adapter as adapter;
pub use qtetris_agent as agent;
pub use qtetris_core as core;
pub use qtetris_input as input;
pub use qtetris_term as term;
pub use qtetris_types as types;
