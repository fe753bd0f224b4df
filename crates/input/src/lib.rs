//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`] and tracks which
//! keys are held so the game loop can build one [`crate::types::Controls`]
//! value per tick. Works in terminals that never emit key-release events.

pub mod handler;
pub mod map;

pub use qtetris_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
