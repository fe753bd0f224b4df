//! Held-key tracker for terminal environments.
//!
//! Terminals report key presses (and auto-repeat them while held) but often
//! never report releases. A key counts as held until no press for it has been
//! seen for the release timeout. Rotate and hard-drop are edges: they fire on
//! the next tick after the press and are then consumed.

use crossterm::event::KeyCode;

use crate::map::handle_key_event;
use crate::types::{Command, Controls, MOVE_DELAY_MS};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

// Must not exceed the move delay: a lone press stays held for this long, and
// a longer hold would earn a second move-repeat window.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = MOVE_DELAY_MS;

/// Turns key events into one [`Controls`] per tick.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    rotate_pending: bool,
    hard_drop_pending: bool,
    since_horizontal_ms: u32,
    since_down_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            rotate_pending: false,
            hard_drop_pending: false,
            since_horizontal_ms: 0,
            since_down_ms: 0,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    /// Keep this at or below the session's move delay, or one press moves
    /// the piece twice.
    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    /// Record a key press (or auto-repeat). Returns the mapped command.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<Command> {
        let command = handle_key_event(code.into())?;
        match command {
            Command::MoveLeft => {
                self.horizontal = HorizontalDirection::Left;
                self.since_horizontal_ms = 0;
            }
            Command::MoveRight => {
                self.horizontal = HorizontalDirection::Right;
                self.since_horizontal_ms = 0;
            }
            Command::SoftDrop => {
                self.down_held = true;
                self.since_down_ms = 0;
            }
            Command::Rotate => self.rotate_pending = true,
            Command::HardDrop => self.hard_drop_pending = true,
        }
        Some(command)
    }

    /// Record a key release, for terminals that report them.
    pub fn handle_key_release(&mut self, code: KeyCode) {
        match handle_key_event(code.into()) {
            Some(Command::MoveLeft) if self.horizontal == HorizontalDirection::Left => {
                self.horizontal = HorizontalDirection::None;
            }
            Some(Command::MoveRight) if self.horizontal == HorizontalDirection::Right => {
                self.horizontal = HorizontalDirection::None;
            }
            Some(Command::SoftDrop) => self.down_held = false,
            _ => {}
        }
    }

    /// Produce the controls for a tick of `elapsed_ms` and consume edges.
    pub fn update(&mut self, elapsed_ms: u32) -> Controls {
        self.since_horizontal_ms = self.since_horizontal_ms.saturating_add(elapsed_ms);
        self.since_down_ms = self.since_down_ms.saturating_add(elapsed_ms);

        // Auto-release when terminal does not emit release events.
        if self.since_horizontal_ms > self.key_release_timeout_ms {
            self.horizontal = HorizontalDirection::None;
        }
        if self.since_down_ms > self.key_release_timeout_ms {
            self.down_held = false;
        }

        let controls = Controls {
            rotate: self.rotate_pending,
            hard_drop: self.hard_drop_pending,
            left: self.horizontal == HorizontalDirection::Left,
            right: self.horizontal == HorizontalDirection::Right,
            soft_drop: self.down_held,
        };
        self.rotate_pending = false;
        self.hard_drop_pending = false;
        controls
    }

    pub fn reset(&mut self) {
        *self = Self::new().with_key_release_timeout_ms(self.key_release_timeout_ms);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
