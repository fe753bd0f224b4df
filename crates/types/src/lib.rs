//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the simulation core, the terminal front-end, the TCP adapter and the
//! learning agent alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: (3, 0) for every piece
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval of the real-time loop (~60 FPS) |
//! | `BASE_FALL_SPEED_MS` | 500 | Gravity threshold at level 1 |
//! | `MOVE_DELAY_MS` | 100 | Left/right repeat delay |
//! | `LEVEL_UP_INTERVAL_MS` | 10000 | Play time per level |
//!
//! # Examples
//!
//! ```
//! use qtetris_types::{AgentAction, Command, GRID_HEIGHT, GRID_WIDTH};
//!
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 20);
//!
//! let action = AgentAction::from_str("left").unwrap();
//! assert_eq!(action.command(), Command::MoveLeft);
//! ```

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells (20 rows)
pub const GRID_HEIGHT: u8 = 20;

/// Spawn column of the active piece's bounding box
pub const SPAWN_X: i8 = 3;

/// Spawn row of the active piece's bounding box
pub const SPAWN_Y: i8 = 0;

/// Highest color index a locked cell can hold (colors are 1..=7, 0 is empty)
pub const MAX_COLOR: u8 = 7;

/// Fixed frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity threshold at the starting level (one row every 500ms)
pub const BASE_FALL_SPEED_MS: f64 = 500.0;

/// Left/right repeat delay in milliseconds
pub const MOVE_DELAY_MS: u32 = 100;

/// Play time after which the level advances
pub const LEVEL_UP_INTERVAL_MS: u32 = 10_000;

/// Factor applied to the fall speed threshold on each level-up
pub const FALL_SPEED_SCALE: f64 = 0.9;

/// Level a new session starts at
pub const START_LEVEL: u32 = 1;

/// Frames per agent decision cycle (7 × 16ms = 112ms)
pub const DECISION_FRAMES: u32 = 7;

/// Line clear scoring table
///
/// Base points for clearing N lines at once:
/// - 0 lines: 0 points
/// - 1 line: 50 points
/// - 2 lines: 100 points
/// - 3 lines: 200 points
/// - 4 lines: 300 points
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 50, 100, 200, 300];

/// A cell on the grid: 0 is empty, 1..=7 is a locked color index
pub type Cell = u8;

/// Commands the simulation consumes from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Rotate the active piece 90° clockwise (edge-triggered)
    Rotate,
    /// Shift one column left (held, rate-limited)
    MoveLeft,
    /// Shift one column right (held, rate-limited)
    MoveRight,
    /// Move one row down while held
    SoftDrop,
    /// Drop to the lowest valid row and lock (edge-triggered)
    HardDrop,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use qtetris_types::Command;
    ///
    /// assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
    /// assert_eq!(Command::from_str("ROTATE"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotate" => Some(Command::Rotate),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Rotate => "rotate",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
        }
    }
}

/// The fixed action vocabulary of an automated player.
///
/// Names follow the key an agent would press: `left`, `right`, `down`, `up`.
/// Hard drop is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

impl AgentAction {
    /// All actions in a stable order (the column order of a value table).
    pub const ALL: [AgentAction; 4] = [
        AgentAction::MoveLeft,
        AgentAction::MoveRight,
        AgentAction::SoftDrop,
        AgentAction::Rotate,
    ];

    /// Parse from the key-name form (`left`, `right`, `down`, `up`)
    ///
    /// # Examples
    ///
    /// ```
    /// use qtetris_types::AgentAction;
    ///
    /// assert_eq!(AgentAction::from_str("up"), Some(AgentAction::Rotate));
    /// assert_eq!(AgentAction::from_str("Down"), Some(AgentAction::SoftDrop));
    /// assert_eq!(AgentAction::from_str("space"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(AgentAction::MoveLeft),
            "right" => Some(AgentAction::MoveRight),
            "down" => Some(AgentAction::SoftDrop),
            "up" => Some(AgentAction::Rotate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::MoveLeft => "left",
            AgentAction::MoveRight => "right",
            AgentAction::SoftDrop => "down",
            AgentAction::Rotate => "up",
        }
    }

    /// Position of this action in [`AgentAction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            AgentAction::MoveLeft => 0,
            AgentAction::MoveRight => 1,
            AgentAction::SoftDrop => 2,
            AgentAction::Rotate => 3,
        }
    }

    /// The simulation command this action drives
    pub fn command(&self) -> Command {
        match self {
            AgentAction::MoveLeft => Command::MoveLeft,
            AgentAction::MoveRight => Command::MoveRight,
            AgentAction::SoftDrop => Command::SoftDrop,
            AgentAction::Rotate => Command::Rotate,
        }
    }
}

/// Input state for one tick.
///
/// `rotate` and `hard_drop` are edge flags (pressed this tick); `left`,
/// `right` and `soft_drop` are held flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Controls {
    pub rotate: bool,
    pub hard_drop: bool,
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
}

impl Controls {
    /// No input this tick
    pub fn idle() -> Self {
        Self::default()
    }

    /// Controls with exactly one command active
    pub fn only(command: Command) -> Self {
        let mut c = Self::default();
        c.press(command);
        c
    }

    /// Set the flag for `command`
    pub fn press(&mut self, command: Command) {
        match command {
            Command::Rotate => self.rotate = true,
            Command::MoveLeft => self.left = true,
            Command::MoveRight => self.right = true,
            Command::SoftDrop => self.soft_drop = true,
            Command::HardDrop => self.hard_drop = true,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

impl From<AgentAction> for Controls {
    fn from(action: AgentAction) -> Self {
        Controls::only(action.command())
    }
}
