//! Core simulation - pure, deterministic, and testable
//!
//! Everything a falling-block game needs to run headless: the grid, the
//! shape catalog, collision and locking, line clears, scoring and the
//! session loop that ties them together on a real-time tick. There is no
//! I/O here, so the same code drives the terminal front-end, the TCP
//! adapter and agent training.
//!
//! # Module Structure
//!
//! - [`grid`]: 10x20 locked-cell matrix
//! - [`shape`]: the seven tetrominoes and clockwise rotation
//! - [`collision`]: placement checks, locking and drop distance
//! - [`line_clear`]: full-row removal and compaction
//! - [`scoring`]: line and placement points, fall-speed progression
//! - [`rng`]: injected randomness for uniform piece selection
//! - [`piece`]: the active falling piece
//! - [`session`]: the per-tick state machine
//! - [`snapshot`]: read-only frame copies for renderers and observers
//! - [`env`]: one-action-per-cycle environment for automated players
//! - [`config`]: timing configuration from the environment
//!
//! # Rules
//!
//! - Pieces spawn at (3, 0) and are picked uniformly at random
//! - Rotation is clockwise with no wall kicks
//! - Left/right repeat every 100ms while held; soft drop moves a row per tick
//! - Gravity drops a row whenever the fall timer exceeds the threshold
//! - The level rises every 10s of play and gravity speeds up ×0.9
//! - A spawn that collides ends the game
//!
//! # Example
//!
//! ```
//! use qtetris_core::Session;
//! use qtetris_types::{Command, Controls};
//!
//! let mut session = Session::with_seed(12345);
//! let report = session.tick(16, &Controls::only(Command::HardDrop));
//!
//! assert_eq!(report.locks, 1);
//! assert!(session.score() > 0); // Hard drop awards placement points
//! ```

pub mod collision;
pub mod config;
pub mod env;
pub mod grid;
pub mod line_clear;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shape;
pub mod snapshot;

pub use qtetris_types as types;

// Re-export commonly used types for convenience
pub use collision::{check_collision, drop_distance, lock};
pub use config::{ConfigError, SessionConfig};
pub use env::{AgentEnv, Observation, StepResult};
pub use grid::{create_grid, Grid};
pub use line_clear::clear_lines;
pub use piece::ActivePiece;
pub use rng::{random_shape, RandomSource, ScriptedSource, SimpleRng};
pub use scoring::{calculate_placement_score, calculate_score, next_fall_speed};
pub use session::{LockEvent, Phase, Session, TickReport};
pub use shape::{rotate, Shape, ShapeKind};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
