//! Terminal front-end rendering.
//!
//! A [`GameView`] paints a [`core::GameSnapshot`] into a [`FrameBuffer`]
//! (pure, unit-testable), and a [`TerminalRenderer`] flushes framebuffers to
//! the real terminal through crossterm, redrawing only cells that changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use qtetris_core as core;
pub use qtetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
