//! Scoring module - line-clear points, placement points and level speed
//!
//! Points scale with `(level + 1)`; levels start at 1, so the first level
//! already doubles every award.

use crate::types::LINE_SCORES;

/// Points for clearing `cleared_lines` rows at once.
///
/// `cleared_lines` must be 0..=4. Standard pieces cannot clear more than four
/// rows in one lock, so a larger count means the caller is broken and this
/// panics instead of guessing a value.
pub fn calculate_score(cleared_lines: usize, level: u32) -> u32 {
    assert!(
        cleared_lines < LINE_SCORES.len(),
        "calculate_score: {} cleared lines exceeds the score table",
        cleared_lines
    );
    LINE_SCORES[cleared_lines].saturating_mul(level.saturating_add(1))
}

/// Points for placing a piece that descended `distance` rows.
///
/// One base point plus half a point per row (rounded down), scaled by level.
pub fn calculate_placement_score(distance: u32, level: u32) -> u32 {
    let base: u32 = 1;
    let bonus = distance / 2;
    (base + bonus).saturating_mul(level.saturating_add(1))
}

/// Fall-speed threshold after one level-up.
///
/// With no floor the threshold decays geometrically toward zero.
pub fn next_fall_speed(current_ms: f64, scale: f64, floor_ms: Option<f64>) -> f64 {
    let next = current_ms * scale;
    match floor_ms {
        Some(floor) => next.max(floor),
        None => next,
    }
}
