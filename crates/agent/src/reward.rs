//! Step reward

use crate::core::StepResult;

/// +1 when the step cleared rows, -1 when it ended the game, 0 otherwise.
///
/// A clear takes precedence over a top-out in the same step.
pub fn reward(step: &StepResult) -> f64 {
    if step.lines_cleared > 0 {
        1.0
    } else if step.game_over {
        -1.0
    } else {
        0.0
    }
}
