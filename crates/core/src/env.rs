//! Agent environment - the action/observation contract for automated players
//!
//! An agent issues one [`AgentAction`] per decision cycle and gets back an
//! [`Observation`] of the rendered frame. A cycle is [`DECISION_FRAMES`]
//! frames of [`TICK_MS`]; the action is held for exactly the last frame, by
//! which point the move-repeat timer has always passed the move delay.

use std::fmt::Write as _;

use crate::config::SessionConfig;
use crate::rng::SimpleRng;
use crate::session::Session;
use crate::snapshot::GameSnapshot;
use crate::types::{AgentAction, Controls, DECISION_FRAMES, GRID_HEIGHT, GRID_WIDTH, TICK_MS};

const WIDTH: usize = GRID_WIDTH as usize;
const HEIGHT: usize = GRID_HEIGHT as usize;

/// What an agent sees after each decision cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    /// Rendered occupancy: locked cells plus the active piece
    pub occupancy: [[bool; WIDTH]; HEIGHT],
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl Observation {
    pub fn from_snapshot(snap: &GameSnapshot) -> Self {
        Self {
            occupancy: snap.occupancy(),
            score: snap.score,
            level: snap.level,
            lines: snap.lines,
            game_over: snap.game_over,
        }
    }

    /// Stable compact key of the occupancy grid.
    ///
    /// The 200 cells are packed row-major, MSB first, into 50 hex digits.
    pub fn state_key(&self) -> String {
        let mut key = String::with_capacity(WIDTH * HEIGHT / 4);
        let mut nibble = 0u8;
        for (i, &filled) in self.occupancy.iter().flatten().enumerate() {
            nibble = (nibble << 1) | u8::from(filled);
            if i % 4 == 3 {
                let _ = write!(key, "{:x}", nibble);
                nibble = 0;
            }
        }
        key
    }

    /// Occupancy as 0/1 rows (wire-friendly)
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.occupancy
            .iter()
            .map(|row| row.iter().map(|&b| u8::from(b)).collect())
            .collect()
    }
}

/// Result of one decision cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub observation: Observation,
    /// Rows cleared during the cycle
    pub lines_cleared: u32,
    /// Score gained during the cycle
    pub score_delta: u32,
    pub game_over: bool,
}

/// In-process environment wrapping one [`Session`] at a time
#[derive(Debug, Clone)]
pub struct AgentEnv {
    session: Session,
    config: SessionConfig,
    seed: u32,
    episode: u32,
}

impl AgentEnv {
    pub fn new(seed: u32, config: SessionConfig) -> Self {
        Self {
            session: Session::new(config, SimpleRng::new(seed)),
            config,
            seed,
            episode: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Zero-based count of resets so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn observe(&self) -> Observation {
        Observation::from_snapshot(&self.session.snapshot())
    }

    /// Run one decision cycle with `action` tapped on its final frame.
    ///
    /// Stops early if the session ends mid-cycle. Stepping a finished
    /// session just reports game over again.
    pub fn step(&mut self, action: AgentAction) -> StepResult {
        let mut lines_cleared = 0;
        let mut score_delta = 0u32;
        let mut game_over = self.session.is_game_over();

        for frame in 0..DECISION_FRAMES {
            if game_over {
                break;
            }
            let controls = if frame + 1 == DECISION_FRAMES {
                Controls::from(action)
            } else {
                Controls::idle()
            };
            let report = self.session.tick(TICK_MS, &controls);
            lines_cleared += report.lines_cleared;
            score_delta = score_delta.saturating_add(report.score_delta);
            game_over = report.game_over;
        }

        StepResult {
            observation: self.observe(),
            lines_cleared,
            score_delta,
            game_over,
        }
    }

    /// Start a fresh session with the next seed.
    pub fn reset(&mut self) -> Observation {
        self.seed = self.seed.wrapping_add(1);
        self.episode = self.episode.wrapping_add(1);
        self.session = Session::new(self.config, SimpleRng::new(self.seed));
        self.observe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_observation() {
        let env = AgentEnv::new(3, SessionConfig::default());
        let obs = env.observe();
        assert!(!obs.game_over);
        assert_eq!(obs.level, 1);
        // Only the spawned piece is visible.
        assert_eq!(obs.occupancy.iter().flatten().filter(|&&b| b).count(), 4);
    }

    #[test]
    fn test_state_key_layout() {
        let mut obs = AgentEnv::new(1, SessionConfig::default()).observe();
        obs.occupancy = [[false; WIDTH]; HEIGHT];
        assert_eq!(obs.state_key(), "0".repeat(50));

        obs.occupancy[0][0] = true;
        let key = obs.state_key();
        assert_eq!(key.len(), 50);
        assert!(key.starts_with('8'));

        obs.occupancy[0][0] = false;
        obs.occupancy[19][9] = true;
        assert!(obs.state_key().ends_with('1'));
    }

    #[test]
    fn test_step_taps_action_once() {
        let mut env = AgentEnv::new(5, SessionConfig::default());
        let x0 = env.session().active().unwrap().x;
        env.step(AgentAction::MoveLeft);
        assert_eq!(env.session().active().unwrap().x, x0 - 1);
        env.step(AgentAction::MoveRight);
        assert_eq!(env.session().active().unwrap().x, x0);
    }

    #[test]
    fn test_step_advances_time() {
        let mut env = AgentEnv::new(5, SessionConfig::default());
        env.step(AgentAction::Rotate);
        assert_eq!(env.session().fall_timer_ms(), DECISION_FRAMES * TICK_MS);
        assert_eq!(env.session().level_timer_ms(), DECISION_FRAMES * TICK_MS);
    }

    #[test]
    fn test_rotating_in_place_until_game_over() {
        // Without lateral moves no row can fill, so the stack must top out.
        let mut env = AgentEnv::new(11, SessionConfig::default());
        let mut steps = 0;
        loop {
            let result = env.step(AgentAction::Rotate);
            steps += 1;
            if result.game_over {
                assert!(result.observation.game_over);
                break;
            }
            assert!(steps < 20_000, "game never ended");
        }
        let again = env.step(AgentAction::MoveLeft);
        assert!(again.game_over);
        assert_eq!(again.lines_cleared, 0);
    }

    #[test]
    fn test_reset_advances_seed_and_episode() {
        let mut env = AgentEnv::new(7, SessionConfig::default());
        env.step(AgentAction::SoftDrop);
        let obs = env.reset();
        assert_eq!(env.seed(), 8);
        assert_eq!(env.episode(), 1);
        assert_eq!(obs.score, 0);
        assert!(!obs.game_over);
        assert_eq!(env.session().pieces(), 0);
    }
}
