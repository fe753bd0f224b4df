//! Episode runner
//!
//! One episode plays a fresh session until game over (or the step cap),
//! choosing, stepping, learning and decaying once per decision cycle.

use serde::Serialize;

use crate::core::AgentEnv;
use crate::q_learning::QLearningAgent;
use crate::reward::reward;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrainOptions {
    /// Stop the episode after this many decision cycles
    pub max_steps: Option<u32>,
}

/// Summary of one episode, written as a JSON line by the trainer binary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub episode: u32,
    pub seed: u32,
    pub steps: u32,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub total_reward: f64,
    pub exploration_rate: f64,
    pub states: usize,
    pub game_over: bool,
}

/// Play the env's current session to the end, learning as it goes.
///
/// The env is left in its final state; the caller resets it between
/// episodes.
pub fn run_episode(
    env: &mut AgentEnv,
    agent: &mut QLearningAgent,
    options: &TrainOptions,
) -> EpisodeStats {
    let mut state = env.observe().state_key();
    let mut steps = 0u32;
    let mut total_reward = 0.0;
    let mut game_over = env.session().is_game_over();

    while !game_over && options.max_steps.map_or(true, |max| steps < max) {
        let action = agent.choose_action(&state);
        let step = env.step(action);
        let r = reward(&step);
        let next_state = step.observation.state_key();

        agent.learn(&state, action, r, &next_state);
        agent.decay_exploration();

        total_reward += r;
        steps += 1;
        game_over = step.game_over;
        state = next_state;
    }

    let session = env.session();
    EpisodeStats {
        episode: env.episode(),
        seed: env.seed(),
        steps,
        score: session.score(),
        lines: session.lines(),
        level: session.level(),
        total_reward,
        exploration_rate: agent.params().exploration_rate,
        states: agent.table().len(),
        game_over,
    }
}
