//! Tabular Q-learning player for the simulation core.
//!
//! - `q_learning`: the agent, its ε-greedy policy and JSON persistence
//! - `reward`: per-step reward from engine facts
//! - `trainer`: episode runner over [`core::AgentEnv`]
//!
//! # Example
//!
//! ```
//! use qtetris_agent::{run_episode, QLearningAgent, TrainOptions};
//! use qtetris_agent::core::{AgentEnv, SessionConfig};
//!
//! let mut env = AgentEnv::new(7, SessionConfig::default());
//! let mut agent = QLearningAgent::with_seed(7);
//! let stats = run_episode(&mut env, &mut agent, &TrainOptions { max_steps: Some(50) });
//! assert!(stats.steps <= 50);
//! ```

pub mod q_learning;
pub mod reward;
pub mod trainer;

pub use qtetris_core as core;
pub use qtetris_types as types;

pub use q_learning::{AgentError, QLearningAgent, QParams, QTable};
pub use reward::reward;
pub use trainer::{run_episode, EpisodeStats, TrainOptions};
