//! Q-learning agent
//!
//! States are the compact occupancy keys produced by
//! [`Observation::state_key`](crate::core::Observation::state_key). Each row
//! of the table holds one value per [`AgentAction`], in [`AgentAction::ALL`]
//! order, and is created with zeros the first time its state is seen.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::{RandomSource, SimpleRng};
use crate::types::AgentAction;

const ACTIONS: usize = AgentAction::ALL.len();

/// State key -> action values
pub type QTable = HashMap<String, [f64; ACTIONS]>;

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("q-table json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Learning hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QParams {
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Probability of picking a random action
    pub exploration_rate: f64,
    /// Multiplier applied to the exploration rate after each learning step
    pub exploration_decay: f64,
}

impl Default for QParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration_rate: 1.0,
            exploration_decay: 0.995,
        }
    }
}

pub struct QLearningAgent {
    table: QTable,
    params: QParams,
    rng: SimpleRng,
}

impl QLearningAgent {
    pub fn new(params: QParams, rng: SimpleRng) -> Self {
        Self {
            table: QTable::new(),
            params,
            rng,
        }
    }

    /// Default parameters with a seeded exploration RNG
    pub fn with_seed(seed: u32) -> Self {
        Self::new(QParams::default(), SimpleRng::new(seed))
    }

    pub fn params(&self) -> QParams {
        self.params
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Action values for `state`, if the state has been seen
    pub fn values(&self, state: &str) -> Option<&[f64; ACTIONS]> {
        self.table.get(state)
    }

    fn row(&mut self, state: &str) -> &mut [f64; ACTIONS] {
        self.table
            .entry(state.to_string())
            .or_insert([0.0; ACTIONS])
    }

    /// ε-greedy choice for `state`.
    ///
    /// Registers the state in the table if it is new.
    pub fn choose_action(&mut self, state: &str) -> AgentAction {
        let values = *self.row(state);
        if self.rng.next_f64() < self.params.exploration_rate {
            let i = self.rng.next_range(ACTIONS as u32) as usize;
            AgentAction::ALL[i]
        } else {
            AgentAction::ALL[best_index(&values)]
        }
    }

    /// Best known action for `state`, without exploring
    pub fn greedy_action(&self, state: &str) -> AgentAction {
        let index = self.table.get(state).map_or(0, best_index);
        AgentAction::ALL[index]
    }

    /// Q(s,a) <- (1 - α)·Q(s,a) + α·(r + γ·max Q(s',·))
    pub fn learn(&mut self, state: &str, action: AgentAction, reward: f64, next_state: &str) {
        let next_best = {
            let next = self.row(next_state);
            let i = best_index(next);
            next[i]
        };
        let QParams {
            learning_rate: alpha,
            discount_factor: gamma,
            ..
        } = self.params;
        let q = &mut self.row(state)[action.index()];
        *q = (1.0 - alpha) * *q + alpha * (reward + gamma * next_best);
    }

    pub fn decay_exploration(&mut self) {
        self.params.exploration_rate *= self.params.exploration_decay;
    }

    /// Learn faster: scales the learning rate by `factor` and raises the
    /// exploration decay to the power `factor`.
    pub fn speed_up_learning(&mut self, factor: f64) {
        self.params.learning_rate *= factor;
        self.params.exploration_decay = self.params.exploration_decay.powf(factor);
    }

    /// Write the table as JSON, replacing `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AgentError> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut out, &self.table)?;
        out.flush()?;
        Ok(())
    }

    /// Replace the table with the one stored at `path`.
    ///
    /// A missing file leaves the table untouched and returns `Ok(false)`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, AgentError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.table = serde_json::from_reader(BufReader::new(file))?;
        Ok(true)
    }
}

/// First index holding the maximum value
fn best_index(values: &[f64; ACTIONS]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
