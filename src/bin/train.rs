//! Q-learning trainer.
//!
//! Loads the Q-table (if present), plays episodes against fresh sessions and
//! saves the table after every episode. Runs until `--episodes` is reached or
//! the process is interrupted.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

use qtetris::agent::{run_episode, EpisodeStats, QLearningAgent, TrainOptions};
use qtetris::cli::parse_train_args;
use qtetris::core::{AgentEnv, SessionConfig};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_train_args(&args)?;
    let session_config = SessionConfig::from_env()?;

    let mut agent = QLearningAgent::with_seed(config.seed);
    let loaded = agent
        .load(&config.q_table)
        .with_context(|| format!("failed to load {}", config.q_table.display()))?;
    if loaded {
        println!(
            "[Train] Loaded {} states from {}",
            agent.table().len(),
            config.q_table.display()
        );
    }
    if let Some(factor) = config.speed_up {
        agent.speed_up_learning(factor);
    }

    let mut log = match &config.log {
        Some(path) => Some(open_log(path)?),
        None => None,
    };

    let options = TrainOptions {
        max_steps: config.max_steps,
    };
    let mut env = AgentEnv::new(config.seed, session_config);
    let mut best_score = 0;

    loop {
        let stats = run_episode(&mut env, &mut agent, &options);
        best_score = best_score.max(stats.score);
        println!(
            "[Train] Episode {}: steps={} score={} lines={} reward={:+} epsilon={:.4} states={} best={}",
            stats.episode,
            stats.steps,
            stats.score,
            stats.lines,
            stats.total_reward,
            stats.exploration_rate,
            stats.states,
            best_score
        );

        agent
            .save(&config.q_table)
            .with_context(|| format!("failed to save {}", config.q_table.display()))?;
        if let Some(out) = log.as_mut() {
            write_record(out, &stats)?;
        }

        if config
            .episodes
            .is_some_and(|episodes| stats.episode + 1 >= episodes)
        {
            break;
        }
        env.reset();
    }

    Ok(())
}

fn open_log(path: &std::path::Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_record(out: &mut BufWriter<File>, stats: &EpisodeStats) -> Result<()> {
    serde_json::to_writer(&mut *out, stats)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
