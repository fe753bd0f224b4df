//! Command line parsing for the `qtetris` and `qtetris-train` binaries.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    /// Piece sequence seed; derived from the clock when absent
    pub seed: Option<u32>,
    /// Run without a terminal, driven only by the TCP adapter
    pub headless: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Episodes to run; `None` trains until interrupted
    pub episodes: Option<u32>,
    pub q_table: PathBuf,
    pub seed: u32,
    /// Passed to `speed_up_learning` before training when set
    pub speed_up: Option<f64>,
    pub max_steps: Option<u32>,
    /// JSONL file receiving one record per episode
    pub log: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: None,
            q_table: PathBuf::from("q_table.json"),
            seed: 1,
            speed_up: Some(3.0),
            max_steps: None,
            log: None,
        }
    }
}

pub fn parse_play_args(args: &[String]) -> Result<PlayConfig> {
    let mut config = PlayConfig {
        seed: None,
        headless: false,
    };
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                config.seed = Some(parse_value(args.get(i), "--seed")?);
            }
            "--headless" => config.headless = true,
            other => return Err(anyhow!("qtetris: unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(config)
}

pub fn parse_train_args(args: &[String]) -> Result<TrainConfig> {
    let mut config = TrainConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--episodes" => {
                i += 1;
                config.episodes = Some(parse_value(args.get(i), "--episodes")?);
            }
            "--q-table" => {
                i += 1;
                config.q_table = PathBuf::from(value(args.get(i), "--q-table")?);
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(args.get(i), "--seed")?;
            }
            "--speed-up" => {
                i += 1;
                let factor: f64 = parse_value(args.get(i), "--speed-up")?;
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(anyhow!("train: --speed-up must be positive, got {}", factor));
                }
                config.speed_up = Some(factor);
            }
            "--no-speed-up" => config.speed_up = None,
            "--max-steps" => {
                i += 1;
                config.max_steps = Some(parse_value(args.get(i), "--max-steps")?);
            }
            "--log" => {
                i += 1;
                config.log = Some(PathBuf::from(value(args.get(i), "--log")?));
            }
            other => return Err(anyhow!("train: unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(config)
}

fn value<'a>(arg: Option<&'a String>, flag: &str) -> Result<&'a str> {
    arg.map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_value<T: std::str::FromStr>(arg: Option<&String>, flag: &str) -> Result<T> {
    let v = value(arg, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}
