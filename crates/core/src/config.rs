//! Session timing configuration
//!
//! Defaults match the classic rules (500ms gravity, 100ms move repeat, a new
//! level every 10s, ×0.9 speed-up, no floor). Every value can be overridden
//! from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `QTETRIS_FALL_SPEED_MS` | 500 |
//! | `QTETRIS_MOVE_DELAY_MS` | 100 |
//! | `QTETRIS_LEVEL_UP_MS` | 10000 |
//! | `QTETRIS_FALL_SPEED_SCALE` | 0.9 |
//! | `QTETRIS_MIN_FALL_SPEED_MS` | unset (no floor) |

use thiserror::Error;

use crate::types::{BASE_FALL_SPEED_MS, FALL_SPEED_SCALE, LEVEL_UP_INTERVAL_MS, MOVE_DELAY_MS};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?} as a number")]
    Parse { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    OutOfRange { var: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Initial gravity threshold in ms
    pub fall_speed_ms: f64,
    /// Left/right repeat delay in ms
    pub move_delay_ms: u32,
    /// Play time per level in ms
    pub level_up_interval_ms: u32,
    /// Multiplier applied to the gravity threshold per level
    pub fall_speed_scale: f64,
    /// Lower bound for the gravity threshold, if any
    pub min_fall_speed_ms: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fall_speed_ms: BASE_FALL_SPEED_MS,
            move_delay_ms: MOVE_DELAY_MS,
            level_up_interval_ms: LEVEL_UP_INTERVAL_MS,
            fall_speed_scale: FALL_SPEED_SCALE,
            min_fall_speed_ms: None,
        }
    }
}

impl SessionConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; missing or blank values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| {
            lookup(var)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(|s| (var, s))
        };

        let mut config = Self::default();

        if let Some((var, s)) = get("QTETRIS_FALL_SPEED_MS") {
            config.fall_speed_ms = parse_positive_f64(var, &s)?;
        }
        if let Some((var, s)) = get("QTETRIS_MOVE_DELAY_MS") {
            config.move_delay_ms = parse_u32(var, &s)?;
        }
        if let Some((var, s)) = get("QTETRIS_LEVEL_UP_MS") {
            config.level_up_interval_ms = parse_u32(var, &s)?;
        }
        if let Some((var, s)) = get("QTETRIS_FALL_SPEED_SCALE") {
            let scale = parse_positive_f64(var, &s)?;
            if scale > 1.0 {
                return Err(ConfigError::OutOfRange {
                    var,
                    reason: "scale must be in (0, 1]",
                });
            }
            config.fall_speed_scale = scale;
        }
        if let Some((var, s)) = get("QTETRIS_MIN_FALL_SPEED_MS") {
            config.min_fall_speed_ms = Some(parse_positive_f64(var, &s)?);
        }

        Ok(config)
    }
}

fn parse_u32(var: &'static str, s: &str) -> Result<u32, ConfigError> {
    s.parse().map_err(|_| ConfigError::Parse {
        var,
        value: s.to_string(),
    })
}

fn parse_positive_f64(var: &'static str, s: &str) -> Result<f64, ConfigError> {
    let v: f64 = s.parse().map_err(|_| ConfigError::Parse {
        var,
        value: s.to_string(),
    })?;
    if !v.is_finite() || v <= 0.0 {
        return Err(ConfigError::OutOfRange {
            var,
            reason: "must be a positive finite number",
        });
    }
    Ok(v)
}
