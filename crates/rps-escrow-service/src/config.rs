//! Service configuration from environment variables.

use rps_core::config::{DEFAULT_MAX_STAKE, DEFAULT_MIN_DEADLINE_WINDOW, DEFAULT_MIN_STAKE};
use rps_core::{ConfigError, EscrowConfig};
use std::str::FromStr;
use std::time::Duration;

/// Source of deadline time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockMode {
    /// Logical tick counter, advanced by /api/system/tick or the block producer
    Ticks,
    /// Unix seconds
    Wall,
}

impl FromStr for ClockMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ticks" | "tick" | "blocks" => Ok(ClockMode::Ticks),
            "wall" | "time" => Ok(ClockMode::Wall),
            _ => Err(ConfigError::InvalidValue {
                name: "RPS_CLOCK",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub escrow: EscrowConfig,
    pub clock: ClockMode,
    /// Advance the tick clock once per interval (tick mode only)
    pub block_interval: Option<Duration>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT", 3000u16)?;
        let min_stake = parse_var(&lookup, "RPS_MIN_STAKE", DEFAULT_MIN_STAKE)?;
        let max_stake = parse_var(&lookup, "RPS_MAX_STAKE", DEFAULT_MAX_STAKE)?;
        let min_window = parse_var(&lookup, "RPS_MIN_DEADLINE_WINDOW", DEFAULT_MIN_DEADLINE_WINDOW)?;
        let clock = match lookup("RPS_CLOCK") {
            Some(value) => value.parse()?,
            None => ClockMode::Ticks,
        };
        let interval_ms = parse_var(&lookup, "RPS_BLOCK_INTERVAL_MS", 0u64)?;
        let block_interval =
            (clock == ClockMode::Ticks && interval_ms > 0).then(|| Duration::from_millis(interval_ms));

        Ok(Self {
            port,
            escrow: EscrowConfig::new(min_stake, max_stake, min_window)?,
            clock,
            block_interval,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
