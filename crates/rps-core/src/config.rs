//! Escrow configuration, fixed at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One thousandth of a whole unit in 10^18 base units.
pub const DEFAULT_MIN_STAKE: u64 = 1_000_000_000_000_000;
/// One whole unit in 10^18 base units.
pub const DEFAULT_MAX_STAKE: u64 = 1_000_000_000_000_000_000;
pub const DEFAULT_MIN_DEADLINE_WINDOW: u64 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_stake {min} exceeds max_stake {max}")]
    InvertedStakeBounds { min: u64, max: u64 },

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Stake bounds (inclusive) and the minimum deadline window in clock ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    min_stake: u64,
    max_stake: u64,
    min_deadline_window: u64,
}

impl EscrowConfig {
    pub fn new(min_stake: u64, max_stake: u64, min_deadline_window: u64) -> Result<Self, ConfigError> {
        if min_stake > max_stake {
            return Err(ConfigError::InvertedStakeBounds {
                min: min_stake,
                max: max_stake,
            });
        }
        Ok(Self {
            min_stake,
            max_stake,
            min_deadline_window,
        })
    }

    pub fn min_stake(&self) -> u64 {
        self.min_stake
    }

    pub fn max_stake(&self) -> u64 {
        self.max_stake
    }

    pub fn min_deadline_window(&self) -> u64 {
        self.min_deadline_window
    }

    pub fn stake_in_range(&self, stake: u64) -> bool {
        (self.min_stake..=self.max_stake).contains(&stake)
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            min_stake: DEFAULT_MIN_STAKE,
            max_stake: DEFAULT_MAX_STAKE,
            min_deadline_window: DEFAULT_MIN_DEADLINE_WINDOW,
        }
    }
}
