use crate::BetContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_REELS: u32 = 3;
pub const MAX_REELS: u32 = 20;
pub const REEL_PRESETS: [u32; 3] = [3, 5, 10];
pub const DEFAULT_REEL_COUNT: u32 = 5;
pub const DEFAULT_BET: i64 = 10;
pub const DEFAULT_BASE_JACKPOT: f64 = 1000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("reel count {0} outside 3..=20")]
    ReelCountOutOfRange(u32),
    #[error("bet must be positive, got {0}")]
    NonPositiveBet(i64),
    #[error("base jackpot must be positive, got {0}")]
    NonPositiveJackpot(f64),
}

fn default_reel_count() -> u32 {
    DEFAULT_REEL_COUNT
}

fn default_bet() -> i64 {
    DEFAULT_BET
}

fn default_base_jackpot() -> f64 {
    DEFAULT_BASE_JACKPOT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default = "default_reel_count")]
    pub reel_count: u32,
    #[serde(default = "default_bet")]
    pub bet: i64,
    #[serde(default = "default_base_jackpot")]
    pub base_jackpot: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            reel_count: DEFAULT_REEL_COUNT,
            bet: DEFAULT_BET,
            base_jackpot: DEFAULT_BASE_JACKPOT,
        }
    }
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_REELS..=MAX_REELS).contains(&self.reel_count) {
            return Err(ConfigError::ReelCountOutOfRange(self.reel_count));
        }
        if self.bet <= 0 {
            return Err(ConfigError::NonPositiveBet(self.bet));
        }
        if !(self.base_jackpot.is_finite() && self.base_jackpot > 0.0) {
            return Err(ConfigError::NonPositiveJackpot(self.base_jackpot));
        }
        Ok(())
    }

    pub fn bet_context(&self) -> BetContext {
        BetContext {
            bet: self.bet,
            reel_count: self.reel_count,
            base_jackpot: self.base_jackpot,
        }
    }

    pub fn is_preset(&self) -> bool {
        REEL_PRESETS.contains(&self.reel_count)
    }
}

/// Custom reel input is pinned to the supported range rather than rejected.
pub fn clamp_reel_count(value: i64) -> u32 {
    value.clamp(i64::from(MIN_REELS), i64::from(MAX_REELS)) as u32
}

pub fn clamp_bet(value: i64) -> i64 {
    value.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MachineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.is_preset());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = MachineConfig::default();
        config.reel_count = 2;
        assert_eq!(config.validate(), Err(ConfigError::ReelCountOutOfRange(2)));
        config.reel_count = 21;
        assert_eq!(config.validate(), Err(ConfigError::ReelCountOutOfRange(21)));
        config.reel_count = 7;
        assert!(!config.is_preset());
        config.bet = 0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveBet(0)));
        config.bet = 1;
        config.base_jackpot = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveJackpot(0.0)));
        config.base_jackpot = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn clamps_follow_input_rules() {
        assert_eq!(clamp_reel_count(-4), MIN_REELS);
        assert_eq!(clamp_reel_count(12), 12);
        assert_eq!(clamp_reel_count(99), MAX_REELS);
        assert_eq!(clamp_bet(0), 1);
        assert_eq!(clamp_bet(-10), 1);
        assert_eq!(clamp_bet(25), 25);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: MachineConfig = serde_json::from_str(r#"{"reel_count": 10}"#).expect("parse");
        assert_eq!(config.reel_count, 10);
        assert_eq!(config.bet, DEFAULT_BET);
        assert_eq!(config.base_jackpot, DEFAULT_BASE_JACKPOT);
    }
}
