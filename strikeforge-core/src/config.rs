use crate::geometry::PlayField;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gameplay tunables. Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds of sustained contact needed to destroy a target.
    pub max_health: f64,
    /// Regeneration speed relative to depletion.
    pub regen_rate: f64,
    /// The field height is split into this many units.
    pub unit_divisor: f64,
    pub horizontal_offset_units: f64,
    pub rows: Vec<u32>,
    pub confidence_threshold: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: 0.3,
            regen_rate: 0.3,
            unit_divisor: PlayField::DEFAULT_UNIT_DIVISOR,
            horizontal_offset_units: 2.0,
            rows: vec![1, 2, 3, 4],
            confidence_threshold: 0.3,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_health > 0.0) {
            return Err(invalid("max_health must be positive"));
        }
        if !(self.regen_rate >= 0.0) {
            return Err(invalid("regen_rate must not be negative"));
        }
        if !(self.unit_divisor > 0.0) {
            return Err(invalid("unit_divisor must be positive"));
        }
        if !(self.horizontal_offset_units >= 0.0) {
            return Err(invalid("horizontal_offset_units must not be negative"));
        }
        if self.rows.is_empty() {
            return Err(invalid("rows must list at least one row"));
        }
        // Row 0 sits on the top edge; rows at or past the divisor fall off the bottom.
        if let Some(row) = self
            .rows
            .iter()
            .find(|&&row| row == 0 || row as f64 >= self.unit_divisor)
        {
            return Err(ConfigError::Invalid(format!(
                "row {row} is outside 1..{}",
                self.unit_divisor
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(invalid("confidence_threshold must be within [0, 1]"));
        }
        Ok(())
    }

    pub fn play_field(&self, width: f64, height: f64) -> PlayField {
        PlayField::with_unit_divisor(width, height, self.unit_divisor)
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}
