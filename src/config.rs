//! Engine configuration.
//!
//! Every field has a default matching the shipped game balance, so an empty
//! YAML document (or no file at all) yields a working engine.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Key under which the save blob is stored.
    pub storage_key: String,
    /// Directory used by the file-backed store.
    pub save_dir: PathBuf,
    /// Timer periods.
    pub timing: TimingConfig,
    /// Rule switches.
    pub rules: RulesConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: "earthGameState".to_string(),
            save_dir: PathBuf::from("./saves"),
            timing: TimingConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        let periods = [
            ("timing.passive_income_interval_ms", t.passive_income_interval_ms),
            ("timing.autosave_interval_ms", t.autosave_interval_ms),
            ("timing.continuous_tap_interval_ms", t.continuous_tap_interval_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "period must be > 0",
                });
            }
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

/// Timer periods, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub passive_income_interval_ms: u64,
    pub autosave_interval_ms: u64,
    pub continuous_tap_interval_ms: u64,
    /// Extra wait after an ability's active window before it can be used again.
    pub ability_cooldown_ms: u64,
    /// How many missed periods a periodic timer replays before it skips
    /// ahead to "now".
    pub max_catch_up: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            passive_income_interval_ms: 1_000,
            autosave_interval_ms: 5_000,
            continuous_tap_interval_ms: 333,
            ability_cooldown_ms: 120_000,
            max_catch_up: 10,
        }
    }
}

/// Gameplay rule switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// While land stealing is active, each tap recomputes income-per-click
    /// from base 1. Setting this uses the regular base of 100 instead.
    pub steal_uses_standard_click_base: bool,
}
