use crate::schema::{RawAppConfig, ValidatedConfig};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tcghub_core::{AppConfig, LogLevel, MIN_STEP_DELAY_MS};

pub const CONFIG_ENV: &str = "TCGHUB_CONFIG";

/// Config path from the environment, if set.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}

pub fn load_app_config(path: &Path) -> anyhow::Result<ValidatedConfig> {
    let raw: RawAppConfig = load_json(path)?;
    Ok(validate_config(&raw))
}

/// Applies every valid key over the defaults. Invalid keys keep their
/// default and add one message to `errors`.
pub fn validate_config(raw: &RawAppConfig) -> ValidatedConfig {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = raw.coin_game_step_delay_ms.as_ref() {
        match value.as_f64().filter(|delay| delay.is_finite()) {
            Some(delay) => {
                config.coin_game_step_delay_ms = delay.max(MIN_STEP_DELAY_MS as f64).round() as u64;
            }
            None => errors.push("coinGameStepDelayMs must be a finite number.".to_string()),
        }
    }

    if let Some(value) = raw.log_level.as_ref() {
        match value.as_str().and_then(LogLevel::from_name) {
            Some(level) => config.log_level = level,
            None => errors.push("logLevel must be one of debug, info, warn, error.".to_string()),
        }
    }

    if let Some(value) = raw.max_merge_operations.as_ref() {
        match value
            .as_u64()
            .filter(|max| *max > 0)
            .and_then(|max| u32::try_from(max).ok())
        {
            Some(max) => config.max_merge_operations = max,
            None => errors.push("maxMergeOperations must be a positive integer.".to_string()),
        }
    }

    ValidatedConfig { config, errors }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
