use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use tcghub_core::{AppConfig, LogLevel};

/// Config file contents before validation. Values are kept loose so a
/// wrongly typed key becomes a warning instead of a parse failure; keys not
/// listed here are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAppConfig {
    #[serde(default)]
    pub coin_game_step_delay_ms: Option<Value>,
    #[serde(default)]
    pub log_level: Option<Value>,
    #[serde(default)]
    pub max_merge_operations: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub config: AppConfig,
    pub errors: Vec<String>,
}
