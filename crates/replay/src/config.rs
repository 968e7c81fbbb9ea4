use tcghub_core::{AppConfig, DEFAULT_STEP_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Pause after each logged operation, before the merged coins are shown.
    pub step_delay_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }
}

impl From<&AppConfig> for ReplayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            step_delay_ms: config.coin_game_step_delay_ms,
        }
    }
}
