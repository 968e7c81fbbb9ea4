use crate::{SolverLimits, DEFAULT_MAX_OPERATIONS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STEP_DELAY_MS: u64 = 700;
pub const MIN_STEP_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [Self::Debug, Self::Info, Self::Warn, Self::Error];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub coin_game_step_delay_ms: u64,
    pub log_level: LogLevel,
    pub max_merge_operations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coin_game_step_delay_ms: DEFAULT_STEP_DELAY_MS,
            log_level: LogLevel::Info,
            max_merge_operations: DEFAULT_MAX_OPERATIONS,
        }
    }
}

impl AppConfig {
    pub fn solver_limits(&self) -> SolverLimits {
        SolverLimits {
            max_operations: self.max_merge_operations,
        }
    }
}
