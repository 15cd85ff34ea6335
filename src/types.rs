use crate::scenario::ScenarioConfig;
use crate::subtractor::SubtractorParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub subtractor: SubtractorParams,
    pub scenario: ScenarioConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Env-filter directive, e.g. "costmap_motion=debug".
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// Dump once this many snapshots have accumulated.
    pub dump_after: usize,
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "costmap_motion=info".to_string(),
            },
            subtractor: SubtractorParams::default(),
            scenario: ScenarioConfig::default(),
            history: HistoryConfig {
                enabled: false,
                dump_after: 10,
                path: "history.yml".to_string(),
            },
        }
    }
}
