// ⚙️ Configuration - where the ledger lives and how strict it is
//
// Loaded from a JSON file (every field optional):
//
// {
//   "data_file": "jobs.csv",
//   "daily_hour_limit": 8,
//   "log_level": "warn"
// }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::manager::DEFAULT_DAILY_HOUR_LIMIT;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "JOB_LEDGER_CONFIG";

/// Environment variable overriding `data_file`.
pub const DATA_ENV: &str = "JOB_LEDGER_DATA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CSV file the binary reads and writes
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Maximum hours per worker per date
    #[serde(default = "default_daily_hour_limit")]
    pub daily_hour_limit: u32,

    /// env_logger filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("jobs.csv")
}

fn default_daily_hour_limit() -> u32 {
    DEFAULT_DAILY_HOUR_LIMIT
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: default_data_file(),
            daily_hour_limit: default_daily_hour_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path.as_ref()))
    }

    /// Config for the current process: the file named by `JOB_LEDGER_CONFIG`
    /// if set, otherwise defaults, then `JOB_LEDGER_DATA` on top.
    pub fn load() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(data_file) = env::var_os(DATA_ENV) {
            config.data_file = PathBuf::from(data_file);
        }

        Ok(config)
    }
}

// ============================================================================
// TESTS
// ============================================================================
