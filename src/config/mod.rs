#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::DEFAULT_HORIZON_DAYS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::{TomlConfig, DEFAULT_TIMEOUT_SECONDS, MAX_HORIZON_DAYS, MAX_TIMEOUT_SECONDS};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Effective client settings after layering file values and overrides over the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub horizon_days: u32,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            horizon_days: DEFAULT_HORIZON_DAYS,
            log_level: None,
            json_logs: false,
        }
    }
}

impl ClientSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            timeout_seconds: config.request_timeout().as_secs(),
            horizon_days: config.horizon_days(),
            log_level: config.log_level().map(str::to_string),
            json_logs: config.json_logs(),
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn horizon_days(&self) -> u32 {
        self.horizon_days
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        validation::validate_range("horizon_days", self.horizon_days, 1, MAX_HORIZON_DAYS)?;
        Ok(())
    }
}
