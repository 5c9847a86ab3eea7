use crate::models::MissingDayPolicy;
use std::{env, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got '{0}'")]
    Port(String),
    #[error("MISSING_DAY_POLICY: {0}")]
    Policy(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub missing_day_policy: MissingDayPolicy,
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Port(value))?,
            None => 8080,
        };
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/foods.json"));
        let missing_day_policy = match lookup("MISSING_DAY_POLICY") {
            Some(value) => value.parse().map_err(ConfigError::Policy)?,
            None => MissingDayPolicy::default(),
        };
        let json_logs = lookup("LOG_FORMAT").is_some_and(|v| v == "json");

        Ok(Self {
            port,
            data_path,
            missing_day_policy,
            json_logs,
        })
    }
}
