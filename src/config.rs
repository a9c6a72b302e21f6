use crate::quote::client::DEFAULT_API_BASE_URL;
use crate::ticker::scheduler::DEFAULT_REFRESH_INTERVAL;
use serde::Deserialize;
use std::error;
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub coingecko_api_key: String, // Optional CoinGecko demo API key, sent as `x-cg-demo-api-key`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String, // Base URL of the CoinGecko v3 API
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64, // Seconds between refresh cycles
    #[serde(default = "default_log_level")]
    pub log_level: String, // Max tracing level: trace, debug, info, warn or error
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coingecko_api_key: String::new(),
            api_base_url: default_api_base_url(),
            refresh_interval: default_refresh_interval(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level `{}`", self.log_level)))
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.refresh_interval == 0 {
            return Err(ConfigError::Invalid(
                "`refresh_interval` must be at least 1 second".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("`api_base_url` is empty".to_string()));
        }
        self.tracing_level()?;
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    JsonParse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref err) => write!(f, "Config IO Error: {}", err),
            ConfigError::JsonParse(ref err) => write!(f, "Config JSON Parse Error: {}", err),
            ConfigError::Invalid(ref err) => write!(f, "Invalid Config: {}", err),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ConfigError::Io(ref err) => Some(err),
            ConfigError::JsonParse(ref err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::JsonParse(err)
    }
}

pub fn parse_config(config_string: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(config_string)?;
    config.validate()
}

/// A missing file is not an error: every field has a default.
pub async fn read_config(file_path: &str) -> Result<Config, ConfigError> {
    match fs::read_to_string(file_path).await {
        Ok(config_string) => parse_config(&config_string),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}
