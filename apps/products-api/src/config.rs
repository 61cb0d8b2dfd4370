//! Configuration for Products API

use clap::Parser;
use core_config::{
    app_info, env_or_default, env_parse_or, server::ServerConfig, AppInfo, ConfigError, FromEnv,
};
use std::time::Duration;

pub use core_config::Environment;

/// Default location of the externally assembled Swagger document.
pub const DEFAULT_SOURCE: &str = "./swagger.json";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "products-api")]
#[command(about = "Serve the products API together with its live Swagger documentation")]
pub struct Cli {
    /// Path or URL of the swagger.json to serve. Overrides SWAGGER_SOURCE.
    #[arg(short, long)]
    pub source: Option<String>,
}

/// Where the Swagger document comes from and how it is kept fresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocsConfig {
    pub source: String,
    /// Interval between fetches of a remote document, never zero
    pub poll_interval: Duration,
    /// Quiet period after a local file change before reloading
    pub debounce: Duration,
}

impl DocsConfig {
    /// Replaces the configured source when one was given on the command line.
    pub fn with_source_override(mut self, source: Option<String>) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        self
    }
}

fn non_zero(key: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

impl FromEnv for DocsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let poll_secs = env_parse_or("SWAGGER_POLL_INTERVAL_SECS", 30)?;

        Ok(Self {
            source: env_or_default("SWAGGER_SOURCE", DEFAULT_SOURCE),
            poll_interval: Duration::from_secs(non_zero("SWAGGER_POLL_INTERVAL_SECS", poll_secs)?),
            debounce: Duration::from_millis(env_parse_or("SWAGGER_DEBOUNCE_MS", 500)?),
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub docs: DocsConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let docs = DocsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            docs,
        })
    }
}
