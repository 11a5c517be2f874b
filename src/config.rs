use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_name")]
    pub name: String,
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_server_name() -> String { "Subscription Aggregator API".to_string() }
fn default_shutdown_timeout() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 600 }

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> LogFormat { LogFormat::Json }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SUBS)
    /// 5. `DATABASE_URL` or the `POSTGRES_*` variables for the database URL
    pub fn load() -> Result<Self, ConfigError> {
        let files = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::build(files, &|key| std::env::var(key).ok())
    }

    /// Load configuration from a custom path instead of `config/`
    ///
    /// Environment overrides apply the same way as for [`Settings::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::build(
            Config::builder().add_source(File::from(path.as_ref())),
            &|key| std::env::var(key).ok(),
        )
    }

    fn build(
        files: ConfigBuilder<DefaultState>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // e.g., SUBS__SERVER__PORT -> server.port
        let settings = files.add_source(environment()).build()?;

        apply_database_url(settings, lookup)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SUBS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Resolve the database URL from the conventional environment variables
///
/// `DATABASE_URL` wins. Otherwise the URL is assembled from `POSTGRES_USER`,
/// `POSTGRES_PASSWORD`, `POSTGRES_HOST`, `POSTGRES_PORT` and `POSTGRES_DB`
/// when all of them are set.
fn database_url_from_env(lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    if let Some(url) = lookup("DATABASE_URL") {
        return Some(url);
    }

    let user = lookup("POSTGRES_USER")?;
    let password = lookup("POSTGRES_PASSWORD")?;
    let host = lookup("POSTGRES_HOST")?;
    let port = lookup("POSTGRES_PORT")?;
    let db = lookup("POSTGRES_DB")?;

    Some(format!(
        "postgresql://{}:{}@{}:{}/{}?sslmode=disable&connect_timeout=10",
        user, password, host, port, db
    ))
}

fn apply_database_url(
    settings: Config,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    match database_url_from_env(lookup) {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        None => Ok(settings),
    }
}
