//! Application configuration.
//!
//! Values are resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A YAML file (`configs/config.yaml`, or the path passed with `--config`)
//! 3. Environment variables
//!
//! ## Configuration File
//!
//! ```yaml
//! server:
//!   port: 8080
//!   base_url: "http://localhost:8080"
//! database:
//!   name: "url_shortener.db"
//! analytics:
//!   buffer_size: 1000
//!   worker_count: 5
//! monitor:
//!   interval_minutes: 5
//! ```
//!
//! ## Environment Variables
//!
//! - `SERVER_PORT` - HTTP port (default: `8080`)
//! - `SERVER_BASE_URL` - Public origin used to build short URLs (default: `http://localhost:8080`)
//! - `DATABASE_NAME` - SQLite database file (default: `url_shortener.db`)
//! - `ANALYTICS_BUFFER_SIZE` - Click queue capacity (default: `1000`)
//! - `ANALYTICS_WORKER_COUNT` - Click workers (default: `5`)
//! - `MONITOR_INTERVAL_MINUTES` - Minutes between health monitor passes (default: `5`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! `.env` files are expected to be loaded by the binary before [`Config::load`] runs.

use anyhow::{Context, Result};
use config::{File, FileFormat};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Configuration file read when no `--config` path is given.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// Upper bound for `monitor.interval_minutes` (one year).
pub const MAX_MONITOR_INTERVAL_MINUTES: u64 = 525_600;

/// Environment variables and the configuration keys they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_PORT", "server.port"),
    ("SERVER_BASE_URL", "server.base_url"),
    ("DATABASE_NAME", "database.name"),
    ("ANALYTICS_BUFFER_SIZE", "analytics.buffer_size"),
    ("ANALYTICS_WORKER_COUNT", "analytics.worker_count"),
    ("MONITOR_INTERVAL_MINUTES", "monitor.interval_minutes"),
    ("RUST_LOG", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Public origin short URLs are built from.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file, created on first use.
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "url_shortener.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Click queue capacity. Clicks beyond it are dropped.
    pub buffer_size: usize,
    pub worker_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            worker_count: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_minutes: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub analytics: AnalyticsConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from the YAML file at `path` and the environment.
    ///
    /// Without a `path` the default file is used if present. An explicit
    /// `path` must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed, or a value
    /// cannot be parsed into its field type.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let mut builder = config::Config::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(required));

        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = env::var(var) {
                builder = builder
                    .set_override(*key, value)
                    .with_context(|| format!("Invalid value in {var}"))?;
            }
        }

        builder
            .build()
            .with_context(|| format!("Failed to read configuration from {path}"))?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }

        if !self.server.base_url.starts_with("http://")
            && !self.server.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "server.base_url must start with 'http://' or 'https://', got '{}'",
                self.server.base_url
            );
        }

        if self.database.name.trim().is_empty() {
            anyhow::bail!("database.name must not be empty");
        }

        if self.analytics.buffer_size == 0 || self.analytics.buffer_size > 1_000_000 {
            anyhow::bail!(
                "analytics.buffer_size must be between 1 and 1000000, got {}",
                self.analytics.buffer_size
            );
        }

        if self.analytics.worker_count == 0 || self.analytics.worker_count > 256 {
            anyhow::bail!(
                "analytics.worker_count must be between 1 and 256, got {}",
                self.analytics.worker_count
            );
        }

        if self.monitor.interval_minutes == 0
            || self.monitor.interval_minutes > MAX_MONITOR_INTERVAL_MINUTES
        {
            anyhow::bail!(
                "monitor.interval_minutes must be between 1 and {}, got {}",
                MAX_MONITOR_INTERVAL_MINUTES,
                self.monitor.interval_minutes
            );
        }

        if self.logging.format != "text" && self.logging.format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Health monitor polling interval.
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_minutes.saturating_mul(60))
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Port: {}", self.server.port);
        tracing::info!("  Base URL: {}", self.server.base_url);
        tracing::info!("  Database: {}", self.database.name);
        tracing::info!("  Click queue capacity: {}", self.analytics.buffer_size);
        tracing::info!("  Click workers: {}", self.analytics.worker_count);
        tracing::info!("  Monitor interval: {} min", self.monitor.interval_minutes);
        tracing::info!("  Log level: {}", self.logging.level);
        tracing::info!("  Log format: {}", self.logging.format);
    }
}

/// Loads and validates configuration.
///
/// # Errors
///
/// Returns an error if loading or validation fails.
pub fn load(path: Option<&str>) -> Result<Config> {
    let config = Config::load(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    fn clear_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for (var, _) in ENV_OVERRIDES {
                env::remove_var(var);
            }
        }
    }

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("linkpulse-{}-{name}.yaml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.database.name, "url_shortener.db");
        assert_eq!(config.analytics.buffer_size, 1000);
        assert_eq!(config.analytics.worker_count, 5);
        assert_eq!(config.monitor.interval_minutes, 5);
        assert_eq!(config.monitor_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 9000;

        config.server.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());
        config.server.base_url = "https://s.example.com".to_string();
        assert!(config.validate().is_ok());

        config.database.name = " ".to_string();
        assert!(config.validate().is_err());
        config.database.name = "test.db".to_string();

        config.analytics.buffer_size = 0;
        assert!(config.validate().is_err());
        config.analytics.buffer_size = 1_000_001;
        assert!(config.validate().is_err());
        config.analytics.buffer_size = 1;
        assert!(config.validate().is_ok());

        config.analytics.worker_count = 0;
        assert!(config.validate().is_err());
        config.analytics.worker_count = 257;
        assert!(config.validate().is_err());
        config.analytics.worker_count = 256;

        config.monitor.interval_minutes = 0;
        assert!(config.validate().is_err());
        config.monitor.interval_minutes = 1;

        config.logging.format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "json".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_from_yaml_file() {
        clear_env();
        let path = write_temp_config(
            "file",
            "server:\n  port: 9090\n  base_url: \"https://s.example.com\"\nanalytics:\n  worker_count: 2\n",
        );

        let config = Config::load(path.to_str()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.base_url, "https://s.example.com");
        assert_eq!(config.analytics.worker_count, 2);
        // Keys missing from the file keep their defaults.
        assert_eq!(config.analytics.buffer_size, 1000);
        assert_eq!(config.database.name, "url_shortener.db");

        std::fs::remove_file(path).ok();
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let path = write_temp_config("env", "server:\n  port: 9090\ndatabase:\n  name: \"file.db\"\n");

        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("SERVER_PORT", "7070");
            env::set_var("ANALYTICS_BUFFER_SIZE", "42");
            env::set_var("LOG_FORMAT", "json");
        }

        let config = Config::load(path.to_str()).unwrap();

        assert_eq!(config.server.port, 7070);
        assert_eq!(config.analytics.buffer_size, 42);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.database.name, "file.db");

        clear_env();
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_monitor_interval_upper_bound() {
        let mut config = Config::default();

        config.monitor.interval_minutes = MAX_MONITOR_INTERVAL_MINUTES;
        assert!(config.validate().is_ok());
        assert_eq!(
            config.monitor_interval(),
            Duration::from_secs(MAX_MONITOR_INTERVAL_MINUTES * 60)
        );

        config.monitor.interval_minutes = MAX_MONITOR_INTERVAL_MINUTES + 1;
        assert!(config.validate().is_err());

        // Would overflow when converted to seconds.
        config.monitor.interval_minutes = 307_445_734_561_825_861;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_an_error() {
        clear_env();
        assert!(Config::load(Some("/nonexistent/linkpulse.yaml")).is_err());
    }

    #[test]
    #[serial]
    fn test_unparsable_env_value_is_an_error() {
        clear_env();
        let path = write_temp_config("bad", "server:\n  port: 9090\n");

        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("ANALYTICS_WORKER_COUNT", "many");
        }

        assert!(Config::load(path.to_str()).is_err());

        clear_env();
        std::fs::remove_file(path).ok();
    }
}
