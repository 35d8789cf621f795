//! Application configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so a
//! missing file or a partial file both yield a runnable configuration.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [booking]
//! lock_timeout_ms = 5000
//! default_cancel_deadline_hours = 24
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{BookingConfig, CancellationDeadline};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "FESTIVAL_CONFIG";

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub logging: LoggingSection,
    pub booking: BookingSection,
    pub admin: AdminSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// `sqlite://...` or `postgres://...`
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: 168,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `trace`, `debug`, `info`, `warn`, `error` or a full `EnvFilter` directive
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSection {
    /// Longest wait for a concert's admission lock before answering `Busy`
    pub lock_timeout_ms: u64,
    /// Used when the `CANCEL_DEADLINE_HOURS` parameter is unset or unusable
    pub default_cancel_deadline_hours: f64,
    pub busy_retry_attempts: u32,
}

impl Default for BookingSection {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5000,
            default_cancel_deadline_hours: CancellationDeadline::DEFAULT_HOURS,
            busy_retry_attempts: 3,
        }
    }
}

/// Organizer account created on first start, when no user exists yet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub email: String,
    pub password: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            email: "organizer@festival.local".to_string(),
            password: "organizer".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.server.api_port == 0 {
            problems.push("server.api_port must not be 0".to_string());
        }
        if self.database.url.trim().is_empty() {
            problems.push("database.url is empty".to_string());
        }
        if self.security.jwt_secret.trim().is_empty() {
            problems.push("security.jwt_secret is empty".to_string());
        }
        if self.security.jwt_expiration_hours <= 0 {
            problems.push("security.jwt_expiration_hours must be positive".to_string());
        }
        if self.booking.lock_timeout_ms == 0 {
            problems.push("booking.lock_timeout_ms must be positive".to_string());
        }
        if CancellationDeadline::new(self.booking.default_cancel_deadline_hours).is_none() {
            problems.push(format!(
                "booking.default_cancel_deadline_hours must be between 0 and {}",
                CancellationDeadline::MAX_HOURS
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "pretty" | "json") {
            problems.push(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.security.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.security.jwt_secret.clone(),
            self.security.jwt_expiration_hours,
        )
    }

    pub fn booking_config(&self) -> BookingConfig {
        BookingConfig {
            lock_timeout: Duration::from_millis(self.booking.lock_timeout_ms),
            default_deadline: CancellationDeadline::new(self.booking.default_cancel_deadline_hours)
                .unwrap_or_default(),
            busy_retry_attempts: self.booking.busy_retry_attempts,
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

/// `$FESTIVAL_CONFIG`, else `~/.config/festival-service/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("festival-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.uses_default_secret());
        assert_eq!(config.booking_config().lock_timeout, Duration::from_secs(5));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [booking]
            default_cancel_deadline_hours = 12.5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.booking.lock_timeout_ms, 5000);
        assert_eq!(config.booking_config().default_deadline.hours(), 12.5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn broken_values_are_reported_together() {
        let mut config = AppConfig::default();
        config.server.api_port = 0;
        config.security.jwt_secret = " ".into();
        config.booking.lock_timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("api_port"));
        assert!(err.contains("jwt_secret"));
        assert!(err.contains("lock_timeout_ms"));
    }

    #[test]
    fn oversized_default_deadline_is_invalid() {
        let mut config = AppConfig::default();
        config.booking.default_cancel_deadline_hours = 1e10;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_cancel_deadline_hours"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("festival-service-no-such-config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.api_port, 8080);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("festival-bad-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server\napi_port = ").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
