//! Configuration loading and constants.
//!
//! Configuration is read from environment variables, optionally seeded from an
//! env file. `AppConfig` is an immutable snapshot taken once per container;
//! values outside their domain are rejected when the snapshot is taken.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SERVICE_NAME: &str = "SERVICE_NAME";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

// =============================================================================
// Defaults
// =============================================================================

/// Default env file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

pub const DEFAULT_PORT: u16 = 4000;

pub const DEFAULT_SERVICE_NAME: &str = "oauth2";

// =============================================================================
// HTTP Constants
// =============================================================================

/// Health responses must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

/// Maximum accepted request body size in bytes (100 KiB)
pub const REQUEST_BODY_LIMIT: usize = 100 * 1024;

/// Seconds to wait for in-flight connections after a shutdown signal
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

/// Runtime environment the service is deployed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub const VARIANTS: &'static str = "development, production, test";

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity written by the logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const VARIANTS: &'static str = "error, warn, info, debug, trace";

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format: human-readable colorized text or one JSON object per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub const VARIANTS: &'static str = "text, json";

    /// JSON in production, text everywhere else
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Bind address for the HTTP listener
    pub host: IpAddr,
    /// Listen port; 0 lets the OS pick one
    pub port: u16,
    pub service_name: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Raw tracing filter directive that replaces `log_level` when set
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment = Environment::default();
        Self {
            environment,
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: LogLevel::default(),
            log_format: LogFormat::for_environment(environment),
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Take a snapshot of the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset and empty variables fall back to their defaults. Any other value
    /// must belong to the variable's domain.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        let environment = match get(ENV_APP_ENV) {
            Some(value) => parse(ENV_APP_ENV, value, Environment::VARIANTS)?,
            None => defaults.environment,
        };

        let host = match get(ENV_HOST) {
            Some(value) => parse(ENV_HOST, value, "an IP address")?,
            None => defaults.host,
        };

        let port = match get(ENV_PORT) {
            Some(value) => parse(ENV_PORT, value, "an integer between 0 and 65535")?,
            None => defaults.port,
        };

        let log_level = match get(ENV_LOG_LEVEL) {
            Some(value) => parse(ENV_LOG_LEVEL, value, LogLevel::VARIANTS)?,
            None => defaults.log_level,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(value) => parse(ENV_LOG_FORMAT, value, LogFormat::VARIANTS)?,
            None => LogFormat::for_environment(environment),
        };

        Ok(Self {
            environment,
            host,
            port,
            service_name: get(ENV_SERVICE_NAME).unwrap_or(defaults.service_name),
            log_level,
            log_format,
            log_filter: get(ENV_RUST_LOG),
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Filter directive for the logger: `RUST_LOG` if set, else the log level.
    pub fn log_filter(&self) -> String {
        self.log_filter
            .clone()
            .unwrap_or_else(|| self.log_level.as_str().to_string())
    }
}

fn parse<T: FromStr>(var: &'static str, value: String, expected: &'static str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value, expected })
}

/// Outcome of looking for an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing(PathBuf),
}

/// Load `path` into the process environment without overriding variables that
/// are already set. A missing file is not an error.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<EnvFile, ConfigError> {
    let path = path.as_ref().to_path_buf();
    match dotenvy::from_path(&path) {
        Ok(()) => Ok(EnvFile::Loaded(path)),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            Ok(EnvFile::Missing(path))
        }
        Err(source) => Err(ConfigError::EnvFile { path, source }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("Failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}
