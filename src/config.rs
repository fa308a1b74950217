//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, applies
//! environment overrides, and defines the constants for endpoint payloads,
//! introspected environment variables, logging and default paths. `AppConfig`
//! is the root configuration struct; `BuildInfo` carries the compile-time
//! identity of the binary.

use const_format::formatcp;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Every response is a live snapshot of process state; upstream caches must not keep it.
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Upper bound on how long in-flight requests may drain after SIGINT/SIGTERM
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Introspected Environment
// =============================================================================

/// Overrides `http.port`
pub const ENV_PORT: &str = "PORT";

/// Runtime version string shown as `go_version` (e.g. "1.22.4" or "go1.22.4 linux/amd64")
pub const ENV_RUNTIME_VERSION: &str = "GOLANG_VERSION";

pub const ENV_POD_IP: &str = "POD_IP";
pub const ENV_HOST_IP: &str = "HOST_IP";
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";

pub const ENV_CPU_REQUEST: &str = "CPU_REQUEST";
pub const ENV_CPU_LIMIT: &str = "CPU_LIMIT";
pub const ENV_MEM_REQUEST: &str = "MEM_REQUEST";
pub const ENV_MEM_LIMIT: &str = "MEM_LIMIT";

/// Only variables whose key starts with this prefix are reported by `/envs`.
/// Values are returned unredacted.
pub const ENV_REPORTED_PREFIX: &str = "GAEA";

/// Prefix stripped from the runtime version token
pub const RUNTIME_VERSION_PREFIX: &str = "go";

// =============================================================================
// Build Identity
// =============================================================================
// Baked in at compile time, e.g.
//   WHOAMI_GIT_COMMIT=$(git rev-parse --short HEAD) cargo build --release

pub const BUILD_VERSION: &str = match option_env!("WHOAMI_BUILD_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

pub const BUILD_GIT_COMMIT: &str = match option_env!("WHOAMI_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

pub const BUILD_TIME: &str = match option_env!("WHOAMI_BUILD_TIME") {
    Some(time) => time,
    None => "unknown",
};

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Directory where the orchestrator mounts ConfigMap files
pub const DEFAULT_CONFIGMAP_DIR: &str = "/etc/config";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!(
    "{}=info,tower_http=info",
    env!("CARGO_CRATE_NAME")
);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Where mounted configuration files are read from
    #[serde(default)]
    pub configmap: ConfigMapConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Drain window after a shutdown signal before the process gives up
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }

    /// Resolve the listen address from host and port.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("Invalid http.host or http.port: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigMapConfig {
    #[serde(default = "ConfigMapConfig::default_dir")]
    pub dir: PathBuf,
}

impl Default for ConfigMapConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

impl ConfigMapConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIGMAP_DIR)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from built-in defaults,
    /// then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PORT` from the given environment lookup. An empty value is ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|p| !p.is_empty()) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "logging.format must be \"text\" or \"json\", got {:?}",
                    other
                )))
            }
        }
        if self.http.shutdown_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.shutdown_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.shutdown_timeout_seconds, 30);
        assert_eq!(config.configmap.dir, PathBuf::from("/etc/config"));
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            [http]
            port = 9090

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9090);
        assert!(config.logging.is_json());
        assert_eq!(config.configmap.dir, PathBuf::from("/etc/config"));
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_from_toml_rejects_unknown_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_from_toml_rejects_zero_shutdown_timeout() {
        let err = AppConfig::from_toml("[http]\nshutdown_timeout_seconds = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_port_env_override() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|key| (key == "PORT").then(|| "3000".to_string()))
            .unwrap();
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_empty_port_env_is_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|_| Some(String::new()))
            .unwrap();
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_invalid_port_env_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(|_| Some("eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(
            config.http.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/gaea-whoami.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
