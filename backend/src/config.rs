//! Server configuration.
//!
//! Values come from the environment (a `.env` file is loaded at startup) and
//! can be overridden by `serve` flags.
//!
//! | Variable                    | Default |
//! |-----------------------------|---------|
//! | `LEARNERLOAD_PORT`          | `3000`  |
//! | `LEARNERLOAD_MAX_UPLOAD_MB` | `5`     |

use std::env;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum upload size, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 5;

/// Extension an uploaded file name must end with.
pub const ACCEPTED_EXTENSION: &str = ".csv";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl ServerConfig {
    /// Read settings from the environment, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup` (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("LEARNERLOAD_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            max_upload_mb: lookup("LEARNERLOAD_MAX_UPLOAD_MB")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|mb| *mb > 0)
                .unwrap_or(defaults.max_upload_mb),
        }
    }

    /// Apply command line overrides. A zero upload limit is ignored.
    pub fn with_overrides(mut self, port: Option<u16>, max_upload_mb: Option<usize>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(mb) = max_upload_mb.filter(|mb| *mb > 0) {
            self.max_upload_mb = mb;
        }
        self
    }

    /// Upload limit in bytes, capped at `usize::MAX`.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.max_upload_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_env_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LEARNERLOAD_PORT", "8080"),
            ("LEARNERLOAD_MAX_UPLOAD_MB", " 10 "),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_mb, 10);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LEARNERLOAD_PORT", "http"),
            ("LEARNERLOAD_MAX_UPLOAD_MB", "0"),
        ]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_zero_override_ignored() {
        let config = ServerConfig::default().with_overrides(None, Some(0));
        assert_eq!(config.max_upload_mb, DEFAULT_MAX_UPLOAD_MB);
    }

    #[test]
    fn test_huge_limit_saturates() {
        let config = ServerConfig::default().with_overrides(None, Some(usize::MAX));
        assert_eq!(config.max_upload_bytes(), usize::MAX);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = ServerConfig::from_lookup(lookup(&[("LEARNERLOAD_PORT", "8080")]))
            .with_overrides(Some(9000), None);
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_upload_mb, DEFAULT_MAX_UPLOAD_MB);
    }
}
