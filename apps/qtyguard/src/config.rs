//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use qtyguard_core::notice::HostVersion;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Host platform version; picks the notice channel
    pub host_version: HostVersion,

    /// Log output format
    pub log_format: LogFormat,
}

impl GateConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GateConfig {
            host_version: lookup("QTYGUARD_HOST_VERSION")
                .unwrap_or_else(|| "2.1".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("QTYGUARD_HOST_VERSION".to_string()))?,

            log_format: match lookup("QTYGUARD_LOG_FORMAT")
                .unwrap_or_else(|| "pretty".to_string())
                .to_ascii_lowercase()
                .as_str()
            {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidValue("QTYGUARD_LOG_FORMAT".to_string())),
            },
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GateConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host_version, HostVersion::new(2, 1, 0));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = GateConfig::from_lookup(lookup(&[
            ("QTYGUARD_HOST_VERSION", "2.0.20"),
            ("QTYGUARD_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.host_version, HostVersion::new(2, 0, 20));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let err = GateConfig::from_lookup(lookup(&[("QTYGUARD_HOST_VERSION", "two")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for QTYGUARD_HOST_VERSION");

        assert!(GateConfig::from_lookup(lookup(&[("QTYGUARD_LOG_FORMAT", "xml")])).is_err());
    }
}
