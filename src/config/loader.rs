//! Configuration loading from disk.

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use std::fs;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GatewayConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RouteId;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.namespace, "app");
        assert_eq!(config.auth.require_auth_for, vec![RouteId::Create]);
        assert_eq!(config.timeouts.request_secs, 5);
    }

    #[test]
    fn auth_policy_parses_route_identifiers() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [auth]
            require_auth_for = ["list", "get", "create"]
            request_name_claim = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.auth.require_auth_for,
            vec![RouteId::List, RouteId::Get, RouteId::Create]
        );
        assert!(config.auth.request_name_claim);
    }

    #[test]
    fn unknown_route_identifier_is_a_parse_error() {
        let result: Result<GatewayConfig, _> = toml::from_str(
            r#"
            [auth]
            require_auth_for = ["delete"]
            "#,
        );
        assert!(result.is_err());
    }
}
