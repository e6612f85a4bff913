//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("'{}' is not a valid socket address", config.listener.bind_address),
        });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "listener.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    match Url::parse(&config.node.rpc_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "node.rpc_url",
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(error) => errors.push(ValidationError {
            field: "node.rpc_url",
            message: error.to_string(),
        }),
    }
    if let Some(ws_url) = &config.node.ws_url {
        match Url::parse(ws_url) {
            Ok(url) if url.scheme() == "ws" || url.scheme() == "wss" => {}
            Ok(url) => errors.push(ValidationError {
                field: "node.ws_url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(error) => errors.push(ValidationError {
                field: "node.ws_url",
                message: error.to_string(),
            }),
        }
    }
    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "node.rpc_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.node.poll_interval_ms == 0 {
        errors.push(ValidationError {
            field: "node.poll_interval_ms",
            message: "must be greater than zero".to_string(),
        });
    }

    // 21000 is the intrinsic cost of a plain value transfer.
    if config.transfer.gas_limit < 21_000 {
        errors.push(ValidationError {
            field: "transfer.gas_limit",
            message: "must cover at least the 21000 intrinsic transfer cost".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_rpc_scheme() {
        let mut config = GatewayConfig::default();
        config.node.rpc_url = "ftp://localhost:8545".to_string();

        let errors = validate_config(&config).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "node.rpc_url"));
    }

    #[test]
    fn rejects_zero_timeouts_and_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.node.rpc_timeout_secs = 0;
        config.listener.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_gas_limit_below_intrinsic_cost() {
        let mut config = GatewayConfig::default();
        config.transfer.gas_limit = 20_000;

        let errors = validate_config(&config).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "transfer.gas_limit"));
    }

    #[test]
    fn metrics_address_is_only_checked_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nonsense".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
