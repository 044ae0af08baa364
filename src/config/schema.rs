//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so a minimal config file is valid.

use serde::{Deserialize, Serialize};

use crate::auth::RouteId;

/// Root configuration for the posts gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Document store connection and namespace.
    pub store: StoreConfig,

    /// Authentication policy and identity service.
    pub auth: AuthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the realtime-tree database REST surface.
    pub base_url: String,

    /// Namespace segment all resolved paths are mounted under. Keeping it
    /// equal to the platform mount point makes store keys match request
    /// paths one-to-one.
    pub namespace: String,

    /// Order list reads by the record's `created` field.
    pub order_by_created: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            namespace: "app".to_string(),
            order_by_created: false,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token verification endpoint of the identity service.
    pub verify_url: String,

    /// Routes that must present a verified bearer token.
    pub require_auth_for: Vec<RouteId>,

    /// Ask the identity service for the display-name claim and store it
    /// with created posts.
    pub request_name_claim: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verify_url: "http://localhost:9001/verify".to_string(),
            require_auth_for: vec![RouteId::Create],
            request_name_claim: false,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds. The upstream system never set one;
    /// a few seconds keeps stuck store calls from pinning requests open.
    pub request_secs: u64,

    /// Per-call timeout for store and identity-service requests in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 5,
            upstream_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
