//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that bad
//! credentials, hosts, or environment values are rejected before any request
//! is sent.
//!
//! # Example
//!
//! ```rust
//! use shopify_fulfillment::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide the shop's Shopify API key.")]
    EmptyApiKey,

    /// API password cannot be empty.
    #[error("API password cannot be empty. Please provide the shop's Admin API password or access token.")]
    EmptyApiPassword,

    /// Shop type cannot be empty.
    #[error("Shop type cannot be empty.")]
    EmptyShopType,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-10') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://auth.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Webhook subscription list could not be parsed.
    #[error("Invalid webhook subscriptions: {reason}")]
    InvalidWebhookSubscriptions {
        /// Why the list was rejected.
        reason: String,
    },

    /// A numeric setting is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
