//! Configuration types for the fulfillment client.
//!
//! # Overview
//!
//! - [`ShopifyConfig`]: settings shared by every service (API version, host
//!   override, credentials endpoint, rate-limit delays, webhook list)
//! - [`ShopifyConfigBuilder`]: builder for [`ShopifyConfig`]
//! - [`ApiKey`], [`ApiPassword`], [`ShopDomain`]: validated shop credentials
//! - [`ApiHost`]: a validated base URL
//! - [`ShopType`]: the credential-cache partition key
//! - [`ApiVersion`]: the Shopify Admin API version
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_fulfillment::{ApiVersion, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .api_version(ApiVersion::V2025_07)
//!     .hsn_lookup_delay(Duration::from_millis(250))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.hsn_max_variants(), 3);
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiHost, ApiKey, ApiPassword, ShopDomain, ShopType};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::WebhookSubscription;

/// Default interval after which the whole credentials cache is emptied.
pub const DEFAULT_CREDENTIALS_CACHE_CLEAR_INTERVAL: Duration =
    Duration::from_secs(7 * 24 * 60 * 60);

/// Default pause before each inventory-item lookup during HSN collection.
pub const DEFAULT_HSN_LOOKUP_DELAY: Duration = Duration::from_millis(500);

/// Default cap on variants inspected per product during HSN collection.
pub const DEFAULT_HSN_MAX_VARIANTS: usize = 3;

/// Default fulfillment service name used to recognise our own fulfillments.
pub const DEFAULT_FULFILLMENT_SERVICE_NAME: &str = "wherehouse";

/// Settings shared by all services.
///
/// `ShopifyConfig` is `Clone + Send + Sync` and carries no per-shop state;
/// credentials are supplied separately per shop.
#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    api_version: ApiVersion,
    api_host: Option<ApiHost>,
    user_agent_prefix: Option<String>,
    credentials_endpoint: Option<ApiHost>,
    credentials_cache_clear_interval: Duration,
    hsn_lookup_delay: Duration,
    hsn_max_variants: usize,
    fulfillment_service_name: String,
    webhook_subscriptions: Vec<WebhookSubscription>,
    tries: u32,
}

impl ShopifyConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ShopifyConfigBuilder {
        ShopifyConfigBuilder::new()
    }

    /// Builds a configuration from process environment variables.
    ///
    /// | Variable | Setting |
    /// |---|---|
    /// | `SHOPIFY_API_VERSION` | [`api_version`](Self::api_version) |
    /// | `SHOPIFY_API_HOST` | [`api_host`](Self::api_host) |
    /// | `SHOPIFY_USER_AGENT_PREFIX` | [`user_agent_prefix`](Self::user_agent_prefix) |
    /// | `USER_CREDENTIALS_URL` | [`credentials_endpoint`](Self::credentials_endpoint) |
    /// | `FULFILLMENT_SERVICE_NAME` | [`fulfillment_service_name`](Self::fulfillment_service_name) |
    /// | `SHOPIFY_WEBHOOKS` | [`webhook_subscriptions`](Self::webhook_subscriptions), as a JSON array |
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any variable that is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any value that is present but invalid.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(version) = get("SHOPIFY_API_VERSION") {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(host) = get("SHOPIFY_API_HOST") {
            builder = builder.api_host(ApiHost::new(host)?);
        }
        if let Some(prefix) = get("SHOPIFY_USER_AGENT_PREFIX") {
            builder = builder.user_agent_prefix(prefix);
        }
        if let Some(endpoint) = get("USER_CREDENTIALS_URL") {
            builder = builder.credentials_endpoint(ApiHost::new(endpoint)?);
        }
        if let Some(name) = get("FULFILLMENT_SERVICE_NAME") {
            builder = builder.fulfillment_service_name(name);
        }
        if let Some(raw) = get("SHOPIFY_WEBHOOKS") {
            builder = builder.webhook_subscriptions(WebhookSubscription::parse_list(&raw)?);
        }

        builder.build()
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the base URL override for Admin API requests, if any.
    #[must_use]
    pub const fn api_host(&self) -> Option<&ApiHost> {
        self.api_host.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the user-credentials endpoint, if configured.
    #[must_use]
    pub const fn credentials_endpoint(&self) -> Option<&ApiHost> {
        self.credentials_endpoint.as_ref()
    }

    /// Returns how often the credentials cache is emptied.
    #[must_use]
    pub const fn credentials_cache_clear_interval(&self) -> Duration {
        self.credentials_cache_clear_interval
    }

    /// Returns the pause taken before each inventory-item lookup.
    #[must_use]
    pub const fn hsn_lookup_delay(&self) -> Duration {
        self.hsn_lookup_delay
    }

    /// Returns the maximum number of variants inspected per product.
    #[must_use]
    pub const fn hsn_max_variants(&self) -> usize {
        self.hsn_max_variants
    }

    /// Returns the fulfillment service name that identifies this app.
    #[must_use]
    pub fn fulfillment_service_name(&self) -> &str {
        &self.fulfillment_service_name
    }

    /// Returns the webhook subscriptions registered for every shop.
    #[must_use]
    pub fn webhook_subscriptions(&self) -> &[WebhookSubscription] {
        &self.webhook_subscriptions
    }

    /// Returns how many times each request is attempted.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_version: ApiVersion::latest(),
            api_host: None,
            user_agent_prefix: None,
            credentials_endpoint: None,
            credentials_cache_clear_interval: DEFAULT_CREDENTIALS_CACHE_CLEAR_INTERVAL,
            hsn_lookup_delay: DEFAULT_HSN_LOOKUP_DELAY,
            hsn_max_variants: DEFAULT_HSN_MAX_VARIANTS,
            fulfillment_service_name: DEFAULT_FULFILLMENT_SERVICE_NAME.to_string(),
            webhook_subscriptions: Vec::new(),
            tries: 1,
        }
    }
}

// Verify ShopifyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyConfig>();
};

/// Builder for [`ShopifyConfig`].
///
/// Every field is optional; unset fields take the defaults documented on
/// the `DEFAULT_*` constants.
#[derive(Debug, Default)]
pub struct ShopifyConfigBuilder {
    api_version: Option<ApiVersion>,
    api_host: Option<ApiHost>,
    user_agent_prefix: Option<String>,
    credentials_endpoint: Option<ApiHost>,
    credentials_cache_clear_interval: Option<Duration>,
    hsn_lookup_delay: Option<Duration>,
    hsn_max_variants: Option<usize>,
    fulfillment_service_name: Option<String>,
    webhook_subscriptions: Option<Vec<WebhookSubscription>>,
    tries: Option<u32>,
}

impl ShopifyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes Admin API requests to `host` instead of the shop's own domain.
    #[must_use]
    pub fn api_host(mut self, host: ApiHost) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the user-credentials endpoint.
    #[must_use]
    pub fn credentials_endpoint(mut self, endpoint: ApiHost) -> Self {
        self.credentials_endpoint = Some(endpoint);
        self
    }

    /// Sets how often the whole credentials cache is emptied.
    #[must_use]
    pub const fn credentials_cache_clear_interval(mut self, interval: Duration) -> Self {
        self.credentials_cache_clear_interval = Some(interval);
        self
    }

    /// Sets the pause taken before each inventory-item lookup.
    #[must_use]
    pub const fn hsn_lookup_delay(mut self, delay: Duration) -> Self {
        self.hsn_lookup_delay = Some(delay);
        self
    }

    /// Sets the maximum number of variants inspected per product.
    #[must_use]
    pub const fn hsn_max_variants(mut self, max: usize) -> Self {
        self.hsn_max_variants = Some(max);
        self
    }

    /// Sets the fulfillment service name that identifies this app.
    #[must_use]
    pub fn fulfillment_service_name(mut self, name: impl Into<String>) -> Self {
        self.fulfillment_service_name = Some(name.into());
        self
    }

    /// Sets the webhook subscriptions registered for every shop.
    #[must_use]
    pub fn webhook_subscriptions(mut self, subscriptions: Vec<WebhookSubscription>) -> Self {
        self.webhook_subscriptions = Some(subscriptions);
        self
    }

    /// Sets how many times each request is attempted (429/500 are retried).
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Builds the [`ShopifyConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `hsn_max_variants`, `tries`,
    /// or the cache clear interval is zero.
    pub fn build(self) -> Result<ShopifyConfig, ConfigError> {
        let defaults = ShopifyConfig::default();

        let hsn_max_variants = self.hsn_max_variants.unwrap_or(defaults.hsn_max_variants);
        if hsn_max_variants == 0 {
            return Err(ConfigError::InvalidValue {
                field: "hsn_max_variants",
                reason: "must be greater than zero".to_string(),
            });
        }

        let tries = self.tries.unwrap_or(defaults.tries);
        if tries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tries",
                reason: "must be greater than zero".to_string(),
            });
        }

        let credentials_cache_clear_interval = self
            .credentials_cache_clear_interval
            .unwrap_or(defaults.credentials_cache_clear_interval);
        if credentials_cache_clear_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "credentials_cache_clear_interval",
                reason: "must be a non-zero duration".to_string(),
            });
        }

        Ok(ShopifyConfig {
            api_version: self.api_version.unwrap_or(defaults.api_version),
            api_host: self.api_host,
            user_agent_prefix: self.user_agent_prefix,
            credentials_endpoint: self.credentials_endpoint,
            credentials_cache_clear_interval,
            hsn_lookup_delay: self.hsn_lookup_delay.unwrap_or(defaults.hsn_lookup_delay),
            hsn_max_variants,
            fulfillment_service_name: self
                .fulfillment_service_name
                .unwrap_or(defaults.fulfillment_service_name),
            webhook_subscriptions: self.webhook_subscriptions.unwrap_or_default(),
            tries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ShopifyConfig::builder().build().unwrap();

        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert!(config.api_host().is_none());
        assert!(config.credentials_endpoint().is_none());
        assert_eq!(
            config.credentials_cache_clear_interval(),
            Duration::from_secs(604_800)
        );
        assert_eq!(config.hsn_lookup_delay(), Duration::from_millis(500));
        assert_eq!(config.hsn_max_variants(), 3);
        assert_eq!(config.fulfillment_service_name(), "wherehouse");
        assert!(config.webhook_subscriptions().is_empty());
        assert_eq!(config.tries(), 1);
    }

    #[test]
    fn test_builder_rejects_zero_max_variants() {
        let result = ShopifyConfig::builder().hsn_max_variants(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "hsn_max_variants",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_tries_and_interval() {
        assert!(ShopifyConfig::builder().tries(0).build().is_err());
        assert!(ShopifyConfig::builder()
            .credentials_cache_clear_interval(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_env_with_reads_all_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SHOPIFY_API_VERSION", "2025-07"),
            ("SHOPIFY_API_HOST", "http://localhost:9000"),
            ("USER_CREDENTIALS_URL", "https://auth.example.com/credentials"),
            ("FULFILLMENT_SERVICE_NAME", "acme-3pl"),
            (
                "SHOPIFY_WEBHOOKS",
                r#"[{"topic":"orders/create","address":"https://hooks.example.com/orders"}]"#,
            ),
        ]);

        let config =
            ShopifyConfig::from_env_with(|key| vars.get(key).map(ToString::to_string)).unwrap();

        assert_eq!(config.api_version(), &ApiVersion::V2025_07);
        assert_eq!(config.api_host().unwrap().as_ref(), "http://localhost:9000");
        assert_eq!(
            config.credentials_endpoint().unwrap().as_ref(),
            "https://auth.example.com/credentials"
        );
        assert_eq!(config.fulfillment_service_name(), "acme-3pl");
        assert_eq!(config.webhook_subscriptions().len(), 1);
        assert_eq!(config.webhook_subscriptions()[0].topic, "orders/create");
    }

    #[test]
    fn test_from_env_with_ignores_blank_values() {
        let config = ShopifyConfig::from_env_with(|key| {
            (key == "SHOPIFY_API_HOST").then(|| "  ".to_string())
        })
        .unwrap();
        assert!(config.api_host().is_none());
    }

    #[test]
    fn test_from_env_with_rejects_bad_webhook_json() {
        let result = ShopifyConfig::from_env_with(|key| {
            (key == "SHOPIFY_WEBHOOKS").then(|| "{not json".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidWebhookSubscriptions { .. })
        ));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShopifyConfig>();
    }
}
