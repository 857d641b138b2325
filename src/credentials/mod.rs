//! Per-user shop credentials.
//!
//! Credentials live outside this library, behind a user-credentials HTTP
//! endpoint. [`HttpCredentialsProvider`] fetches them and
//! [`CredentialCache`] keeps them in memory keyed by user id and
//! [`ShopType`](crate::ShopType). The cache is emptied wholesale on a fixed
//! interval; there is no per-entry expiry.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_fulfillment::credentials::{CredentialCache, HttpCredentialsProvider};
//! use shopify_fulfillment::{ShopType, ShopifyConfig};
//!
//! let config = ShopifyConfig::from_env()?;
//! let cache = Arc::new(CredentialCache::new(HttpCredentialsProvider::from_config(&config)?));
//! let _clear_task = Arc::clone(&cache).spawn_periodic_clear(config.credentials_cache_clear_interval());
//!
//! let credentials = cache.get("user-42", &ShopType::default()).await?;
//! ```

mod cache;
mod errors;
mod provider;

pub use cache::CredentialCache;
pub use errors::CredentialsError;
pub use provider::{BoxFuture, CredentialsProvider, HttpCredentialsProvider};

use serde::Deserialize;

use crate::config::{ApiKey, ApiPassword, ShopDomain};
use crate::error::ConfigError;

/// Admin API credentials for one shop.
///
/// Deserializes from the credentials endpoint's camelCase shape:
///
/// ```rust
/// use shopify_fulfillment::credentials::ShopCredentials;
///
/// let credentials: ShopCredentials = serde_json::from_str(
///     r#"{"shopName": "acme", "apiKey": "key", "password": "shppa_secret"}"#,
/// )
/// .unwrap();
/// assert_eq!(credentials.shop_name.as_ref(), "acme.myshopify.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawShopCredentials")]
pub struct ShopCredentials {
    /// The shop's `myshopify.com` domain.
    pub shop_name: ShopDomain,
    /// The app's API key.
    pub api_key: ApiKey,
    /// The Admin API password, sent as the access token.
    pub password: ApiPassword,
}

impl ShopCredentials {
    /// Validates and bundles credentials for one shop.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value fails validation.
    pub fn new(
        shop_name: impl Into<String>,
        api_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            shop_name: ShopDomain::new(shop_name)?,
            api_key: ApiKey::new(api_key)?,
            password: ApiPassword::new(password)?,
        })
    }
}

/// Wire shape of the credentials endpoint before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShopCredentials {
    shop_name: String,
    api_key: String,
    password: String,
}

impl TryFrom<RawShopCredentials> for ShopCredentials {
    type Error = ConfigError;

    fn try_from(raw: RawShopCredentials) -> Result<Self, Self::Error> {
        Self::new(raw.shop_name, raw.api_key, raw.password)
    }
}
