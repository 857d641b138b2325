//! Validated newtype wrappers for configuration and credential values.
//!
//! Each wrapper validates its contents on construction so that a malformed
//! value surfaces as a [`ConfigError`] instead of a failed request.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify API key.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated Admin API password.
///
/// For private and custom apps the password doubles as the Admin API access
/// token and is sent in the `X-Shopify-Access-Token` header. The `Debug`
/// implementation masks the value.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::ApiPassword;
///
/// let password = ApiPassword::new("shppa_secret").unwrap();
/// assert_eq!(format!("{:?}", password), "ApiPassword(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiPassword(String);

impl ApiPassword {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.trim().is_empty() {
            return Err(ConfigError::EmptyApiPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for ApiPassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiPassword(*****)")
    }
}

impl<'de> Deserialize<'de> for ApiPassword {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated Shopify shop domain.
///
/// Accepts either the bare shop name (`my-store`) or the full
/// `my-store.myshopify.com` form and always stores the full domain.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// A leading `https://` and trailing `/` are tolerated since the
    /// credentials service sometimes returns the admin URL form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = domain.into();
        let domain = raw
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_lowercase();

        if domain.is_empty() {
            return Err(ConfigError::InvalidShopDomain { domain: raw });
        }

        let (shop_name, full_domain) = if let Some(shop_name) = domain.strip_suffix(Self::SUFFIX) {
            (shop_name.to_string(), domain)
        } else if domain.contains('.') {
            return Err(ConfigError::InvalidShopDomain { domain });
        } else {
            (domain.clone(), format!("{domain}{}", Self::SUFFIX))
        };

        if !Self::is_valid_shop_name(&shop_name) {
            return Err(ConfigError::InvalidShopDomain {
                domain: full_domain,
            });
        }

        Ok(Self {
            shop_name_end: shop_name.len(),
            full_domain,
        })
    }

    /// Returns the shop name portion of the domain.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }

    fn is_valid_shop_name(name: &str) -> bool {
        if name.is_empty() || name.starts_with('-') || name.ends_with('-') {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_domain)
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_domain)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated base URL, used both for the Admin API host override and
/// for the user-credentials endpoint.
///
/// Unlike a shop domain, the scheme and port are preserved so that the
/// client can be pointed at a local proxy or a mock server.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::ApiHost;
///
/// let host = ApiHost::new("http://localhost:8080/").unwrap();
/// assert_eq!(host.scheme(), "http");
/// assert_eq!(host.host_name(), "localhost");
/// assert_eq!(host.as_ref(), "http://localhost:8080");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiHost {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ApiHost {
    /// Creates a new validated base URL. Trailing slashes are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if there is no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidHostUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        let host_start = scheme_end + 3;
        let remainder = url.get(host_start..).unwrap_or_default();
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end <= host_start {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins a path segment onto this URL with exactly one `/` between them.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for ApiHost {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// The kind of shop a user has connected.
///
/// Credentials are cached per user per shop type. The value is lowercased
/// on construction so `"Shopify"` and `"shopify"` share a cache slot.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::ShopType;
///
/// assert_eq!(ShopType::default().as_ref(), "shopify");
/// assert_eq!(ShopType::new("Shopify-Plus").unwrap().as_ref(), "shopify-plus");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ShopType(String);

impl ShopType {
    /// Creates a new shop type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyShopType`] if the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into().trim().to_lowercase();
        if value.is_empty() {
            return Err(ConfigError::EmptyShopType);
        }
        Ok(Self(value))
    }
}

impl Default for ShopType {
    fn default() -> Self {
        Self("shopify".to_string())
    }
}

impl AsRef<str> for ShopType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_password_masks_value_in_debug() {
        let password = ApiPassword::new("super-secret").unwrap();
        let debug_output = format!("{password:?}");
        assert_eq!(debug_output, "ApiPassword(*****)");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_api_password_deserialize_rejects_empty() {
        let result: Result<ApiPassword, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_shop_domain_normalizes_short_format() {
        let domain = ShopDomain::new("my-store").unwrap();
        assert_eq!(domain.as_ref(), "my-store.myshopify.com");
        assert_eq!(domain.shop_name(), "my-store");
    }

    #[test]
    fn test_shop_domain_strips_scheme_and_trailing_slash() {
        let domain = ShopDomain::new("https://My-Store.myshopify.com/").unwrap();
        assert_eq!(domain.as_ref(), "my-store.myshopify.com");
    }

    #[test]
    fn test_shop_domain_rejects_invalid_domains() {
        assert!(ShopDomain::new("").is_err());
        assert!(ShopDomain::new("my store").is_err());
        assert!(ShopDomain::new("my_store").is_err());
        assert!(ShopDomain::new("-my-store").is_err());
        assert!(ShopDomain::new("my-store.otherdomain.com").is_err());
    }

    #[test]
    fn test_shop_domain_deserializes_from_short_name() {
        let domain: ShopDomain = serde_json::from_str(r#""test-shop""#).unwrap();
        assert_eq!(domain.as_ref(), "test-shop.myshopify.com");
    }

    #[test]
    fn test_api_host_keeps_port_and_trims_slash() {
        let host = ApiHost::new("http://127.0.0.1:4010/").unwrap();
        assert_eq!(host.as_ref(), "http://127.0.0.1:4010");
        assert_eq!(host.scheme(), "http");
        assert_eq!(host.host_name(), "127.0.0.1");
    }

    #[test]
    fn test_api_host_join() {
        let host = ApiHost::new("https://auth.example.com/api/credentials").unwrap();
        assert_eq!(
            host.join("/user-1"),
            "https://auth.example.com/api/credentials/user-1"
        );
    }

    #[test]
    fn test_api_host_rejects_invalid() {
        assert!(ApiHost::new("auth.example.com").is_err());
        assert!(ApiHost::new("https://").is_err());
        assert!(ApiHost::new("://example.com").is_err());
        assert!(ApiHost::new("https://:8080").is_err());
    }

    #[test]
    fn test_shop_type_is_lowercased() {
        let shop_type = ShopType::new(" Shopify ").unwrap();
        assert_eq!(shop_type, ShopType::default());
        assert!(matches!(ShopType::new(""), Err(ConfigError::EmptyShopType)));
    }
}
