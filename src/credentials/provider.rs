use std::future::Future;
use std::pin::Pin;

use crate::config::{ApiHost, ShopType, ShopifyConfig};
use crate::credentials::{CredentialsError, RawShopCredentials, ShopCredentials};

/// A boxed, `Send` future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of shop credentials for a user.
///
/// Implemented by [`HttpCredentialsProvider`]; tests and embedders can
/// supply their own.
///
/// # Example
///
/// ```rust
/// use shopify_fulfillment::credentials::{BoxFuture, CredentialsError, CredentialsProvider, ShopCredentials};
/// use shopify_fulfillment::ShopType;
///
/// struct Fixed(ShopCredentials);
///
/// impl CredentialsProvider for Fixed {
///     fn fetch<'a>(
///         &'a self,
///         _user_id: &'a str,
///         _shop_type: &'a ShopType,
///     ) -> BoxFuture<'a, Result<ShopCredentials, CredentialsError>> {
///         let credentials = self.0.clone();
///         Box::pin(async move { Ok(credentials) })
///     }
/// }
/// ```
pub trait CredentialsProvider: Send + Sync {
    /// Fetches credentials for `user_id`'s shop of `shop_type`.
    fn fetch<'a>(
        &'a self,
        user_id: &'a str,
        shop_type: &'a ShopType,
    ) -> BoxFuture<'a, Result<ShopCredentials, CredentialsError>>;
}

/// Fetches credentials from the user-credentials HTTP service.
///
/// Issues `GET {endpoint}/{user_id}?shopType={shop_type}`. The body is either
/// the credentials object itself or wrapped as `{"data": {...}}`.
#[derive(Debug, Clone)]
pub struct HttpCredentialsProvider {
    client: reqwest::Client,
    endpoint: ApiHost,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpCredentialsProvider>();
};

impl HttpCredentialsProvider {
    /// Creates a provider for `endpoint`.
    #[must_use]
    pub fn new(endpoint: ApiHost) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Creates a provider from [`ShopifyConfig::credentials_endpoint`].
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::NotConfigured`] when no endpoint is set.
    pub fn from_config(config: &ShopifyConfig) -> Result<Self, CredentialsError> {
        config
            .credentials_endpoint()
            .cloned()
            .map(Self::new)
            .ok_or(CredentialsError::NotConfigured)
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &ApiHost {
        &self.endpoint
    }

    fn url_for(&self, user_id: &str) -> String {
        self.endpoint.join(&urlencoding::encode(user_id))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_credentials(
        &self,
        user_id: &str,
        shop_type: &ShopType,
    ) -> Result<ShopCredentials, CredentialsError> {
        let response = self
            .client
            .get(self.url_for(user_id))
            .query(&[("shopType", shop_type.as_ref())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Credentials request failed");
                CredentialsError::Request(e)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::error!(status, "Credentials endpoint returned an error status");
            return Err(CredentialsError::Status {
                status,
                user_id: user_id.to_string(),
            });
        }

        let mut body: serde_json::Value = response.json().await?;
        if let Some(data) = body.get_mut("data").map(serde_json::Value::take) {
            body = data;
        }

        let raw: RawShopCredentials = serde_json::from_value(body).map_err(|e| {
            tracing::error!(error = %e, "Credentials response has an unexpected shape");
            CredentialsError::Decode(e)
        })?;

        ShopCredentials::try_from(raw).map_err(|source| {
            tracing::error!(error = %source, "Credentials failed validation");
            CredentialsError::Invalid {
                user_id: user_id.to_string(),
                source,
            }
        })
    }
}

impl CredentialsProvider for HttpCredentialsProvider {
    fn fetch<'a>(
        &'a self,
        user_id: &'a str,
        shop_type: &'a ShopType,
    ) -> BoxFuture<'a, Result<ShopCredentials, CredentialsError>> {
        Box::pin(self.fetch_credentials(user_id, shop_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = ShopifyConfig::builder().build().unwrap();
        assert!(matches!(
            HttpCredentialsProvider::from_config(&config),
            Err(CredentialsError::NotConfigured)
        ));
    }

    #[test]
    fn test_url_encodes_user_id() {
        let provider =
            HttpCredentialsProvider::new(ApiHost::new("https://users.internal/credentials/").unwrap());
        assert_eq!(
            provider.url_for("auth0|abc 1"),
            "https://users.internal/credentials/auth0%7Cabc%201"
        );
    }
}
