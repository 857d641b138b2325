use crate::clients::rest::RestError;
use crate::clients::{DataType, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, ShopifyConfig};
use crate::credentials::ShopCredentials;

/// REST Admin API client for one shop.
///
/// Every request is attempted [`ShopifyConfig::tries`] times (1 when no
/// config is supplied).
///
/// # Example
///
/// ```rust,ignore
/// use shopify_fulfillment::clients::RestClient;
///
/// let client = RestClient::new(&credentials, Some(&config));
/// let response = client.get("orders/450789469", None).await?;
/// println!("{}", response.body["order"]["name"]);
/// ```
#[derive(Debug)]
pub struct RestClient {
    http_client: HttpClient,
    api_version: ApiVersion,
    tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a REST client for the shop in `credentials`.
    #[must_use]
    pub fn new(credentials: &ShopCredentials, config: Option<&ShopifyConfig>) -> Self {
        let api_version = config.map_or_else(ApiVersion::latest, |c| c.api_version().clone());
        let tries = config.map_or(1, ShopifyConfig::tries);
        let http_client = HttpClient::new(format!("/admin/api/{api_version}"), credentials, config);

        Self {
            http_client,
            api_version,
            tries,
        }
    }

    /// Returns the API version used in the base path.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] for an empty path and
    /// [`RestError::Http`] for anything that fails on the wire.
    pub async fn get(
        &self,
        path: &str,
        query: Option<Vec<(String, String)>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Get, path, None, query).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<Vec<(String, String)>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Post, path, Some(body), query)
            .await
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        query: Option<Vec<(String, String)>>,
    ) -> Result<HttpResponse, RestError> {
        let path = normalize_path(path)?;

        let mut builder = HttpRequest::builder(method, path).tries(self.tries);
        if let Some(body) = body {
            builder = builder.body(body).body_type(DataType::Json);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }

        let request = builder.build().map_err(|e| RestError::Http(e.into()))?;
        self.http_client.request(request).await.map_err(Into::into)
    }
}

/// Strips leading `/` and any `.json` suffix, then appends `.json`.
fn normalize_path(path: &str) -> Result<String, RestError> {
    let trimmed = path.trim_start_matches('/');
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(RestError::InvalidPath {
            path: path.to_string(),
        });
    }

    Ok(format!("{trimmed}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_credentials() -> ShopCredentials {
        ShopCredentials::new("test-shop", "test-key", "test-password").unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("orders/1").unwrap(), "orders/1.json");
        assert_eq!(normalize_path("/orders/1").unwrap(), "orders/1.json");
        assert_eq!(normalize_path("orders/1.json").unwrap(), "orders/1.json");
        assert_eq!(
            normalize_path("//orders/1/cancel.json").unwrap(),
            "orders/1/cancel.json"
        );
    }

    #[test]
    fn test_normalize_path_rejects_empty_paths() {
        for path in ["", "/", "/.json"] {
            assert!(
                matches!(normalize_path(path), Err(RestError::InvalidPath { .. })),
                "expected {path:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_new_uses_latest_version_without_config() {
        let client = RestClient::new(&create_test_credentials(), None);
        assert_eq!(client.api_version(), &ApiVersion::latest());
        assert_eq!(client.tries, 1);
    }

    #[test]
    fn test_new_takes_version_and_tries_from_config() {
        let config = ShopifyConfig::builder()
            .api_version(ApiVersion::V2025_07)
            .tries(3)
            .build()
            .unwrap();
        let client = RestClient::new(&create_test_credentials(), Some(&config));

        assert_eq!(client.api_version(), &ApiVersion::V2025_07);
        assert_eq!(client.tries, 3);
    }
}
