use std::collections::HashMap;

use crate::clients::graphql::GraphqlError;
use crate::clients::{DataType, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, ShopifyConfig};
use crate::credentials::ShopCredentials;

/// GraphQL Admin API client for one shop.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_fulfillment::clients::GraphqlClient;
/// use serde_json::json;
///
/// let client = GraphqlClient::new(&credentials, Some(&config));
/// let response = client
///     .query(
///         "query($id: ID!) { order(id: $id) { name } }",
///         Some(json!({ "id": "gid://shopify/Order/450789469" })),
///         None,
///         None,
///     )
///     .await?;
/// println!("{}", response.body["data"]["order"]["name"]);
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    http_client: HttpClient,
    api_version: ApiVersion,
    default_tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a GraphQL client for the shop in `credentials`.
    #[must_use]
    pub fn new(credentials: &ShopCredentials, config: Option<&ShopifyConfig>) -> Self {
        let api_version = config.map_or_else(ApiVersion::latest, |c| c.api_version().clone());
        let default_tries = config.map_or(1, ShopifyConfig::tries);
        let http_client = HttpClient::new(format!("/admin/api/{api_version}"), credentials, config);

        Self {
            http_client,
            api_version,
            default_tries,
        }
    }

    /// Returns the API version used in the base path.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// POSTs `{"query", "variables"}` to `graphql.json`.
    ///
    /// `tries` falls back to the configured default. GraphQL-level errors come
    /// back with HTTP 200 and are left in `response.body["errors"]`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] for network errors, non-2xx responses
    /// and retry exhaustion.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        headers: Option<HashMap<String, String>>,
        tries: Option<u32>,
    ) -> Result<HttpResponse, GraphqlError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let mut builder = HttpRequest::builder(HttpMethod::Post, "graphql.json")
            .body(body)
            .body_type(DataType::Json)
            .tries(tries.unwrap_or(self.default_tries));
        if let Some(headers) = headers {
            builder = builder.extra_headers(headers);
        }

        let request = builder.build().map_err(|e| GraphqlError::Http(e.into()))?;
        self.http_client.request(request).await.map_err(Into::into)
    }
}
