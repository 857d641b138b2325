//! HTTP plumbing for the Shopify Admin API.
//!
//! [`HttpClient`] sends authenticated requests for one shop and retries 429
//! and 500 responses. [`RestClient`] and [`GraphqlClient`] sit on top of it
//! and are what the services hold.
//!
//! Requests are attempted once unless [`ShopifyConfig::tries`] says
//! otherwise. A 429 waits for `Retry-After`; a 500 waits one second.
//!
//! [`ShopifyConfig::tries`]: crate::ShopifyConfig::tries

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, LIBRARY_VERSION, RETRY_WAIT_TIME};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse};

pub use graphql::{GraphqlClient, GraphqlError};
pub use rest::{RestClient, RestError};
