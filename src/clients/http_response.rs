//! Parsed responses returned by [`HttpClient`](crate::clients::HttpClient).

use std::collections::HashMap;

/// Leaky-bucket usage from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// ```rust
/// use shopify_fulfillment::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("32/40").unwrap();
/// assert_eq!(limit.remaining(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Requests currently in the bucket.
    pub request_count: u32,
    /// Bucket capacity.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses an `X/Y` header value.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.trim().split_once('/')?;
        Some(Self {
            request_count: count.parse().ok()?,
            bucket_size: size.parse().ok()?,
        })
    }

    /// Requests left before Shopify starts throttling.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.bucket_size.saturating_sub(self.request_count)
    }
}

/// A response from the Admin API.
///
/// Header names are lower-cased; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers.
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed JSON body (`{}` when empty).
    pub body: serde_json::Value,
    /// Parsed `X-Shopify-Shop-Api-Call-Limit`.
    pub api_call_limit: Option<ApiCallLimit>,
    /// Parsed `Retry-After`, in seconds.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Builds a response and parses the Shopify rate-limit headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let api_call_limit = first_header(&headers, "x-shopify-shop-api-call-limit")
            .and_then(ApiCallLimit::parse);
        let retry_request_after = first_header(&headers, "retry-after")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite());

        Self {
            code,
            headers,
            body,
            api_call_limit,
            retry_request_after,
        }
    }

    /// `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// The `X-Request-Id` header, used as an error reference.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        first_header(&self.headers, "x-request-id")
    }

    /// The `X-Shopify-API-Deprecated-Reason` header.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        first_header(&self.headers, "x-shopify-api-deprecated-reason")
    }
}

fn first_header<'a>(headers: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}
