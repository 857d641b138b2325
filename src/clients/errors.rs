//! HTTP-level error types.
//!
//! - [`HttpResponseError`]: a non-2xx response from Shopify
//! - [`MaxHttpRetriesExceededError`]: 429/500 persisted past the retry budget
//! - [`InvalidHttpRequestError`]: a request rejected before it was sent
//! - [`HttpError`]: the union of the above plus transport failures

use thiserror::Error;

/// A non-successful response.
///
/// `message` is a compact JSON object holding Shopify's `errors`/`error`
/// fields and, when present, the `X-Request-Id` reference.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID from the `X-Request-Id` header.
    pub error_reference: Option<String>,
}

/// Returned when 429/500 responses continue after every configured attempt.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of attempts made.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID from the `X-Request-Id` header.
    pub error_reference: Option<String>,
}

/// A request that failed validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request was configured with zero attempts.
    #[error("A request must be attempted at least once.")]
    ZeroTries,
}

/// Unified error type for all HTTP-related failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx status code.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if Shopify answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"errors":"Not Found"}"#);
    }

    #[test]
    fn test_max_retries_error_includes_retry_count() {
        let error = MaxHttpRetriesExceededError {
            code: 429,
            tries: 3,
            message: r#"{"errors":"Throttled"}"#.to_string(),
            error_reference: None,
        };
        let message = error.to_string();
        assert!(message.contains("Exceeded maximum retry count of 3"));
        assert!(message.contains("Throttled"));
    }

    #[test]
    fn test_invalid_request_messages() {
        assert_eq!(
            InvalidHttpRequestError::MissingBody {
                method: "put".to_string()
            }
            .to_string(),
            "Cannot use put without specifying data."
        );
        assert_eq!(
            InvalidHttpRequestError::MissingBodyType.to_string(),
            "Cannot set a body without also setting body_type."
        );
    }

    #[test]
    fn test_status_is_exposed_for_response_errors() {
        let error = HttpError::Response(HttpResponseError {
            code: 422,
            message: "{}".to_string(),
            error_reference: None,
        });
        assert_eq!(error.status(), Some(422));

        let error = HttpError::InvalidRequest(InvalidHttpRequestError::ZeroTries);
        assert_eq!(error.status(), None);
    }
}
