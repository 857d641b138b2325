//! REST-specific error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// ```rust
/// use shopify_fulfillment::clients::RestError;
///
/// let error = RestError::InvalidPath { path: String::new() };
/// assert_eq!(error.to_string(), "Invalid REST API path: ");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The path was empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl RestError {
    /// Returns the HTTP status code Shopify answered with, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidPath { .. } => None,
            Self::Http(e) => e.status(),
        }
    }
}
