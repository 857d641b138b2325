//! GraphQL-specific error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for GraphQL transport failures.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}
