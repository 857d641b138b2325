//! Errors raised while resolving shop credentials.

use crate::error::ConfigError;
use thiserror::Error;

/// Failure to obtain credentials for a user.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials endpoint is configured.
    #[error("No user credentials endpoint configured. Set USER_CREDENTIALS_URL or ShopifyConfigBuilder::credentials_endpoint.")]
    NotConfigured,

    /// The credentials endpoint could not be reached.
    #[error("Credentials request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The credentials endpoint answered with a non-2xx status.
    #[error("Credentials endpoint returned {status} for user '{user_id}'")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The user whose credentials were requested.
        user_id: String,
    },

    /// The returned credentials failed validation.
    #[error("Invalid credentials for user '{user_id}': {source}")]
    Invalid {
        /// The user whose credentials were requested.
        user_id: String,
        /// The validation failure.
        #[source]
        source: ConfigError,
    },

    /// The response body was not a credentials object.
    #[error("Could not decode credentials response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_user() {
        let error = CredentialsError::Status {
            status: 404,
            user_id: "user-42".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Credentials endpoint returned 404 for user 'user-42'"
        );
    }

    #[test]
    fn test_invalid_keeps_config_error_as_source() {
        let error = CredentialsError::Invalid {
            user_id: "user-42".to_string(),
            source: ConfigError::EmptyApiPassword,
        };
        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().contains("API password cannot be empty"));
    }
}
