//! Errors returned by the service layer.

use serde_json::Value;
use thiserror::Error;

use crate::clients::{GraphqlError, RestError};
use crate::credentials::CredentialsError;

/// Error type for every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A REST request failed.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// A GraphQL request failed at the HTTP level.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// The GraphQL response carried a top-level `errors` array.
    #[error("GraphQL errors: {0}")]
    Query(String),

    /// A mutation returned `userErrors`.
    #[error("{operation} failed: {message}")]
    UserErrors {
        /// The mutation name.
        operation: &'static str,
        /// `field: message` pairs joined with `; `.
        message: String,
    },

    /// An expected field was absent from the response.
    #[error("Missing field '{0}' in Shopify response")]
    MissingField(String),

    /// A response field did not have the expected shape.
    #[error("Could not decode {context}: {source}")]
    Decode {
        /// What was being decoded.
        context: &'static str,
        /// The serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// Shop credentials could not be resolved.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Shopify had no such resource.
    #[error("{resource} {id} not found")]
    NotFound {
        /// The resource kind, e.g. `order`.
        resource: &'static str,
        /// The id that was looked up.
        id: u64,
    },
}

impl ServiceError {
    pub(crate) fn decode(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Decode { context, source }
    }

    /// `true` when Shopify answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Rest(e) => e.status() == Some(404),
            _ => false,
        }
    }
}

/// Joins a top-level GraphQL `errors` array into one message.
pub(crate) fn format_graphql_errors(errors: &Value) -> String {
    errors.as_array().map_or_else(
        || errors.to_string(),
        |list| {
            list.iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| e.to_string(), String::from)
                })
                .collect::<Vec<_>>()
                .join("; ")
        },
    )
}

/// Fails with [`ServiceError::UserErrors`] when `payload.userErrors` is
/// non-empty.
pub(crate) fn check_user_errors(
    payload: &Value,
    operation: &'static str,
) -> Result<(), ServiceError> {
    let Some(errors) = payload
        .get("userErrors")
        .and_then(Value::as_array)
        .filter(|errors| !errors.is_empty())
    else {
        return Ok(());
    };

    let message = errors
        .iter()
        .map(|e| {
            let field = e
                .get("field")
                .and_then(Value::as_array)
                .map_or_else(String::new, |parts| {
                    parts
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(".")
                });
            let message = e.get("message").and_then(Value::as_str).unwrap_or_default();
            format!("{field}: {message}")
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(ServiceError::UserErrors { operation, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_errors_are_joined() {
        let payload = json!({
            "userErrors": [
                {"field": ["fulfillment", "trackingInfo"], "message": "is invalid"},
                {"field": null, "message": "Fulfillment order is closed"}
            ]
        });

        let error = check_user_errors(&payload, "fulfillmentCreate").unwrap_err();
        assert_eq!(
            error.to_string(),
            "fulfillmentCreate failed: fulfillment.trackingInfo: is invalid; : Fulfillment order is closed"
        );
    }

    #[test]
    fn test_empty_user_errors_pass() {
        assert!(check_user_errors(&json!({"userErrors": []}), "orderMarkAsPaid").is_ok());
        assert!(check_user_errors(&json!({}), "orderMarkAsPaid").is_ok());
    }

    #[test]
    fn test_format_graphql_errors() {
        let errors = json!([
            {"message": "Field 'foo' doesn't exist on type 'Order'"},
            {"message": "Throttled"}
        ]);
        assert_eq!(
            format_graphql_errors(&errors),
            "Field 'foo' doesn't exist on type 'Order'; Throttled"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(ServiceError::NotFound {
            resource: "order",
            id: 1
        }
        .is_not_found());
        assert!(!ServiceError::MissingField("data".to_string()).is_not_found());
    }
}
