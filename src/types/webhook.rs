//! Webhook subscription types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A webhook to register: a REST-style topic and a callback URL.
///
/// ```rust
/// use shopify_fulfillment::types::WebhookSubscription;
///
/// let list = WebhookSubscription::parse_list(
///     r#"[{"topic": "orders/create", "address": "https://hooks.example.com/orders"}]"#,
/// )
/// .unwrap();
/// assert_eq!(list[0].topic, "orders/create");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub topic: String,
    pub address: String,
}

impl WebhookSubscription {
    /// Creates a subscription.
    #[must_use]
    pub fn new(topic: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            address: address.into(),
        }
    }

    /// Parses a JSON array of `{"topic", "address"}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWebhookSubscriptions`] for malformed JSON
    /// or an entry with a blank topic or address.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ConfigError> {
        let list: Vec<Self> = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidWebhookSubscriptions {
                reason: e.to_string(),
            })?;

        if let Some(index) = list
            .iter()
            .position(|s| s.topic.trim().is_empty() || s.address.trim().is_empty())
        {
            return Err(ConfigError::InvalidWebhookSubscriptions {
                reason: format!("entry {index} has an empty topic or address"),
            });
        }

        Ok(list)
    }
}

/// A subscription Shopify accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredWebhook {
    pub topic: String,
    pub address: String,
    /// `gid://shopify/WebhookSubscription/...`.
    pub id: String,
}

/// A subscription that could not be registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookFailure {
    pub topic: String,
    pub address: String,
    pub reason: String,
}

/// Outcome of registering a list of subscriptions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegistrationReport {
    pub registered: Vec<RegisteredWebhook>,
    pub failures: Vec<WebhookFailure>,
}

impl WebhookRegistrationReport {
    /// `true` when every subscription was registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A subscription already present on the shop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingWebhook {
    pub id: String,
    /// GraphQL enum form, e.g. `ORDERS_CREATE`.
    pub topic: String,
    pub callback_url: Option<String>,
    pub format: Option<String>,
}
