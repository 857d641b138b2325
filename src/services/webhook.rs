//! Webhook subscription management.

use serde_json::{json, Value};
use tracing::instrument;

use crate::conversions::edge_nodes;
use crate::services::errors::check_user_errors;
use crate::services::{queries, ServiceError, ShopifyService};
use crate::types::{
    ExistingWebhook, RegisteredWebhook, WebhookFailure, WebhookRegistrationReport,
    WebhookSubscription,
};

/// Registers and lists webhook subscriptions for the shop behind a
/// [`ShopifyService`].
#[derive(Debug, Clone, Copy)]
pub struct WebhookService<'a> {
    shopify: &'a ShopifyService,
}

impl<'a> WebhookService<'a> {
    #[must_use]
    pub const fn new(shopify: &'a ShopifyService) -> Self {
        Self { shopify }
    }

    /// Converts a REST topic to the `WebhookSubscriptionTopic` enum.
    ///
    /// ```rust
    /// use shopify_fulfillment::services::WebhookService;
    ///
    /// assert_eq!(WebhookService::topic_to_graphql("orders/create"), "ORDERS_CREATE");
    /// assert_eq!(WebhookService::topic_to_graphql("app/uninstalled"), "APP_UNINSTALLED");
    /// assert_eq!(WebhookService::topic_to_graphql("PRODUCTS_UPDATE"), "PRODUCTS_UPDATE");
    /// ```
    #[must_use]
    pub fn topic_to_graphql(topic: &str) -> String {
        topic.trim().replace(['/', '.'], "_").to_uppercase()
    }

    /// Registers the subscriptions from
    /// [`ShopifyConfig::webhook_subscriptions`](crate::ShopifyConfig::webhook_subscriptions).
    pub async fn register_webhooks(&self) -> WebhookRegistrationReport {
        self.register(self.shopify.config().webhook_subscriptions())
            .await
    }

    /// Registers each subscription, continuing past failures.
    ///
    /// Transport errors, GraphQL errors and `userErrors` are collected in
    /// [`WebhookRegistrationReport::failures`].
    #[instrument(skip(self, subscriptions), fields(shop = %self.shopify.shop_name(), count = subscriptions.len()))]
    pub async fn register(&self, subscriptions: &[WebhookSubscription]) -> WebhookRegistrationReport {
        let mut report = WebhookRegistrationReport::default();

        for subscription in subscriptions {
            match self.register_one(subscription).await {
                Ok(id) => {
                    tracing::info!(topic = %subscription.topic, %id, "Registered webhook");
                    report.registered.push(RegisteredWebhook {
                        topic: subscription.topic.clone(),
                        address: subscription.address.clone(),
                        id,
                    });
                }
                Err(e) => {
                    tracing::error!(topic = %subscription.topic, error = %e, "Webhook registration failed");
                    report.failures.push(WebhookFailure {
                        topic: subscription.topic.clone(),
                        address: subscription.address.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Lists the shop's current webhook subscriptions.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the query fails.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn list_webhooks(&self) -> Result<Vec<ExistingWebhook>, ServiceError> {
        let data = self
            .shopify
            .graphql(queries::WEBHOOK_SUBSCRIPTIONS, json!({}))
            .await?;

        edge_nodes(&data["webhookSubscriptions"])
            .into_iter()
            .map(|node| {
                Ok(ExistingWebhook {
                    id: node["id"]
                        .as_str()
                        .ok_or_else(|| ServiceError::MissingField("webhookSubscription.id".into()))?
                        .to_string(),
                    topic: node["topic"].as_str().unwrap_or_default().to_string(),
                    callback_url: node
                        .pointer("/endpoint/callbackUrl")
                        .or_else(|| node.get("callbackUrl"))
                        .and_then(Value::as_str)
                        .map(String::from),
                    format: node["format"].as_str().map(String::from),
                })
            })
            .collect()
    }

    async fn register_one(&self, subscription: &WebhookSubscription) -> Result<String, ServiceError> {
        let data = self
            .shopify
            .graphql(
                queries::WEBHOOK_SUBSCRIPTION_CREATE,
                json!({
                    "topic": Self::topic_to_graphql(&subscription.topic),
                    "webhookSubscription": {
                        "callbackUrl": subscription.address,
                        "format": "JSON",
                    },
                }),
            )
            .await?;
        let payload = &data["webhookSubscriptionCreate"];
        check_user_errors(payload, "webhookSubscriptionCreate")?;

        payload
            .pointer("/webhookSubscription/id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ServiceError::MissingField("webhookSubscriptionCreate.webhookSubscription.id".into()))
    }
}
