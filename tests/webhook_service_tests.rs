//! Integration tests for webhook registration against a mock Admin API.

use serde_json::json;
use shopify_fulfillment::credentials::ShopCredentials;
use shopify_fulfillment::services::{ShopifyService, WebhookService};
use shopify_fulfillment::types::WebhookSubscription;
use shopify_fulfillment::{ApiHost, ApiVersion, ShopifyConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2025-10/graphql.json";

fn create_service(server: &MockServer, subscriptions: Vec<WebhookSubscription>) -> ShopifyService {
    let config = ShopifyConfig::builder()
        .api_version(ApiVersion::V2025_10)
        .api_host(ApiHost::new(server.uri()).unwrap())
        .webhook_subscriptions(subscriptions)
        .build()
        .unwrap();
    let credentials = ShopCredentials::new("acme", "test-key", "shppa_test").unwrap();
    ShopifyService::new(&credentials, &config)
}

#[tokio::test]
async fn test_register_webhooks_collects_failures_and_continues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("\"topic\":\"ORDERS_CREATE\""))
        .and(body_string_contains("\"format\":\"JSON\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"webhookSubscriptionCreate": {
                "webhookSubscription": {"id": "gid://shopify/WebhookSubscription/1", "topic": "ORDERS_CREATE"},
                "userErrors": []
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("\"topic\":\"ORDERS_CANCELLED\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"webhookSubscriptionCreate": {
                "webhookSubscription": null,
                "userErrors": [{"field": ["webhookSubscription", "callbackUrl"], "message": "Address for this topic has already been taken"}]
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("\"topic\":\"PRODUCTS_UPDATE\""))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let shopify = create_service(
        &server,
        vec![
            WebhookSubscription::new("orders/create", "https://hooks.example.com/orders"),
            WebhookSubscription::new("orders/cancelled", "https://hooks.example.com/orders"),
            WebhookSubscription::new("products/update", "https://hooks.example.com/products"),
        ],
    );
    let report = WebhookService::new(&shopify).register_webhooks().await;

    assert!(!report.is_complete());
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.registered[0].topic, "orders/create");
    assert_eq!(report.registered[0].id, "gid://shopify/WebhookSubscription/1");

    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].topic, "orders/cancelled");
    assert!(report.failures[0].reason.contains("already been taken"));
    assert_eq!(report.failures[1].topic, "products/update");
}

#[tokio::test]
async fn test_register_nothing_is_complete() {
    let server = MockServer::start().await;
    let shopify = create_service(&server, Vec::new());

    let report = WebhookService::new(&shopify).register(&[]).await;

    assert!(report.is_complete());
    assert!(report.registered.is_empty());
}

#[tokio::test]
async fn test_list_webhooks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("WebhookSubscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"webhookSubscriptions": {"edges": [
                {"node": {
                    "id": "gid://shopify/WebhookSubscription/7",
                    "topic": "ORDERS_PAID",
                    "format": "JSON",
                    "endpoint": {"__typename": "WebhookHttpEndpoint", "callbackUrl": "https://hooks.example.com/paid"}
                }},
                {"node": {
                    "id": "gid://shopify/WebhookSubscription/8",
                    "topic": "APP_UNINSTALLED",
                    "format": "JSON",
                    "endpoint": {"__typename": "WebhookEventBridgeEndpoint"}
                }}
            ]}}
        })))
        .mount(&server)
        .await;

    let shopify = create_service(&server, Vec::new());
    let webhooks = WebhookService::new(&shopify).list_webhooks().await.unwrap();

    assert_eq!(webhooks.len(), 2);
    assert_eq!(
        webhooks[0].callback_url.as_deref(),
        Some("https://hooks.example.com/paid")
    );
    assert_eq!(webhooks[1].topic, "APP_UNINSTALLED");
    assert_eq!(webhooks[1].callback_url, None);
}
