//! Integration tests for fetching and caching shop credentials.

use serde_json::json;
use shopify_fulfillment::credentials::{
    CredentialCache, CredentialsError, CredentialsProvider, HttpCredentialsProvider,
};
use shopify_fulfillment::services::ShopifyService;
use shopify_fulfillment::{ApiHost, ShopType, ShopifyConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_provider(server: &MockServer) -> HttpCredentialsProvider {
    HttpCredentialsProvider::new(ApiHost::new(format!("{}/credentials", server.uri())).unwrap())
}

#[tokio::test]
async fn test_fetch_unwraps_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/user-42"))
        .and(query_param("shopType", "shopify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"shopName": "acme", "apiKey": "key", "password": "shppa_secret"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = tokio_test::assert_ok!(
        create_provider(&server)
            .fetch("user-42", &ShopType::default())
            .await
    );

    assert_eq!(credentials.shop_name.as_ref(), "acme.myshopify.com");
    assert_eq!(credentials.password.as_ref(), "shppa_secret");
}

#[tokio::test]
async fn test_fetch_accepts_bare_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/user-7"))
        .and(query_param("shopType", "shopify-plus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shopName": "plus-shop.myshopify.com", "apiKey": "key", "password": "pw"
        })))
        .mount(&server)
        .await;

    let credentials = create_provider(&server)
        .fetch("user-7", &ShopType::new("Shopify-Plus").unwrap())
        .await
        .unwrap();

    assert_eq!(credentials.shop_name.as_ref(), "plus-shop.myshopify.com");
}

#[tokio::test]
async fn test_fetch_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = create_provider(&server)
        .fetch("ghost", &ShopType::default())
        .await;

    assert!(matches!(
        result,
        Err(CredentialsError::Status { status: 404, ref user_id }) if user_id == "ghost"
    ));
}

#[tokio::test]
async fn test_fetch_rejects_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shopName": "acme", "apiKey": "", "password": "pw"
        })))
        .mount(&server)
        .await;

    let result = create_provider(&server)
        .fetch("user-1", &ShopType::default())
        .await;

    assert!(matches!(result, Err(CredentialsError::Invalid { .. })));
}

#[tokio::test]
async fn test_cache_hits_endpoint_once_per_user_and_shop_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/user-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shopName": "acme", "apiKey": "key", "password": "pw"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = CredentialCache::new(create_provider(&server));
    let shop_type = ShopType::default();

    let first = cache.get("user-42", &shop_type).await.unwrap();
    let second = cache.get("user-42", &shop_type).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_service_for_user_resolves_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credentials/user-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"shopName": "acme", "apiKey": "key", "password": "pw"}
        })))
        .mount(&server)
        .await;

    let config = ShopifyConfig::builder()
        .credentials_endpoint(ApiHost::new(format!("{}/credentials", server.uri())).unwrap())
        .build()
        .unwrap();
    let cache = CredentialCache::new(HttpCredentialsProvider::from_config(&config).unwrap());

    let shopify = ShopifyService::for_user(&cache, &config, "user-42", &ShopType::default())
        .await
        .unwrap();

    assert_eq!(shopify.shop_name().as_ref(), "acme.myshopify.com");
}
