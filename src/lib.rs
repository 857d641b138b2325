//! # Shopify Fulfillment
//!
//! Admin API plumbing for a third-party warehouse that fulfills Shopify
//! orders on behalf of many merchants.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ShopifyConfig`] and [`ShopifyConfigBuilder`]
//! - Per-user shop credentials fetched from an HTTP endpoint and cached in
//!   memory via [`credentials`]
//! - Async REST and GraphQL clients with retry and rate-limit handling via
//!   [`clients`]
//! - Payload conversions from Shopify's nested GraphQL shapes via
//!   [`conversions`]
//! - Fulfillment, product, order and webhook operations via [`services`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_fulfillment::credentials::ShopCredentials;
//! use shopify_fulfillment::services::ShopifyService;
//! use shopify_fulfillment::{ApiVersion, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .api_version(ApiVersion::latest())
//!     .fulfillment_service_name("wherehouse")
//!     .build()
//!     .unwrap();
//!
//! let credentials = ShopCredentials::new("acme", "api-key", "shppa_password").unwrap();
//! let shopify = ShopifyService::new(&credentials, &config);
//! assert_eq!(shopify.shop_name().as_ref(), "acme.myshopify.com");
//! ```
//!
//! ## Fulfilling an Order
//!
//! ```rust,ignore
//! use shopify_fulfillment::services::{FulfillmentService, ShopifyService};
//! use shopify_fulfillment::types::{FulfillmentRequest, LocationTarget, TrackingInfo};
//!
//! let shopify = ShopifyService::for_user(&cache, &config, "user-42", &ShopType::default()).await?;
//! let outcome = FulfillmentService::new(&shopify)
//!     .create_fulfillment(&FulfillmentRequest {
//!         order_id: 450_789_469,
//!         location: Some(LocationTarget::Zip("40202".into())),
//!         tracking: TrackingInfo {
//!             company: Some("UPS".into()),
//!             number: Some("1Z999AA10123456784".into()),
//!             url: None,
//!         },
//!         notify_customer: true,
//!     })
//!     .await?;
//!
//! for failed in outcome.moves.iter().filter(|m| !m.moved) {
//!     eprintln!("{} stayed put: {:?}", failed.fulfillment_order_id, failed.error);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and caches are passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: public types are `Send + Sync`
//! - **Async-first**: designed for the Tokio runtime

pub mod clients;
pub mod config;
pub mod conversions;
pub mod credentials;
pub mod error;
pub mod services;
pub mod types;

// Re-export public types at crate root for convenience
pub use config::{
    ApiHost, ApiKey, ApiPassword, ApiVersion, ShopDomain, ShopType, ShopifyConfig,
    ShopifyConfigBuilder,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiCallLimit, DataType, GraphqlClient, GraphqlError, HttpClient, HttpError, HttpMethod,
    HttpRequest, HttpRequestBuilder, HttpResponse, HttpResponseError, InvalidHttpRequestError,
    MaxHttpRetriesExceededError, RestClient, RestError,
};

pub use credentials::{CredentialCache, CredentialsError, HttpCredentialsProvider, ShopCredentials};
pub use services::{FulfillmentService, ProductService, ServiceError, ShopifyService, WebhookService};
