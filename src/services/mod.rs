//! Shopify operations built on the API clients.
//!
//! [`ShopifyService`] owns the clients for one shop. [`FulfillmentService`],
//! [`ProductService`] and [`WebhookService`] borrow it and group the
//! higher-level workflows.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_fulfillment::services::{FulfillmentService, ShopifyService};
//! use shopify_fulfillment::types::{FulfillmentRequest, LocationTarget, TrackingInfo};
//!
//! let shopify = ShopifyService::new(&credentials, &config);
//! let outcome = FulfillmentService::new(&shopify)
//!     .create_fulfillment(&FulfillmentRequest {
//!         order_id: 450_789_469,
//!         location: Some(LocationTarget::Zip("40202".into())),
//!         tracking: TrackingInfo::default(),
//!         notify_customer: true,
//!     })
//!     .await?;
//! ```

mod errors;
mod fulfillment;
mod product;
mod queries;
mod shopify;
mod webhook;

pub use errors::ServiceError;
pub use fulfillment::FulfillmentService;
pub use product::ProductService;
pub use shopify::ShopifyService;
pub use webhook::WebhookService;
