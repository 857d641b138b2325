//! Data types exchanged with Shopify and returned by the services.

mod fulfillment;
mod product;
mod rest;
mod webhook;

pub use fulfillment::{
    CancelledFulfillment, FulfilledOrder, FulfillmentDetails, FulfillmentOrder,
    FulfillmentOrderStatus, FulfillmentOutcome, FulfillmentRequest, LocationMove, LocationTarget,
    TrackingInfo,
};
pub use product::{
    HsnLookupOptions, HsnResponse, OrderDetails, OrderDetailsLineItem, Product, ProductPage,
    Variant, VariantHsn,
};
pub use rest::{
    Address, Fulfillment, InventoryItem, Location, Order, OrderLineItem, RestImage, RestProduct,
    RestVariant, Transaction,
};
pub use webhook::{
    ExistingWebhook, RegisteredWebhook, WebhookFailure, WebhookRegistrationReport,
    WebhookSubscription,
};
