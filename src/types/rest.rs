//! Shapes returned by the REST Admin API.
//!
//! Only the fields the services read are modelled; unknown fields are
//! ignored. Monetary amounts stay strings, as Shopify sends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// An order from `orders/{id}.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub admin_graphql_api_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

impl Order {
    /// `true` once Shopify has recorded a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }
}

/// A line item on a REST [`Order`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: u64,
    #[serde(default)]
    pub variant_id: Option<u64>,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub fulfillable_quantity: Option<u32>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub grams: Option<u64>,
}

/// A postal address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A shop location (warehouse, store, app-managed location).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Location {
    /// Compares `zip` with this location's zip, ignoring case and whitespace.
    #[must_use]
    pub fn zip_matches(&self, zip: &str) -> bool {
        let normalize = |value: &str| -> String {
            value
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect()
        };

        let wanted = normalize(zip);
        !wanted.is_empty()
            && self
                .zip
                .as_deref()
                .is_some_and(|own| normalize(own) == wanted)
    }
}

/// An inventory item, carrying customs data for a variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub harmonized_system_code: Option<String>,
    #[serde(default)]
    pub country_code_of_origin: Option<String>,
    #[serde(default)]
    pub tracked: Option<bool>,
    #[serde(default)]
    pub cost: Option<String>,
}

/// A payment transaction on an order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A fulfillment, as returned by REST or built from `fulfillmentCreate`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub id: u64,
    #[serde(default)]
    pub admin_graphql_api_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub location_id: Option<u64>,
    #[serde(default)]
    pub tracking_company: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub tracking_numbers: Vec<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Fulfillment {
    /// `true` for `cancelled`, `error` and `failure` fulfillments.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref().is_some_and(|status| {
            ["cancelled", "error", "failure"]
                .iter()
                .any(|s| status.eq_ignore_ascii_case(s))
        })
    }
}

/// A product as delivered by REST and by product webhooks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RestProduct {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Comma-separated, as Shopify sends it.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub variants: Vec<RestVariant>,
    #[serde(default)]
    pub images: Vec<RestImage>,
    #[serde(default)]
    pub image: Option<RestImage>,
}

/// A product variant from REST.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RestVariant {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub inventory_item_id: Option<u64>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub grams: Option<u64>,
    #[serde(default)]
    pub image_id: Option<u64>,
}

/// A product image from REST.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestImage {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub variant_ids: Vec<u64>,
}
