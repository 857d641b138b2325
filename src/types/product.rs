//! Flattened product, order and HSN types handed back to callers.

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// A product with numeric ids and plain image URLs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub handle: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
}

/// A product variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    pub title: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub price: Option<String>,
    pub inventory_item_id: Option<u64>,
    /// Missing quantities count as zero.
    pub inventory_quantity: i64,
    pub weight: Option<f64>,
    /// Short form: `g`, `kg`, `oz`, `lb`.
    pub weight_unit: Option<String>,
    pub image_url: Option<String>,
}

/// One page of products from the GraphQL connection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Order summary used for packing and customs paperwork.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub created_at: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub shipping_address: Option<Address>,
    pub line_items: Vec<OrderDetailsLineItem>,
}

/// A line item in [`OrderDetails`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailsLineItem {
    pub id: u64,
    pub title: String,
    pub sku: Option<String>,
    pub quantity: u32,
    pub product_id: Option<u64>,
    pub variant_id: Option<u64>,
    pub unit_price: Option<String>,
}

/// HSN codes collected for one product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsnResponse {
    pub product_id: u64,
    pub variants: Vec<VariantHsn>,
}

/// Customs data for one variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantHsn {
    pub variant_id: u64,
    pub inventory_item_id: u64,
    pub sku: Option<String>,
    pub harmonized_system_code: Option<String>,
    pub country_code_of_origin: Option<String>,
}

/// Controls [`ProductService::get_variant_hsn_codes`].
///
/// [`ProductService::get_variant_hsn_codes`]: crate::services::ProductService::get_variant_hsn_codes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HsnLookupOptions {
    /// Return what was gathered so far on the first failure instead of
    /// skipping the failed lookup.
    pub stop_on_error: bool,
}
