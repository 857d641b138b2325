//! Product transforms, catalog paging, order details and HSN lookups.

use serde_json::{json, Value};
use tracing::instrument;

use crate::conversions::{
    edge_nodes, order_details_from_graphql, product_from_graphql, product_from_rest, to_gid,
};
use crate::services::{queries, ServiceError, ShopifyService};
use crate::types::{HsnLookupOptions, HsnResponse, OrderDetails, Product, ProductPage, VariantHsn};

/// Product and order-detail operations for the shop behind a
/// [`ShopifyService`].
#[derive(Debug, Clone, Copy)]
pub struct ProductService<'a> {
    shopify: &'a ShopifyService,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(shopify: &'a ShopifyService) -> Self {
        Self { shopify }
    }

    /// Converts a `products/*` webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Decode`] if the payload is not a product.
    pub fn transform_webhook_product(&self, payload: &Value) -> Result<Product, ServiceError> {
        product_from_rest(payload)
    }

    /// Converts a GraphQL `Product` node.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingField`] if the node has no id.
    pub fn transform_graphql_product(&self, node: &Value) -> Result<Product, ServiceError> {
        product_from_graphql(node)
    }

    /// Fetches one page of products.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the query fails or a product cannot be
    /// converted.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn get_products(
        &self,
        first: u32,
        after: Option<&str>,
    ) -> Result<ProductPage, ServiceError> {
        let data = self
            .shopify
            .graphql(queries::PRODUCTS, json!({ "first": first, "after": after }))
            .await?;
        let connection = &data["products"];

        let products = edge_nodes(connection)
            .into_iter()
            .map(product_from_graphql)
            .collect::<Result<Vec<_>, _>>()?;
        let page_info = &connection["pageInfo"];

        Ok(ProductPage {
            products,
            has_next_page: page_info["hasNextPage"].as_bool().unwrap_or(false),
            end_cursor: page_info["endCursor"].as_str().map(String::from),
        })
    }

    /// Fetches every product, `page_size` at a time. Paging stops early if
    /// Shopify hands back the cursor it was just given.
    ///
    /// # Errors
    ///
    /// Returns the first page failure.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn get_all_products(&self, page_size: u32) -> Result<Vec<Product>, ServiceError> {
        let mut products = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.get_products(page_size, cursor.as_deref()).await?;
            products.extend(page.products);

            match page.end_cursor {
                Some(next) if page.has_next_page => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        tracing::warn!(cursor = %next, "Product cursor did not advance, stopping");
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        tracing::debug!(count = products.len(), "Fetched all products");
        Ok(products)
    }

    /// Fetches a single product over GraphQL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when Shopify returns no product.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn get_product(&self, product_id: u64) -> Result<Product, ServiceError> {
        let data = self
            .shopify
            .graphql(queries::PRODUCT, json!({ "id": to_gid("Product", product_id) }))
            .await?;
        let node = data
            .get("product")
            .filter(|node| !node.is_null())
            .ok_or(ServiceError::NotFound {
                resource: "product",
                id: product_id,
            })?;
        product_from_graphql(node)
    }

    /// Fetches an order with line items, totals and shipping address.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when Shopify returns no order.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn get_order_details(&self, order_id: u64) -> Result<OrderDetails, ServiceError> {
        let data = self
            .shopify
            .graphql(queries::ORDER_DETAILS, json!({ "id": to_gid("Order", order_id) }))
            .await?;
        let node = data
            .get("order")
            .filter(|node| !node.is_null())
            .ok_or(ServiceError::NotFound {
                resource: "order",
                id: order_id,
            })?;
        order_details_from_graphql(node)
    }

    /// Looks up harmonized system codes for the variants of each product.
    ///
    /// Products are processed in order and at most
    /// [`hsn_max_variants`](crate::ShopifyConfig::hsn_max_variants) variants
    /// are looked up per product. Every inventory-item request is preceded
    /// by a [`hsn_lookup_delay`](crate::ShopifyConfig::hsn_lookup_delay)
    /// pause to stay under the REST rate limit.
    ///
    /// Failures are logged. With `stop_on_error` the results gathered so
    /// far are returned, including the product being processed. Otherwise
    /// the failed variant is skipped, and a product that cannot be fetched
    /// is left out.
    #[instrument(skip(self, product_ids), fields(shop = %self.shopify.shop_name(), products = product_ids.len()))]
    pub async fn get_variant_hsn_codes(
        &self,
        product_ids: &[u64],
        options: HsnLookupOptions,
    ) -> Vec<HsnResponse> {
        let config = self.shopify.config();
        let mut responses = Vec::with_capacity(product_ids.len());

        for &product_id in product_ids {
            let product = match self.shopify.get_product(product_id).await {
                Ok(product) => product,
                Err(e) => {
                    tracing::error!(product_id, error = %e, "HSN lookup: product fetch failed");
                    if options.stop_on_error {
                        return responses;
                    }
                    continue;
                }
            };

            let mut response = HsnResponse {
                product_id,
                variants: Vec::new(),
            };

            for variant in product.variants.iter().take(config.hsn_max_variants()) {
                let Some(inventory_item_id) = variant.inventory_item_id else {
                    tracing::debug!(variant_id = variant.id, "Variant has no inventory item");
                    continue;
                };

                tokio::time::sleep(config.hsn_lookup_delay()).await;

                match self.shopify.get_inventory_item(inventory_item_id).await {
                    Ok(item) => response.variants.push(VariantHsn {
                        variant_id: variant.id,
                        inventory_item_id,
                        sku: variant.sku.clone().or(item.sku),
                        harmonized_system_code: item.harmonized_system_code,
                        country_code_of_origin: item.country_code_of_origin,
                    }),
                    Err(e) => {
                        tracing::error!(
                            product_id,
                            variant_id = variant.id,
                            inventory_item_id,
                            error = %e,
                            "HSN lookup: inventory item fetch failed"
                        );
                        if options.stop_on_error {
                            responses.push(response);
                            return responses;
                        }
                    }
                }
            }

            responses.push(response);
        }

        responses
    }
}
