//! Reshaping of Shopify payloads into the flat types in [`crate::types`].
//!
//! GraphQL responses nest everything under `edges { node }` and identify
//! objects by global ids (`gid://shopify/Product/123`). The functions here
//! walk those shapes as [`serde_json::Value`] and produce numeric ids, short
//! weight units and plain image URLs.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::services::ServiceError;
use crate::types::{
    Address, Fulfillment, FulfillmentOrder, FulfillmentOrderStatus, OrderDetails,
    OrderDetailsLineItem, Product, RestProduct, Variant,
};

/// Extracts the numeric tail of a global id.
///
/// Plain numeric strings are accepted too. Anything after `?` is ignored.
///
/// ```rust
/// use shopify_fulfillment::conversions::parse_gid;
///
/// assert_eq!(parse_gid("gid://shopify/Product/632910392"), Some(632_910_392));
/// assert_eq!(parse_gid("gid://shopify/Location/1?inventory_item_id=2"), Some(1));
/// assert_eq!(parse_gid("632910392"), Some(632_910_392));
/// assert_eq!(parse_gid("gid://shopify/Product/"), None);
/// ```
#[must_use]
pub fn parse_gid(value: &str) -> Option<u64> {
    let value = value.split('?').next().unwrap_or(value);
    value.rsplit('/').next()?.trim().parse().ok()
}

/// Builds a global id: `to_gid("Order", 1)` is `gid://shopify/Order/1`.
#[must_use]
pub fn to_gid(kind: &str, id: u64) -> String {
    format!("gid://shopify/{kind}/{id}")
}

/// Flattens a connection into its nodes.
///
/// Accepts both `{edges: [{node}]}` and `{nodes: [...]}`; anything else
/// yields an empty list.
#[must_use]
pub fn edge_nodes(connection: &Value) -> Vec<&Value> {
    if let Some(edges) = connection.get("edges").and_then(Value::as_array) {
        return edges.iter().filter_map(|edge| edge.get("node")).collect();
    }
    connection
        .get("nodes")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().collect())
        .unwrap_or_default()
}

/// Maps the GraphQL `WeightUnit` enum to its short form.
///
/// ```rust
/// use shopify_fulfillment::conversions::weight_unit_from_graphql;
///
/// assert_eq!(weight_unit_from_graphql("KILOGRAMS"), "kg");
/// assert_eq!(weight_unit_from_graphql("STONES"), "stones");
/// ```
#[must_use]
pub fn weight_unit_from_graphql(unit: &str) -> String {
    match unit {
        "GRAMS" => "g".to_string(),
        "KILOGRAMS" => "kg".to_string(),
        "OUNCES" => "oz".to_string(),
        "POUNDS" => "lb".to_string(),
        other => other.to_lowercase(),
    }
}

/// Converts a GraphQL `Product` node.
///
/// # Errors
///
/// Returns [`ServiceError::MissingField`] when the product or one of its
/// variants has no usable id.
pub fn product_from_graphql(node: &Value) -> Result<Product, ServiceError> {
    let id = node_id(node).ok_or_else(|| missing("product.id"))?;

    let mut images = Vec::new();
    for image in node.get("images").map(edge_nodes).unwrap_or_default() {
        push_unique(&mut images, image_url(image));
    }
    for media in node.get("media").map(edge_nodes).unwrap_or_default() {
        push_unique(&mut images, media_image_url(media));
    }
    if images.is_empty() {
        push_unique(&mut images, node.get("featuredImage").and_then(image_url));
    }

    let variants = node
        .get("variants")
        .map(edge_nodes)
        .unwrap_or_default()
        .into_iter()
        .map(variant_from_graphql)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        id,
        title: string(node, "title").unwrap_or_default(),
        handle: string(node, "handle"),
        vendor: string(node, "vendor"),
        product_type: string(node, "productType"),
        status: string(node, "status"),
        description: string(node, "description"),
        tags: tags(node.get("tags")),
        images,
        variants,
    })
}

/// Converts a GraphQL `ProductVariant` node.
///
/// Weight comes from `inventoryItem.measurement.weight`, falling back to the
/// pre-2024 `weight`/`weightUnit` fields.
///
/// # Errors
///
/// Returns [`ServiceError::MissingField`] when the variant has no usable id.
pub fn variant_from_graphql(node: &Value) -> Result<Variant, ServiceError> {
    let id = node_id(node).ok_or_else(|| missing("variant.id"))?;
    let inventory_item = node.get("inventoryItem");

    let measured = inventory_item
        .and_then(|item| item.pointer("/measurement/weight"))
        .filter(|weight| !weight.is_null());
    let (weight, weight_unit) = measured.map_or_else(
        || {
            (
                node.get("weight").and_then(Value::as_f64),
                string(node, "weightUnit").map(|unit| weight_unit_from_graphql(&unit)),
            )
        },
        |weight| {
            (
                weight.get("value").and_then(Value::as_f64),
                string(weight, "unit").map(|unit| weight_unit_from_graphql(&unit)),
            )
        },
    );

    let image_url = node.get("image").and_then(image_url).or_else(|| {
        node.get("media")
            .map(edge_nodes)
            .unwrap_or_default()
            .into_iter()
            .find_map(media_image_url)
    });

    Ok(Variant {
        id,
        title: string(node, "title").unwrap_or_default(),
        sku: string(node, "sku").filter(|sku| !sku.is_empty()),
        barcode: string(node, "barcode").filter(|barcode| !barcode.is_empty()),
        price: node.get("price").and_then(money),
        inventory_item_id: inventory_item.and_then(node_id),
        inventory_quantity: node
            .get("inventoryQuantity")
            .and_then(Value::as_i64)
            .unwrap_or(0),
        weight,
        weight_unit,
        image_url,
    })
}

/// Converts a REST or webhook product payload.
///
/// Variant `image_id`s are resolved against the product's `images`.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the payload is not a product.
pub fn product_from_rest(payload: &Value) -> Result<Product, ServiceError> {
    let product: RestProduct = serde_json::from_value(payload.clone())
        .map_err(ServiceError::decode("product payload"))?;

    let mut images = Vec::new();
    for image in &product.images {
        push_unique(&mut images, Some(image.src.clone()).filter(|s| !s.is_empty()));
    }
    if images.is_empty() {
        push_unique(
            &mut images,
            product
                .image
                .as_ref()
                .map(|image| image.src.clone())
                .filter(|s| !s.is_empty()),
        );
    }

    let variants = product
        .variants
        .iter()
        .map(|variant| {
            let image_url = variant.image_id.and_then(|image_id| {
                product
                    .images
                    .iter()
                    .find(|image| image.id == image_id)
                    .map(|image| image.src.clone())
            });
            let (weight, weight_unit) = match (variant.weight, variant.grams) {
                (Some(weight), _) => (Some(weight), variant.weight_unit.clone()),
                #[allow(clippy::cast_precision_loss)]
                (None, Some(grams)) => (Some(grams as f64), Some("g".to_string())),
                (None, None) => (None, variant.weight_unit.clone()),
            };

            Variant {
                id: variant.id,
                title: variant.title.clone(),
                sku: variant.sku.clone().filter(|sku| !sku.is_empty()),
                barcode: variant.barcode.clone().filter(|b| !b.is_empty()),
                price: variant.price.clone(),
                inventory_item_id: variant.inventory_item_id,
                inventory_quantity: variant.inventory_quantity.unwrap_or(0),
                weight,
                weight_unit,
                image_url,
            }
        })
        .collect();

    Ok(Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        vendor: product.vendor,
        product_type: product.product_type.filter(|t| !t.is_empty()),
        status: product.status,
        description: product.body_html,
        tags: split_tags(&product.tags),
        images,
        variants,
    })
}

/// Converts a GraphQL `Order` node into [`OrderDetails`].
///
/// # Errors
///
/// Returns [`ServiceError::MissingField`] when the order has no usable id.
pub fn order_details_from_graphql(node: &Value) -> Result<OrderDetails, ServiceError> {
    let id = node_id(node).ok_or_else(|| missing("order.id"))?;
    let total = node.pointer("/totalPriceSet/shopMoney");

    let line_items = node
        .get("lineItems")
        .map(edge_nodes)
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            Ok(OrderDetailsLineItem {
                id: node_id(item).ok_or_else(|| missing("lineItem.id"))?,
                title: string(item, "title")
                    .or_else(|| string(item, "name"))
                    .unwrap_or_default(),
                sku: string(item, "sku").filter(|sku| !sku.is_empty()),
                quantity: item
                    .get("quantity")
                    .and_then(Value::as_u64)
                    .and_then(|q| u32::try_from(q).ok())
                    .unwrap_or(0),
                product_id: item.get("product").and_then(node_id),
                variant_id: item.get("variant").and_then(node_id),
                unit_price: item
                    .pointer("/originalUnitPriceSet/shopMoney/amount")
                    .and_then(money),
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    Ok(OrderDetails {
        id,
        name: string(node, "name").unwrap_or_default(),
        email: string(node, "email"),
        financial_status: string(node, "displayFinancialStatus"),
        fulfillment_status: string(node, "displayFulfillmentStatus"),
        created_at: string(node, "createdAt"),
        total_price: total.and_then(|m| m.get("amount")).and_then(money),
        currency: total
            .and_then(|m| string(m, "currencyCode"))
            .or_else(|| string(node, "currencyCode")),
        shipping_address: node
            .get("shippingAddress")
            .filter(|a| a.is_object())
            .map(address_from_graphql),
        line_items,
    })
}

/// Converts a GraphQL `FulfillmentOrder` node.
///
/// # Errors
///
/// Returns [`ServiceError::MissingField`] when the node has no id.
pub fn fulfillment_order_from_graphql(node: &Value) -> Result<FulfillmentOrder, ServiceError> {
    let id = string(node, "id").ok_or_else(|| missing("fulfillmentOrder.id"))?;
    let status = node
        .get("status")
        .cloned()
        .map(serde_json::from_value::<FulfillmentOrderStatus>)
        .transpose()
        .map_err(ServiceError::decode("fulfillment order status"))?
        .unwrap_or(FulfillmentOrderStatus::Unknown);
    let assigned = node.get("assignedLocation");

    Ok(FulfillmentOrder {
        id,
        status,
        assigned_location_id: assigned
            .and_then(|a| a.get("location"))
            .and_then(node_id),
        assigned_location_name: assigned.and_then(|a| string(a, "name")),
    })
}

/// Converts a GraphQL `Fulfillment` node into the REST-shaped [`Fulfillment`].
///
/// # Errors
///
/// Returns [`ServiceError::MissingField`] when the node has no usable id.
pub fn fulfillment_from_graphql(node: &Value) -> Result<Fulfillment, ServiceError> {
    let gid = string(node, "id").ok_or_else(|| missing("fulfillment.id"))?;
    let id = parse_gid(&gid).ok_or_else(|| missing("fulfillment.id"))?;

    let tracking: Vec<&Value> = node
        .get("trackingInfo")
        .and_then(Value::as_array)
        .map(|list| list.iter().collect())
        .unwrap_or_default();
    let first_tracking = tracking.first().copied();

    Ok(Fulfillment {
        id,
        admin_graphql_api_id: Some(gid),
        order_id: node.get("order").and_then(node_id),
        status: string(node, "status").map(|s| s.to_lowercase()),
        service: node.pointer("/service/serviceName").and_then(as_string),
        location_id: node.get("location").and_then(node_id),
        tracking_company: first_tracking.and_then(|t| string(t, "company")),
        tracking_number: first_tracking.and_then(|t| string(t, "number")),
        tracking_numbers: tracking
            .iter()
            .filter_map(|t| string(t, "number"))
            .collect(),
        tracking_url: first_tracking.and_then(|t| string(t, "url")),
        created_at: string(node, "createdAt").and_then(|s| s.parse::<DateTime<Utc>>().ok()),
    })
}

fn address_from_graphql(node: &Value) -> Address {
    Address {
        first_name: string(node, "firstName"),
        last_name: string(node, "lastName"),
        company: string(node, "company"),
        address1: string(node, "address1"),
        address2: string(node, "address2"),
        city: string(node, "city"),
        province: string(node, "province"),
        province_code: string(node, "provinceCode"),
        country: string(node, "country"),
        country_code: string(node, "countryCodeV2").or_else(|| string(node, "countryCode")),
        zip: string(node, "zip"),
        phone: string(node, "phone"),
    }
}

fn missing(field: &str) -> ServiceError {
    ServiceError::MissingField(field.to_string())
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

fn string(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(as_string)
}

/// Id of a node: a gid string, a numeric string or a JSON number.
fn node_id(node: &Value) -> Option<u64> {
    match node.get("id")? {
        Value::String(s) => parse_gid(s),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// `Money` scalars arrive as strings; `MoneyV2` as `{amount}`.
fn money(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => value.get("amount").and_then(money),
        _ => None,
    }
}

fn image_url(image: &Value) -> Option<String> {
    ["url", "src", "originalSrc"]
        .iter()
        .find_map(|key| string(image, key))
        .filter(|url| !url.is_empty())
}

fn media_image_url(media: &Value) -> Option<String> {
    media
        .get("image")
        .and_then(image_url)
        .or_else(|| media.pointer("/preview/image").and_then(image_url))
}

fn push_unique(urls: &mut Vec<String>, url: Option<String>) {
    if let Some(url) = url {
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
}

fn tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(list)) => list.iter().filter_map(as_string).collect(),
        Some(Value::String(s)) => split_tags(s),
        _ => Vec::new(),
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_gid_variants() {
        assert_eq!(parse_gid("gid://shopify/Order/450789469"), Some(450_789_469));
        assert_eq!(parse_gid("42"), Some(42));
        assert_eq!(parse_gid("gid://shopify/Order/abc"), None);
        assert_eq!(parse_gid(""), None);
        assert_eq!(to_gid("Order", 450_789_469), "gid://shopify/Order/450789469");
    }

    #[test]
    fn test_edge_nodes_accepts_edges_and_nodes() {
        let edges = json!({"edges": [{"node": {"id": 1}}, {"node": {"id": 2}}]});
        let nodes = json!({"nodes": [{"id": 3}]});

        assert_eq!(edge_nodes(&edges).len(), 2);
        assert_eq!(edge_nodes(&nodes)[0]["id"], 3);
        assert!(edge_nodes(&json!(null)).is_empty());
    }

    #[test]
    fn test_weight_units() {
        assert_eq!(weight_unit_from_graphql("GRAMS"), "g");
        assert_eq!(weight_unit_from_graphql("OUNCES"), "oz");
        assert_eq!(weight_unit_from_graphql("POUNDS"), "lb");
    }

    #[test]
    fn test_product_from_graphql() {
        let node = json!({
            "id": "gid://shopify/Product/632910392",
            "title": "IPod Nano - 8GB",
            "handle": "ipod-nano",
            "vendor": "Apple",
            "productType": "Cult Products",
            "status": "ACTIVE",
            "tags": ["Emotive", "Flash Memory"],
            "featuredImage": {"url": "https://cdn.shopify.com/featured.jpg"},
            "media": {"edges": [
                {"node": {"image": {"url": "https://cdn.shopify.com/a.jpg"}}},
                {"node": {"preview": {"image": {"url": "https://cdn.shopify.com/b.jpg"}}}}
            ]},
            "variants": {"edges": [
                {"node": {
                    "id": "gid://shopify/ProductVariant/808950810",
                    "title": "Pink",
                    "sku": "IPOD2008PINK",
                    "price": "199.00",
                    "inventoryQuantity": 10,
                    "image": {"url": "https://cdn.shopify.com/pink.jpg"},
                    "inventoryItem": {
                        "id": "gid://shopify/InventoryItem/808950810",
                        "measurement": {"weight": {"value": 1.25, "unit": "KILOGRAMS"}}
                    }
                }},
                {"node": {
                    "id": "gid://shopify/ProductVariant/49148385",
                    "title": "Red",
                    "sku": "",
                    "price": "199.00",
                    "weight": 8.0,
                    "weightUnit": "OUNCES"
                }}
            ]}
        });

        let product = product_from_graphql(&node).unwrap();

        assert_eq!(product.id, 632_910_392);
        assert_eq!(product.tags, vec!["Emotive", "Flash Memory"]);
        assert_eq!(
            product.images,
            vec![
                "https://cdn.shopify.com/a.jpg",
                "https://cdn.shopify.com/b.jpg"
            ]
        );

        let pink = &product.variants[0];
        assert_eq!(pink.id, 808_950_810);
        assert_eq!(pink.inventory_item_id, Some(808_950_810));
        assert_eq!(pink.weight, Some(1.25));
        assert_eq!(pink.weight_unit.as_deref(), Some("kg"));
        assert_eq!(pink.inventory_quantity, 10);
        assert_eq!(
            pink.image_url.as_deref(),
            Some("https://cdn.shopify.com/pink.jpg")
        );

        let red = &product.variants[1];
        assert_eq!(red.sku, None);
        assert_eq!(red.inventory_quantity, 0);
        assert_eq!(red.inventory_item_id, None);
        assert_eq!(red.weight_unit.as_deref(), Some("oz"));
    }

    #[test]
    fn test_product_from_graphql_falls_back_to_featured_image() {
        let node = json!({
            "id": "gid://shopify/Product/1",
            "title": "Plain",
            "featuredImage": {"url": "https://cdn.shopify.com/featured.jpg"}
        });

        let product = product_from_graphql(&node).unwrap();
        assert_eq!(product.images, vec!["https://cdn.shopify.com/featured.jpg"]);
        assert!(product.variants.is_empty());
    }

    #[test]
    fn test_product_from_graphql_requires_id() {
        let result = product_from_graphql(&json!({"title": "No id"}));
        assert!(matches!(result, Err(ServiceError::MissingField(f)) if f == "product.id"));
    }

    #[test]
    fn test_product_from_rest_resolves_variant_images() {
        let payload = json!({
            "id": 788_032_119_674_292_922_u64,
            "title": "Example T-Shirt",
            "body_html": "<p>Soft</p>",
            "tags": "example, mens , ",
            "images": [
                {"id": 1, "src": "https://cdn.shopify.com/front.jpg", "position": 1},
                {"id": 2, "src": "https://cdn.shopify.com/back.jpg", "position": 2}
            ],
            "variants": [
                {"id": 642_667_041_472_713_922_u64, "title": "Small", "sku": "shirt-s",
                 "inventory_item_id": 11, "inventory_quantity": 75, "image_id": 2,
                 "weight": 0.2, "weight_unit": "kg"},
                {"id": 757_650_484_644_203_962_u64, "title": "Medium", "grams": 250}
            ]
        });

        let product = product_from_rest(&payload).unwrap();

        assert_eq!(product.tags, vec!["example", "mens"]);
        assert_eq!(product.images.len(), 2);
        assert_eq!(
            product.variants[0].image_url.as_deref(),
            Some("https://cdn.shopify.com/back.jpg")
        );
        assert_eq!(product.variants[0].inventory_quantity, 75);
        assert_eq!(product.variants[1].weight, Some(250.0));
        assert_eq!(product.variants[1].weight_unit.as_deref(), Some("g"));
        assert_eq!(product.variants[1].image_url, None);
    }

    #[test]
    fn test_product_from_rest_rejects_non_product() {
        let result = product_from_rest(&json!({"title": "missing id"}));
        assert!(matches!(result, Err(ServiceError::Decode { .. })));
    }

    #[test]
    fn test_order_details_from_graphql() {
        let node = json!({
            "id": "gid://shopify/Order/450789469",
            "name": "#1001",
            "email": "bob.norman@mail.example.com",
            "displayFinancialStatus": "PAID",
            "displayFulfillmentStatus": "UNFULFILLED",
            "totalPriceSet": {"shopMoney": {"amount": "598.94", "currencyCode": "USD"}},
            "shippingAddress": {"city": "Ottawa", "zip": "K2P 1L4", "countryCodeV2": "CA"},
            "lineItems": {"edges": [{"node": {
                "id": "gid://shopify/LineItem/466157049",
                "title": "IPod Nano - 8gb",
                "sku": "IPOD2008GREEN",
                "quantity": 1,
                "variant": {"id": "gid://shopify/ProductVariant/39072856"},
                "product": {"id": "gid://shopify/Product/632910392"},
                "originalUnitPriceSet": {"shopMoney": {"amount": "199.00"}}
            }}]}
        });

        let details = order_details_from_graphql(&node).unwrap();

        assert_eq!(details.id, 450_789_469);
        assert_eq!(details.total_price.as_deref(), Some("598.94"));
        assert_eq!(details.currency.as_deref(), Some("USD"));
        assert_eq!(
            details.shipping_address.unwrap().country_code.as_deref(),
            Some("CA")
        );
        let item = &details.line_items[0];
        assert_eq!(item.variant_id, Some(39_072_856));
        assert_eq!(item.product_id, Some(632_910_392));
        assert_eq!(item.unit_price.as_deref(), Some("199.00"));
    }

    #[test]
    fn test_fulfillment_order_from_graphql() {
        let node = json!({
            "id": "gid://shopify/FulfillmentOrder/1046000790",
            "status": "OPEN",
            "assignedLocation": {
                "name": "Ottawa Store",
                "location": {"id": "gid://shopify/Location/24826418"}
            }
        });

        let order = fulfillment_order_from_graphql(&node).unwrap();
        assert_eq!(order.status, FulfillmentOrderStatus::Open);
        assert_eq!(order.assigned_location_id, Some(24_826_418));
        assert_eq!(order.assigned_location_name.as_deref(), Some("Ottawa Store"));
    }

    #[test]
    fn test_fulfillment_from_graphql() {
        let node = json!({
            "id": "gid://shopify/Fulfillment/255858046",
            "status": "SUCCESS",
            "createdAt": "2025-03-01T12:00:00Z",
            "trackingInfo": [{"company": "UPS", "number": "1Z1234", "url": "https://ups.example/1Z1234"}]
        });

        let fulfillment = fulfillment_from_graphql(&node).unwrap();
        assert_eq!(fulfillment.id, 255_858_046);
        assert_eq!(fulfillment.status.as_deref(), Some("success"));
        assert_eq!(fulfillment.tracking_company.as_deref(), Some("UPS"));
        assert_eq!(fulfillment.tracking_numbers, vec!["1Z1234"]);
        assert!(fulfillment.created_at.is_some());
    }
}
