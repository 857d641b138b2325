//! Per-shop Admin API access: REST reads and order-level mutations.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;

use crate::clients::{GraphqlClient, RestClient};
use crate::config::{ShopDomain, ShopType, ShopifyConfig};
use crate::conversions::{parse_gid, to_gid};
use crate::credentials::{CredentialCache, CredentialsProvider, ShopCredentials};
use crate::services::errors::{check_user_errors, format_graphql_errors};
use crate::services::{queries, ServiceError};
use crate::types::{
    CancelledFulfillment, Fulfillment, FulfillmentDetails, InventoryItem, Location, Order,
    RestProduct, Transaction,
};

/// Admin API access for one shop.
///
/// Holds a [`RestClient`] and a [`GraphqlClient`] built from the same
/// credentials. The other services borrow a `ShopifyService`.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_fulfillment::services::ShopifyService;
///
/// let shopify = ShopifyService::for_user(&cache, &config, "user-42", &ShopType::default()).await?;
/// let details = shopify.get_fulfillment_details(450_789_469).await?;
/// if details.fulfilled_by_app {
///     println!("already shipped by us");
/// }
/// ```
#[derive(Debug)]
pub struct ShopifyService {
    shop_name: ShopDomain,
    rest: RestClient,
    graphql: GraphqlClient,
    config: ShopifyConfig,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyService>();
};

impl ShopifyService {
    /// Creates a service for the shop in `credentials`.
    #[must_use]
    pub fn new(credentials: &ShopCredentials, config: &ShopifyConfig) -> Self {
        Self {
            shop_name: credentials.shop_name.clone(),
            rest: RestClient::new(credentials, Some(config)),
            graphql: GraphqlClient::new(credentials, Some(config)),
            config: config.clone(),
        }
    }

    /// Resolves `user_id`'s credentials through `cache`, then creates a service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Credentials`] if the credentials cannot be
    /// resolved.
    pub async fn for_user<P: CredentialsProvider>(
        cache: &CredentialCache<P>,
        config: &ShopifyConfig,
        user_id: &str,
        shop_type: &ShopType,
    ) -> Result<Self, ServiceError> {
        let credentials = cache.get(user_id, shop_type).await?;
        Ok(Self::new(&credentials, config))
    }

    /// The shop this service talks to.
    #[must_use]
    pub const fn shop_name(&self) -> &ShopDomain {
        &self.shop_name
    }

    /// The configuration this service was built with.
    #[must_use]
    pub const fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    /// Runs a GraphQL document and returns its `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Graphql`] for transport failures and
    /// [`ServiceError::Query`] when the response carries top-level `errors`.
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, ServiceError> {
        let mut response = self
            .graphql
            .query(query, Some(variables), None, None)
            .await
            .map_err(|e| {
                tracing::error!(shop = %self.shop_name, error = %e, "GraphQL request failed");
                ServiceError::from(e)
            })?;

        if let Some(errors) = response
            .body
            .get("errors")
            .filter(|errors| errors.as_array().map_or(true, |list| !list.is_empty()))
        {
            let message = format_graphql_errors(errors);
            tracing::error!(shop = %self.shop_name, errors = %message, "GraphQL query returned errors");
            return Err(ServiceError::Query(message));
        }

        match response.body.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => {
                tracing::error!(shop = %self.shop_name, "GraphQL response has no data");
                Err(ServiceError::MissingField("data".to_string()))
            }
        }
    }

    /// Fetches an order over REST.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the response has no `order`.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_order(&self, order_id: u64) -> Result<Order, ServiceError> {
        let body = self.rest_get(&format!("orders/{order_id}")).await?;
        self.extract(body, "order", "order")?
            .ok_or_else(|| not_found("order", order_id))
    }

    /// Lists the shop's locations.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request or decoding fails.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_locations(&self) -> Result<Vec<Location>, ServiceError> {
        let body = self.rest_get("locations").await?;
        Ok(self
            .extract(body, "locations", "locations")?
            .unwrap_or_default())
    }

    /// Finds the first active location whose zip matches, ignoring case and
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the locations cannot be listed.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn find_location_id_by_zip(&self, zip: &str) -> Result<Option<u64>, ServiceError> {
        let location = self
            .get_locations()
            .await?
            .into_iter()
            .find(|location| location.active && location.zip_matches(zip));

        if location.is_none() {
            tracing::debug!("No active location matches zip");
        }
        Ok(location.map(|location| location.id))
    }

    /// Fetches a product over REST.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the response has no `product`.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_product(&self, product_id: u64) -> Result<RestProduct, ServiceError> {
        let body = self.rest_get(&format!("products/{product_id}")).await?;
        self.extract(body, "product", "product")?
            .ok_or_else(|| not_found("product", product_id))
    }

    /// Fetches an inventory item over REST.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the response has no
    /// `inventory_item`.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_inventory_item(
        &self,
        inventory_item_id: u64,
    ) -> Result<InventoryItem, ServiceError> {
        let body = self
            .rest_get(&format!("inventory_items/{inventory_item_id}"))
            .await?;
        self.extract(body, "inventory_item", "inventory item")?
            .ok_or_else(|| not_found("inventory item", inventory_item_id))
    }

    /// Lists an order's payment transactions.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request or decoding fails.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_transactions(&self, order_id: u64) -> Result<Vec<Transaction>, ServiceError> {
        let body = self
            .rest_get(&format!("orders/{order_id}/transactions"))
            .await?;
        Ok(self
            .extract(body, "transactions", "transactions")?
            .unwrap_or_default())
    }

    /// Lists an order's fulfillments, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request or decoding fails.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_fulfillments(&self, order_id: u64) -> Result<Vec<Fulfillment>, ServiceError> {
        let body = self
            .rest_get(&format!("orders/{order_id}/fulfillments"))
            .await?;
        Ok(self
            .extract(body, "fulfillments", "fulfillments")?
            .unwrap_or_default())
    }

    /// Reports whether an order is fulfilled and by whom.
    ///
    /// Cancelled, errored and failed fulfillments are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the fulfillments cannot be listed.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn get_fulfillment_details(
        &self,
        order_id: u64,
    ) -> Result<FulfillmentDetails, ServiceError> {
        let fulfillments: Vec<Fulfillment> = self
            .get_fulfillments(order_id)
            .await?
            .into_iter()
            .filter(|fulfillment| !fulfillment.is_cancelled())
            .collect();

        let fulfilled_by = fulfillments.first().and_then(|fulfillment| {
            fulfillment
                .service
                .clone()
                .filter(|service| !service.is_empty())
                .or_else(|| fulfillment.tracking_company.clone())
        });
        let fulfilled_by_app = fulfilled_by.as_deref().is_some_and(|name| {
            name.eq_ignore_ascii_case(self.config.fulfillment_service_name())
        });

        Ok(FulfillmentDetails {
            fulfilled: !fulfillments.is_empty(),
            fulfilled_by,
            fulfilled_by_app,
            fulfillments,
        })
    }

    /// Cancels a fulfillment through `fulfillmentCancel`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UserErrors`] when Shopify rejects the
    /// cancellation, or another [`ServiceError`] if the call fails.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn cancel_fulfillment(
        &self,
        fulfillment_id: u64,
    ) -> Result<CancelledFulfillment, ServiceError> {
        let data = self
            .graphql(
                queries::FULFILLMENT_CANCEL,
                json!({ "id": to_gid("Fulfillment", fulfillment_id) }),
            )
            .await?;
        let payload = &data["fulfillmentCancel"];

        check_user_errors(payload, "fulfillmentCancel").map_err(|e| {
            tracing::error!(error = %e, "Fulfillment cancellation rejected");
            e
        })?;

        let fulfillment = payload
            .get("fulfillment")
            .filter(|f| f.is_object())
            .ok_or_else(|| ServiceError::MissingField("fulfillmentCancel.fulfillment".into()))?;
        let id = fulfillment["id"].as_str().unwrap_or_default().to_string();

        Ok(CancelledFulfillment {
            fulfillment_id: parse_gid(&id),
            id,
            status: fulfillment["status"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase(),
        })
    }

    /// Cancels an order over REST, best effort.
    ///
    /// Returns the cancelled order JSON, or `None` after logging a warning.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn cancel_order(
        &self,
        order_id: u64,
        reason: Option<&str>,
        notify_customer: bool,
    ) -> Option<Value> {
        let mut body = json!({ "email": notify_customer });
        if let Some(reason) = reason {
            body["reason"] = json!(reason);
        }

        match self
            .rest
            .post(&format!("orders/{order_id}/cancel"), body, None)
            .await
        {
            Ok(mut response) => Some(
                response
                    .body
                    .get_mut("order")
                    .map(Value::take)
                    .unwrap_or(response.body),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Order cancellation failed; continuing");
                None
            }
        }
    }

    /// Marks an order as paid through `orderMarkAsPaid`, best effort.
    ///
    /// Returns the updated order JSON, or `None` after logging a warning.
    #[instrument(skip(self), fields(shop = %self.shop_name))]
    pub async fn mark_order_as_paid(&self, order_id: u64) -> Option<Value> {
        let data = match self
            .graphql(
                queries::ORDER_MARK_AS_PAID,
                json!({ "input": { "id": to_gid("Order", order_id) } }),
            )
            .await
        {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Marking order as paid failed; continuing");
                return None;
            }
        };

        let payload = &data["orderMarkAsPaid"];
        if let Err(e) = check_user_errors(payload, "orderMarkAsPaid") {
            tracing::warn!(error = %e, "Marking order as paid rejected; continuing");
            return None;
        }

        payload.get("order").filter(|order| order.is_object()).cloned()
    }

    async fn rest_get(&self, path: &str) -> Result<Value, ServiceError> {
        self.rest
            .get(path, None)
            .await
            .map(|response| response.body)
            .map_err(|e| {
                tracing::error!(path, error = %e, "REST request failed");
                ServiceError::from(e)
            })
    }

    /// Decodes `body[key]`; a missing or null key yields `None`.
    fn extract<T: DeserializeOwned>(
        &self,
        mut body: Value,
        key: &str,
        context: &'static str,
    ) -> Result<Option<T>, ServiceError> {
        let Some(value) = body.get_mut(key).map(Value::take).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        serde_json::from_value(value).map(Some).map_err(|e| {
            tracing::error!(shop = %self.shop_name, context, error = %e, "Could not decode Shopify response");
            ServiceError::decode(context)(e)
        })
    }
}

fn not_found(resource: &'static str, id: u64) -> ServiceError {
    tracing::error!(resource, id, "Shopify resource not found");
    ServiceError::NotFound { resource, id }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_service() -> ShopifyService {
        let credentials = ShopCredentials::new("acme", "key", "password").unwrap();
        ShopifyService::new(&credentials, &ShopifyConfig::builder().build().unwrap())
    }

    #[test]
    fn test_new_keeps_shop_and_config() {
        let service = create_service();
        assert_eq!(service.shop_name().as_ref(), "acme.myshopify.com");
        assert_eq!(service.config().fulfillment_service_name(), "wherehouse");
    }

    #[test]
    fn test_extract_missing_key_is_none() {
        let service = create_service();
        let order: Option<Order> = service
            .extract(json!({"errors": "Not Found"}), "order", "order")
            .unwrap();
        assert!(order.is_none());
    }

    #[test]
    fn test_extract_reports_decode_errors() {
        let service = create_service();
        let result: Result<Option<Order>, _> =
            service.extract(json!({"order": {"id": "abc"}}), "order", "order");
        assert!(matches!(
            result,
            Err(ServiceError::Decode { context: "order", .. })
        ));
    }
}
