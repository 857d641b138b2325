//! Fulfillment orders and the fulfillment saga.

use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::conversions::{
    edge_nodes, fulfillment_from_graphql, fulfillment_order_from_graphql, to_gid,
};
use crate::services::errors::check_user_errors;
use crate::services::{queries, ServiceError, ShopifyService};
use crate::types::{
    FulfilledOrder, Fulfillment, FulfillmentOrder, FulfillmentOutcome, FulfillmentRequest,
    LocationMove, LocationTarget, TrackingInfo,
};

/// Fulfillment operations for the shop behind a [`ShopifyService`].
#[derive(Debug, Clone, Copy)]
pub struct FulfillmentService<'a> {
    shopify: &'a ShopifyService,
}

impl<'a> FulfillmentService<'a> {
    #[must_use]
    pub const fn new(shopify: &'a ShopifyService) -> Self {
        Self { shopify }
    }

    /// Lists the fulfillment orders of an order.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the query fails or a node cannot be
    /// converted.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn get_fulfillment_orders(
        &self,
        order_id: u64,
    ) -> Result<Vec<FulfillmentOrder>, ServiceError> {
        let data = self
            .shopify
            .graphql(
                queries::ORDER_FULFILLMENT_ORDERS,
                json!({ "id": to_gid("Order", order_id) }),
            )
            .await?;

        let order = data
            .get("order")
            .filter(|order| !order.is_null())
            .ok_or(ServiceError::NotFound {
                resource: "order",
                id: order_id,
            })?;

        order
            .get("fulfillmentOrders")
            .map(edge_nodes)
            .unwrap_or_default()
            .into_iter()
            .map(fulfillment_order_from_graphql)
            .collect()
    }

    /// Turns a [`LocationTarget`] into a location id.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if locations cannot be listed for a zip
    /// lookup.
    pub async fn resolve_location(
        &self,
        target: &LocationTarget,
    ) -> Result<Option<u64>, ServiceError> {
        match target {
            LocationTarget::Id(id) => Ok(Some(*id)),
            LocationTarget::Zip(zip) => self.shopify.find_location_id_by_zip(zip).await,
        }
    }

    /// Moves a fulfillment order to another location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UserErrors`] when Shopify refuses the move.
    #[instrument(skip(self), fields(shop = %self.shopify.shop_name()))]
    pub async fn move_fulfillment_order(
        &self,
        fulfillment_order_id: &str,
        location_id: u64,
    ) -> Result<FulfillmentOrder, ServiceError> {
        let data = self
            .shopify
            .graphql(
                queries::FULFILLMENT_ORDER_MOVE,
                json!({
                    "id": fulfillment_order_id,
                    "newLocationId": to_gid("Location", location_id),
                }),
            )
            .await?;
        let payload = &data["fulfillmentOrderMove"];
        check_user_errors(payload, "fulfillmentOrderMove")?;

        let moved = payload
            .get("movedFulfillmentOrder")
            .filter(|moved| moved.is_object())
            .ok_or_else(|| {
                ServiceError::MissingField("fulfillmentOrderMove.movedFulfillmentOrder".into())
            })?;
        fulfillment_order_from_graphql(moved)
    }

    /// Creates a fulfillment for every line of one fulfillment order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UserErrors`] when Shopify refuses the
    /// fulfillment.
    #[instrument(skip(self, tracking), fields(shop = %self.shopify.shop_name()))]
    pub async fn create_fulfillment_for(
        &self,
        fulfillment_order_id: &str,
        tracking: &TrackingInfo,
        notify_customer: bool,
    ) -> Result<Fulfillment, ServiceError> {
        let mut input = Map::new();
        input.insert(
            "lineItemsByFulfillmentOrder".into(),
            json!([{ "fulfillmentOrderId": fulfillment_order_id }]),
        );
        input.insert("notifyCustomer".into(), json!(notify_customer));
        if !tracking.is_empty() {
            input.insert("trackingInfo".into(), tracking_input(tracking));
        }

        let data = self
            .shopify
            .graphql(
                queries::FULFILLMENT_CREATE,
                json!({ "fulfillment": Value::Object(input) }),
            )
            .await?;
        let payload = &data["fulfillmentCreate"];
        check_user_errors(payload, "fulfillmentCreate")?;

        let fulfillment = payload
            .get("fulfillment")
            .filter(|fulfillment| fulfillment.is_object())
            .ok_or_else(|| ServiceError::MissingField("fulfillmentCreate.fulfillment".into()))?;
        fulfillment_from_graphql(fulfillment)
    }

    /// Fulfills every open fulfillment order of `request.order_id`.
    ///
    /// When `request.location` resolves to a location, fulfillment orders
    /// assigned elsewhere are moved there first. A failed move is logged and
    /// recorded in [`FulfillmentOutcome::moves`]; the order is then fulfilled
    /// from its original location. Closed and cancelled fulfillment orders
    /// are skipped.
    ///
    /// Fulfillments are created one at a time. The first creation failure is
    /// returned; fulfillments created before it stay in place.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the fulfillment orders cannot be read,
    /// the location cannot be resolved, or a fulfillment cannot be created.
    #[instrument(skip(self, request), fields(shop = %self.shopify.shop_name(), order_id = request.order_id))]
    pub async fn create_fulfillment(
        &self,
        request: &FulfillmentRequest,
    ) -> Result<FulfillmentOutcome, ServiceError> {
        let fulfillment_orders = self.get_fulfillment_orders(request.order_id).await?;

        let target_location = match &request.location {
            Some(target) => {
                let resolved = self.resolve_location(target).await?;
                if resolved.is_none() {
                    tracing::warn!(?target, "No matching location; fulfilling from assigned locations");
                }
                resolved
            }
            None => None,
        };

        let mut outcome = FulfillmentOutcome::default();
        let mut ready = Vec::new();

        for fulfillment_order in fulfillment_orders {
            if fulfillment_order.is_closed() {
                tracing::debug!(
                    fulfillment_order_id = %fulfillment_order.id,
                    status = ?fulfillment_order.status,
                    "Skipping closed fulfillment order"
                );
                continue;
            }

            let Some(location_id) = target_location
                .filter(|target| fulfillment_order.assigned_location_id != Some(*target))
            else {
                ready.push(fulfillment_order);
                continue;
            };

            let from_location_id = fulfillment_order.assigned_location_id;
            match self
                .move_fulfillment_order(&fulfillment_order.id, location_id)
                .await
            {
                Ok(moved) => {
                    tracing::info!(
                        fulfillment_order_id = %fulfillment_order.id,
                        ?from_location_id,
                        to_location_id = location_id,
                        "Moved fulfillment order"
                    );
                    outcome.moves.push(LocationMove {
                        fulfillment_order_id: fulfillment_order.id.clone(),
                        from_location_id,
                        to_location_id: location_id,
                        moved: true,
                        error: None,
                    });
                    ready.push(FulfillmentOrder {
                        assigned_location_id: moved.assigned_location_id.or(Some(location_id)),
                        ..moved
                    });
                }
                Err(e) => {
                    tracing::error!(
                        fulfillment_order_id = %fulfillment_order.id,
                        to_location_id = location_id,
                        error = %e,
                        "Could not move fulfillment order; keeping original location"
                    );
                    outcome.moves.push(LocationMove {
                        fulfillment_order_id: fulfillment_order.id.clone(),
                        from_location_id,
                        to_location_id: location_id,
                        moved: false,
                        error: Some(e.to_string()),
                    });
                    ready.push(fulfillment_order);
                }
            }
        }

        for fulfillment_order in ready {
            let mut fulfillment = self
                .create_fulfillment_for(
                    &fulfillment_order.id,
                    &request.tracking,
                    request.notify_customer,
                )
                .await
                .map_err(|e| {
                    tracing::error!(
                        fulfillment_order_id = %fulfillment_order.id,
                        created = outcome.fulfillments.len(),
                        error = %e,
                        "Fulfillment creation failed"
                    );
                    e
                })?;

            fulfillment.order_id.get_or_insert(request.order_id);
            if fulfillment.location_id.is_none() {
                fulfillment.location_id = fulfillment_order.assigned_location_id;
            }

            outcome.fulfillments.push(FulfilledOrder {
                fulfillment_order_id: fulfillment_order.id,
                location_id: fulfillment_order.assigned_location_id,
                fulfillment,
            });
        }

        if outcome.is_empty() {
            tracing::info!("No open fulfillment orders to fulfill");
        }
        Ok(outcome)
    }
}

fn tracking_input(tracking: &TrackingInfo) -> Value {
    let mut info = Map::new();
    if let Some(company) = &tracking.company {
        info.insert("company".into(), json!(company));
    }
    if let Some(number) = &tracking.number {
        info.insert("number".into(), json!(number));
    }
    if let Some(url) = &tracking.url {
        info.insert("url".into(), json!(url));
    }
    Value::Object(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_input_omits_unset_fields() {
        let tracking = TrackingInfo {
            company: Some("UPS".to_string()),
            number: Some("1Z999".to_string()),
            url: None,
        };
        assert_eq!(
            tracking_input(&tracking),
            json!({"company": "UPS", "number": "1Z999"})
        );
    }
}
