//! Fulfillment-order and fulfillment-saga types.

use serde::{Deserialize, Serialize};

use crate::conversions::parse_gid;
use crate::types::Fulfillment;

/// Status of a fulfillment order, as the GraphQL enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentOrderStatus {
    Open,
    InProgress,
    Scheduled,
    OnHold,
    Incomplete,
    Closed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FulfillmentOrderStatus {
    /// Closed and cancelled orders can no longer be moved or fulfilled.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }
}

/// A fulfillment order: the unit Shopify assigns to one location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentOrder {
    /// `gid://shopify/FulfillmentOrder/...`.
    pub id: String,
    pub status: FulfillmentOrderStatus,
    pub assigned_location_id: Option<u64>,
    pub assigned_location_name: Option<String>,
}

impl FulfillmentOrder {
    /// Numeric tail of [`id`](Self::id).
    #[must_use]
    pub fn numeric_id(&self) -> Option<u64> {
        parse_gid(&self.id)
    }

    /// See [`FulfillmentOrderStatus::is_closed`].
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.status.is_closed()
    }
}

/// Carrier tracking details attached to a new fulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub company: Option<String>,
    pub number: Option<String>,
    pub url: Option<String>,
}

impl TrackingInfo {
    /// `true` when no tracking field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.company.is_none() && self.number.is_none() && self.url.is_none()
    }
}

/// Where the goods ship from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTarget {
    /// A known location id.
    Id(u64),
    /// Resolve to the first active location with this zip.
    Zip(String),
}

/// Input to [`FulfillmentService::create_fulfillment`].
///
/// [`FulfillmentService::create_fulfillment`]: crate::services::FulfillmentService::create_fulfillment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentRequest {
    /// The Shopify order id.
    pub order_id: u64,
    /// Warehouse location; `None` leaves every fulfillment order where it is.
    pub location: Option<LocationTarget>,
    #[serde(default)]
    pub tracking: TrackingInfo,
    #[serde(default)]
    pub notify_customer: bool,
}

/// One fulfillment created by the saga.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfilledOrder {
    pub fulfillment_order_id: String,
    /// The location recorded for this fulfillment order after any move.
    pub location_id: Option<u64>,
    pub fulfillment: Fulfillment,
}

/// A move attempted by the saga.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMove {
    pub fulfillment_order_id: String,
    pub from_location_id: Option<u64>,
    pub to_location_id: u64,
    pub moved: bool,
    /// Why the move failed, when it did.
    pub error: Option<String>,
}

/// Result of [`FulfillmentService::create_fulfillment`].
///
/// [`FulfillmentService::create_fulfillment`]: crate::services::FulfillmentService::create_fulfillment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentOutcome {
    pub fulfillments: Vec<FulfilledOrder>,
    pub moves: Vec<LocationMove>,
}

impl FulfillmentOutcome {
    /// `true` when nothing was eligible for fulfillment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fulfillments.is_empty()
    }
}

/// Who fulfilled an order, ignoring cancelled fulfillments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentDetails {
    pub fulfilled: bool,
    /// Service name, else tracking company, of the first active fulfillment.
    pub fulfilled_by: Option<String>,
    /// `true` when `fulfilled_by` is the configured fulfillment service.
    pub fulfilled_by_app: bool,
    pub fulfillments: Vec<Fulfillment>,
}

/// Result of `fulfillmentCancel`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledFulfillment {
    /// `gid://shopify/Fulfillment/...`.
    pub id: String,
    pub fulfillment_id: Option<u64>,
    pub status: String,
}
