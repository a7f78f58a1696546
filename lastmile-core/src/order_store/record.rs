//! Order records as held by the order-management platform.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Location, OrderId, RequestValidationError, Stop, TimeWindow, minutes};

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting assignment to a driver.
    Pending,
    /// Assigned to a driver's route.
    Assigned,
    /// Out for delivery.
    InProgress,
    /// Delivery confirmed.
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
        })
    }
}

/// One order as returned by an [`OrderStore`](crate::OrderStore).
///
/// Fields the engine does not use are ignored on deserialisation.
///
/// # Examples
/// ```
/// use lastmile_core::{OrderId, OrderRecord, OrderStatus};
///
/// let record: OrderRecord = serde_json::from_str(r#"{
///     "id": 7,
///     "status": "pending",
///     "customer_name": "Ada",
///     "delivery_address": "1 Main St",
///     "delivery_location": {"lat": 40.71, "lng": -74.0},
///     "total": 12.5
/// }"#)?;
/// assert_eq!(record.id, OrderId(7));
/// assert_eq!(record.status, OrderStatus::Pending);
/// assert_eq!(record.to_stop().map(|stop| stop.order_id), Ok(OrderId(7)));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order identifier.
    pub id: OrderId,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Free-text delivery address.
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// Geocoded delivery address.
    #[serde(default)]
    pub delivery_location: Option<Location>,
    /// Load the order occupies; defaults to one unit.
    #[serde(default)]
    pub demand: Option<f64>,
    /// Expected time at the door.
    #[serde(default, with = "minutes::optional", rename = "service_minutes")]
    pub service_time: Option<Duration>,
    /// Promised delivery window.
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
}

impl OrderRecord {
    /// A pending order at `location` with default demand and no window.
    #[must_use]
    pub const fn pending(id: OrderId, location: Location) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            customer_name: None,
            delivery_address: None,
            delivery_location: Some(location),
            demand: None,
            service_time: None,
            time_window: None,
        }
    }

    /// Convert a routable order into a [`Stop`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::OrderNotPending`] for orders that are
    /// not awaiting assignment and [`RequestValidationError::MissingLocation`]
    /// for orders without a geocoded address.
    pub fn to_stop(&self) -> Result<Stop, RequestValidationError> {
        if self.status != OrderStatus::Pending {
            return Err(RequestValidationError::OrderNotPending {
                order_id: self.id,
                status: self.status,
            });
        }
        let location = self
            .delivery_location
            .ok_or(RequestValidationError::MissingLocation(self.id))?;
        let mut stop = Stop::new(self.id, location);
        if let Some(demand) = self.demand {
            stop = stop.with_demand(demand);
        }
        if let Some(service_time) = self.service_time {
            stop = stop.with_service_time(service_time);
        }
        if let Some(window) = self.time_window {
            stop = stop.with_time_window(window);
        }
        Ok(stop)
    }
}
