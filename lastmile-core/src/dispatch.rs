//! Wire contract between the dispatcher and the order-management platform.
//!
//! Shapes here use camelCase JSON, durations in minutes and distances in
//! metres, matching what the platform's clients send and expect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::minutes::{from_minutes, to_minutes};
use crate::{
    Constraints, Depot, DriverId, ErrorKind, Location, OptimizationError, OptimizationRequest,
    OrderId, OrderStoreError, RequestValidationError, Route, Stop,
};

/// Optional constraints as sent by platform clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchConstraints {
    /// Vehicle load limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_capacity: Option<f64>,
    /// Upper bound on route duration, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_route_duration_minutes: Option<f64>,
    /// Assumed average speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_speed_kmh: Option<f64>,
    /// Whether the driver returns to the start location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to_depot: Option<bool>,
}

impl DispatchConstraints {
    /// Fill defaults and convert units.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::InvalidMaxDuration`] for negative or
    /// non-finite durations. Other values are checked when the request is
    /// built.
    pub fn to_constraints(&self) -> Result<Constraints, RequestValidationError> {
        let mut constraints = Constraints::default();
        if let Some(capacity) = self.vehicle_capacity {
            constraints = constraints.with_vehicle_capacity(capacity);
        }
        if let Some(minutes) = self.max_route_duration_minutes {
            let limit = from_minutes(minutes).ok_or(RequestValidationError::InvalidMaxDuration)?;
            constraints = constraints.with_max_route_duration(limit);
        }
        if let Some(speed) = self.average_speed_kmh {
            constraints = constraints.with_average_speed_kmh(speed);
        }
        if let Some(round_trip) = self.return_to_depot {
            constraints = constraints.with_return_to_depot(round_trip);
        }
        Ok(constraints)
    }
}

/// A request to plan one driver's route over a batch of orders.
///
/// # Examples
/// ```
/// use lastmile_core::{DispatchRequest, DriverId, OrderId};
///
/// let request: DispatchRequest = serde_json::from_str(r#"{
///     "orderIds": [1, 2],
///     "driverId": 2,
///     "startLocation": {"lat": 40.7128, "lng": -74.0060}
/// }"#)?;
/// assert_eq!(request.order_ids, vec![OrderId(1), OrderId(2)]);
/// assert_eq!(request.driver_id, DriverId(2));
/// assert!(request.constraints.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Orders to route.
    pub order_ids: Vec<OrderId>,
    /// Driver to assign.
    pub driver_id: DriverId,
    /// Where the driver departs from.
    pub start_location: Location,
    /// Optional limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<DispatchConstraints>,
}

impl DispatchRequest {
    /// Build the optimisation request for already-resolved `stops`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError`] when the constraints or stops are
    /// invalid.
    pub fn to_request(&self, stops: Vec<Stop>) -> Result<OptimizationRequest, RequestValidationError> {
        let constraints = match &self.constraints {
            Some(raw) => raw.to_constraints()?,
            None => Constraints::default(),
        };
        OptimizationRequest::new(
            self.driver_id,
            Depot::new(self.start_location),
            stops,
            constraints,
        )
    }
}

/// One stop of a planned route on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStop {
    /// Order delivered.
    pub order_id: OrderId,
    /// Minutes after departure the driver is expected to arrive.
    pub estimated_arrival_minutes: f64,
    /// Minutes spent waiting for the window to open.
    pub wait_minutes: f64,
    /// Metres travelled from the start up to this stop.
    pub cumulative_distance_meters: f64,
}

/// A planned route on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    /// Assigned driver.
    pub driver_id: DriverId,
    /// Stops in visiting order.
    pub stops: Vec<PlannedStop>,
    /// Total distance in metres.
    pub total_distance_meters: f64,
    /// Total duration in minutes.
    pub total_duration_minutes: f64,
    /// Whether local improvement stopped early.
    pub truncated: bool,
}

impl From<&Route> for RoutePlan {
    fn from(route: &Route) -> Self {
        Self {
            driver_id: route.driver_id,
            stops: route
                .stops
                .iter()
                .map(|planned| PlannedStop {
                    order_id: planned.order_id(),
                    estimated_arrival_minutes: to_minutes(planned.arrival),
                    wait_minutes: to_minutes(planned.wait),
                    cumulative_distance_meters: planned.cumulative_distance_m,
                })
                .collect(),
            total_distance_meters: route.total_distance_m,
            total_duration_minutes: to_minutes(route.total_duration),
            truncated: route.truncated,
        }
    }
}

/// Errors from planning a dispatch request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Validation, feasibility or time-budget failure.
    #[error(transparent)]
    Optimization(#[from] OptimizationError),
    /// The order store could not be queried.
    #[error("order store unavailable: {0}")]
    Store(#[from] OrderStoreError),
}

impl From<RequestValidationError> for DispatchError {
    fn from(err: RequestValidationError) -> Self {
        Self::Optimization(OptimizationError::InvalidRequest(err))
    }
}

impl DispatchError {
    /// Coarse classification for the error body.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Optimization(err) => err.kind(),
            Self::Store(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}

/// Tagged error returned across the service boundary.
///
/// # Examples
/// ```
/// use lastmile_core::{DispatchError, ErrorBody, RequestValidationError};
///
/// let err = DispatchError::from(RequestValidationError::EmptyStops);
/// let body = ErrorBody::from(&err);
/// assert_eq!(body.kind.http_status(), 400);
/// assert_eq!(
///     serde_json::to_value(&body)?,
///     serde_json::json!({
///         "kind": "invalid_request",
///         "message": "invalid request: at least one stop is required",
///     }),
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<&DispatchError> for ErrorBody {
    fn from(err: &DispatchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
