//! Optimization requests and their validation.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Depot, DriverId, Location, LocationError, OrderId, OrderStatus, Stop, minutes};

/// Average vehicle speed assumed when a request does not supply one.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;

/// Why a request (or the orders behind it) cannot be optimised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestValidationError {
    /// No stops were supplied.
    #[error("at least one stop is required")]
    EmptyStops,
    /// Two stops share an order identifier.
    #[error("order {0} appears more than once")]
    DuplicateOrder(OrderId),
    /// A coordinate is out of range.
    #[error(transparent)]
    InvalidLocation(#[from] LocationError),
    /// A stop's demand is negative or not finite.
    #[error("order {order_id} has invalid demand {demand}")]
    InvalidDemand {
        /// Offending order.
        order_id: OrderId,
        /// Supplied demand.
        demand: f64,
    },
    /// A stop's time window opens after it closes.
    #[error("order {0} has a time window that opens after it closes")]
    InvalidTimeWindow(OrderId),
    /// Vehicle capacity is not a positive finite number.
    #[error("vehicle capacity must be positive, got {0}")]
    InvalidCapacity(f64),
    /// Average speed is not a positive finite number.
    #[error("average speed must be positive, got {0} km/h")]
    InvalidSpeed(f64),
    /// Maximum route duration is zero.
    #[error("maximum route duration must be positive")]
    InvalidMaxDuration,
    /// An order identifier does not resolve to a known order.
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),
    /// An order has not been geocoded.
    #[error("order {0} has no geocoded delivery location")]
    MissingLocation(OrderId),
    /// An order is not awaiting assignment.
    #[error("order {order_id} is {status}, only pending orders can be routed")]
    OrderNotPending {
        /// Offending order.
        order_id: OrderId,
        /// Its current status.
        status: OrderStatus,
    },
    /// The requested driver cannot take the route.
    #[error("driver {0} is not available")]
    DriverUnavailable(DriverId),
    /// A visiting order names a stop index the request does not have.
    #[error("route references stop index {0} outside the request")]
    StopOutOfRange(usize),
}

/// Optional limits applied while building a route.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lastmile_core::Constraints;
///
/// let constraints = Constraints::default()
///     .with_vehicle_capacity(20.0)
///     .with_max_route_duration(Duration::from_secs(4 * 3600));
/// assert_eq!(constraints.vehicle_capacity, Some(20.0));
/// assert!(!constraints.return_to_depot);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Vehicle load limit; unlimited when absent.
    #[serde(default)]
    pub vehicle_capacity: Option<f64>,
    /// Upper bound on total route duration; unlimited when absent.
    #[serde(
        default,
        with = "minutes::optional",
        rename = "max_route_duration_minutes"
    )]
    pub max_route_duration: Option<Duration>,
    /// Speed used to turn distance into travel time.
    #[serde(default = "default_speed")]
    pub average_speed_kmh: f64,
    /// Whether the route ends back at the depot.
    #[serde(default)]
    pub return_to_depot: bool,
}

const fn default_speed() -> f64 {
    DEFAULT_AVERAGE_SPEED_KMH
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            vehicle_capacity: None,
            max_route_duration: None,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            return_to_depot: false,
        }
    }
}

impl Constraints {
    /// Limit the vehicle load.
    #[must_use]
    pub const fn with_vehicle_capacity(mut self, capacity: f64) -> Self {
        self.vehicle_capacity = Some(capacity);
        self
    }

    /// Limit the total route duration.
    #[must_use]
    pub const fn with_max_route_duration(mut self, duration: Duration) -> Self {
        self.max_route_duration = Some(duration);
        self
    }

    /// Override the average speed.
    #[must_use]
    pub const fn with_average_speed_kmh(mut self, speed: f64) -> Self {
        self.average_speed_kmh = speed;
        self
    }

    /// Require the route to finish at the depot.
    #[must_use]
    pub const fn with_return_to_depot(mut self, return_to_depot: bool) -> Self {
        self.return_to_depot = return_to_depot;
        self
    }

    fn validate(&self) -> Result<(), RequestValidationError> {
        if let Some(capacity) = self.vehicle_capacity
            && !(capacity.is_finite() && capacity > 0.0)
        {
            return Err(RequestValidationError::InvalidCapacity(capacity));
        }
        if !(self.average_speed_kmh.is_finite() && self.average_speed_kmh > 0.0) {
            return Err(RequestValidationError::InvalidSpeed(self.average_speed_kmh));
        }
        if self.max_route_duration.is_some_and(|limit| limit.is_zero()) {
            return Err(RequestValidationError::InvalidMaxDuration);
        }
        Ok(())
    }
}

/// Everything needed to compute one driver's route.
///
/// Build with [`OptimizationRequest::new`], which rejects empty stop sets,
/// duplicate order identifiers and malformed values.
///
/// # Examples
/// ```
/// use lastmile_core::{
///     Constraints, Depot, DriverId, Location, OptimizationRequest, OrderId,
///     RequestValidationError, Stop,
/// };
///
/// let depot = Depot::new(Location::new(40.7128, -74.0060)?);
/// let stop = Stop::new(OrderId(1), Location::new(40.72, -74.0)?);
/// let request = OptimizationRequest::new(
///     DriverId(2),
///     depot,
///     vec![stop.clone(), stop],
///     Constraints::default(),
/// );
/// assert_eq!(request, Err(RequestValidationError::DuplicateOrder(OrderId(1))));
/// # Ok::<(), lastmile_core::LocationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Driver the route is for.
    pub driver_id: DriverId,
    /// Start (and optional end) location.
    pub depot: Depot,
    /// Deliveries to sequence.
    pub stops: Vec<Stop>,
    /// Optional limits.
    #[serde(default)]
    pub constraints: Constraints,
}

impl OptimizationRequest {
    /// Validate and construct a request.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestValidationError`] found.
    pub fn new(
        driver_id: DriverId,
        depot: Depot,
        stops: Vec<Stop>,
        constraints: Constraints,
    ) -> Result<Self, RequestValidationError> {
        let request = Self {
            driver_id,
            depot,
            stops,
            constraints,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the request invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestValidationError`] found.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.stops.is_empty() {
            return Err(RequestValidationError::EmptyStops);
        }
        recheck(self.depot.location)?;
        let mut seen = HashSet::with_capacity(self.stops.len());
        for stop in &self.stops {
            if !seen.insert(stop.order_id) {
                return Err(RequestValidationError::DuplicateOrder(stop.order_id));
            }
            recheck(stop.location)?;
            if !(stop.demand.is_finite() && stop.demand >= 0.0) {
                return Err(RequestValidationError::InvalidDemand {
                    order_id: stop.order_id,
                    demand: stop.demand,
                });
            }
            if let Some(window) = stop.time_window
                && let (Some(open), Some(close)) = (window.earliest(), window.latest())
                && open > close
            {
                return Err(RequestValidationError::InvalidTimeWindow(stop.order_id));
            }
        }
        self.constraints.validate()
    }
}

fn recheck(location: Location) -> Result<(), RequestValidationError> {
    Location::new(location.lat(), location.lng())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn depot() -> Depot {
        Depot::new(Location::new(0.0, 0.0).expect("valid depot"))
    }

    fn stop(id: u64) -> Stop {
        Stop::new(OrderId(id), Location::new(0.0, 0.01).expect("valid stop"))
    }

    #[rstest]
    fn rejects_empty_stop_set(depot: Depot) {
        let result = OptimizationRequest::new(DriverId(1), depot, Vec::new(), Constraints::default());
        assert_eq!(result, Err(RequestValidationError::EmptyStops));
    }

    #[rstest]
    fn rejects_negative_demand(depot: Depot) {
        let result = OptimizationRequest::new(
            DriverId(1),
            depot,
            vec![stop(1).with_demand(-1.0)],
            Constraints::default(),
        );
        assert!(matches!(
            result,
            Err(RequestValidationError::InvalidDemand { order_id: OrderId(1), .. })
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f64::NAN)]
    fn rejects_non_positive_capacity(depot: Depot, #[case] capacity: f64) {
        let result = OptimizationRequest::new(
            DriverId(1),
            depot,
            vec![stop(1)],
            Constraints::default().with_vehicle_capacity(capacity),
        );
        assert!(matches!(result, Err(RequestValidationError::InvalidCapacity(_))));
    }

    #[rstest]
    fn rejects_zero_speed(depot: Depot) {
        let result = OptimizationRequest::new(
            DriverId(1),
            depot,
            vec![stop(1)],
            Constraints::default().with_average_speed_kmh(0.0),
        );
        assert!(matches!(result, Err(RequestValidationError::InvalidSpeed(_))));
    }

    #[rstest]
    fn rejects_zero_max_duration(depot: Depot) {
        let result = OptimizationRequest::new(
            DriverId(1),
            depot,
            vec![stop(1)],
            Constraints::default().with_max_route_duration(Duration::ZERO),
        );
        assert_eq!(result, Err(RequestValidationError::InvalidMaxDuration));
    }

    #[rstest]
    fn accepts_distinct_orders(depot: Depot) {
        let request = OptimizationRequest::new(
            DriverId(1),
            depot,
            vec![stop(1), stop(2)],
            Constraints::default(),
        )
        .expect("valid request");
        assert_eq!(request.stops.len(), 2);
    }

    #[rstest]
    fn constraints_default_when_missing_from_json() {
        let request: OptimizationRequest = serde_json::from_str(
            r#"{
                "driver_id": 3,
                "depot": {"lat": 0.0, "lng": 0.0},
                "stops": [{"order_id": 1, "location": {"lat": 0.0, "lng": 0.5}}]
            }"#,
        )
        .expect("request should decode");
        assert_eq!(request.constraints, Constraints::default());
        assert!(request.validate().is_ok());
    }
}
