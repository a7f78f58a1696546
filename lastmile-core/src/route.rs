//! Routes produced by an optimizer.
//!
//! A [`Route`] is a pure computation result: the ordered stops with derived
//! arrival times and distances. The caller decides whether to persist it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Depot, DriverId, OrderId, Stop};

/// Why local improvement stopped before converging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// The configured iteration cap was reached.
    IterationCap,
    /// The caller raised the cancel flag.
    Cancelled,
    /// The wall-clock budget elapsed.
    Deadline,
}

/// A stop placed on a route with its derived schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// The delivery.
    pub stop: Stop,
    /// Estimated arrival, measured from departure.
    pub arrival: Duration,
    /// Time spent waiting for the window to open.
    pub wait: Duration,
    /// When the driver leaves this stop.
    pub departure: Duration,
    /// Distance of the leg ending here, in metres.
    pub leg_distance_m: f64,
    /// Distance travelled from the depot up to this stop, in metres.
    pub cumulative_distance_m: f64,
}

impl RouteStop {
    /// Order delivered at this stop.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.stop.order_id
    }
}

/// Search statistics reported alongside a route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Wall-clock time spent optimising.
    pub solve_time: Duration,
    /// Improvement iterations that applied a move.
    pub improvement_iterations: usize,
    /// Route distance straight after construction, in metres.
    pub construction_distance_m: f64,
}

/// An ordered sequence of stops assigned to one driver.
///
/// Every input stop appears exactly once.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lastmile_core::{Depot, Diagnostics, DriverId, Location, Route};
///
/// let depot = Depot::new(Location::new(0.0, 0.0)?);
/// let route = Route {
///     driver_id: DriverId(2),
///     depot,
///     stops: Vec::new(),
///     total_distance_m: 0.0,
///     total_duration: Duration::ZERO,
///     truncated: false,
///     truncation: None,
///     diagnostics: Diagnostics::default(),
/// };
/// assert!(route.order_ids().is_empty());
/// # Ok::<(), lastmile_core::LocationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Driver the route is assigned to.
    pub driver_id: DriverId,
    /// Where the route starts.
    pub depot: Depot,
    /// Stops in visiting order.
    pub stops: Vec<RouteStop>,
    /// Total distance in metres, including the return leg on round trips.
    pub total_distance_m: f64,
    /// Time from departure until the last service (or the return) completes.
    pub total_duration: Duration,
    /// Whether local improvement stopped before converging.
    pub truncated: bool,
    /// Reason for truncation, when truncated.
    pub truncation: Option<Truncation>,
    /// Search statistics.
    pub diagnostics: Diagnostics,
}

impl Route {
    /// Order identifiers in visiting order.
    #[must_use]
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.stops.iter().map(RouteStop::order_id).collect()
    }

    /// Number of stops on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the route visits no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use rstest::{fixture, rstest};

    #[fixture]
    fn route() -> Route {
        let depot = Depot::new(Location::new(0.0, 0.0).expect("valid depot"));
        let stops = [3, 1]
            .into_iter()
            .map(|id| RouteStop {
                stop: Stop::new(OrderId(id), Location::new(0.0, 0.1).expect("valid stop")),
                arrival: Duration::ZERO,
                wait: Duration::ZERO,
                departure: Duration::ZERO,
                leg_distance_m: 0.0,
                cumulative_distance_m: 0.0,
            })
            .collect();
        Route {
            driver_id: DriverId(2),
            depot,
            stops,
            total_distance_m: 0.0,
            total_duration: Duration::ZERO,
            truncated: false,
            truncation: None,
            diagnostics: Diagnostics::default(),
        }
    }

    #[rstest]
    fn order_ids_follow_visiting_order(route: Route) {
        assert_eq!(route.order_ids(), vec![OrderId(3), OrderId(1)]);
        assert_eq!(route.len(), 2);
        assert!(!route.is_empty());
    }

    #[rstest]
    fn truncation_serialises_in_snake_case() {
        let json = serde_json::to_string(&Truncation::IterationCap).expect("serialise");
        assert_eq!(json, "\"iteration_cap\"");
    }
}
