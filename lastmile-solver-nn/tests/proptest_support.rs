//! Proptest strategies for optimizer property tests.
//!
//! The strategies generate valid requests: unique order identifiers, in-range
//! coordinates clustered around the origin and positive demands.

use std::collections::BTreeSet;

use lastmile_core::{
    Constraints, Depot, DriverId, Location, OptimizationRequest, OrderId, Route, Stop,
};
use proptest::prelude::*;

/// Roughly 5.5 km either side of the origin.
const SPREAD_DEGREES: f64 = 0.05;

fn location_strategy() -> impl Strategy<Value = Location> {
    (-SPREAD_DEGREES..SPREAD_DEGREES, -SPREAD_DEGREES..SPREAD_DEGREES).prop_map(|(lat, lng)| {
        Location::new(lat, lng).unwrap_or_else(|err| panic!("strategy produced {err}"))
    })
}

/// Strategy for `min_count..=max_count` stops with unique order identifiers.
pub fn stop_set_strategy(min_count: usize, max_count: usize) -> impl Strategy<Value = Vec<Stop>> {
    (min_count..=max_count).prop_flat_map(|count| {
        proptest::collection::vec((location_strategy(), 1_u32..=5_u32), count).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .zip(1_u64..)
                    .map(|((location, demand), id)| {
                        Stop::new(OrderId(id), location).with_demand(f64::from(demand))
                    })
                    .collect()
            },
        )
    })
}

/// Request from the origin for driver 1.
pub fn request(stops: Vec<Stop>, constraints: Constraints) -> OptimizationRequest {
    let depot = Location::new(0.0, 0.0).unwrap_or_else(|err| panic!("invalid depot: {err}"));
    OptimizationRequest::new(DriverId(1), Depot::new(depot), stops, constraints)
        .unwrap_or_else(|err| panic!("strategy produced an invalid request: {err}"))
}

/// Total demand of `stops`.
#[expect(clippy::float_arithmetic, reason = "summing demands")]
pub fn total_demand(stops: &[Stop]) -> f64 {
    stops.iter().map(|stop| stop.demand).sum()
}

/// Whether `route` visits each requested order exactly once.
pub fn visits_each_order_once(route: &Route, request: &OptimizationRequest) -> bool {
    let visited = route.order_ids();
    let unique: BTreeSet<OrderId> = visited.iter().copied().collect();
    let requested: BTreeSet<OrderId> = request.stops.iter().map(|stop| stop.order_id).collect();
    unique.len() == visited.len() && unique == requested
}
