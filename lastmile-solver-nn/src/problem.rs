//! Search-ready view of an optimisation request.
//!
//! Nodes are numbered with the depot at `0` and stop `i` of the request at
//! `i + 1`. Distances are precomputed once per request.

use std::time::Duration;

use lastmile_core::{Constraints, OptimizationRequest, OrderId, Stop};

/// Index of the depot node.
pub(crate) const DEPOT: usize = 0;

/// Relative tolerance under which two costs count as equal.
pub(crate) const COST_TOLERANCE: f64 = 1e-9;

/// Precomputed haversine distances and the speed that turns them into time.
#[derive(Debug, Clone)]
pub(crate) struct CostModel {
    size: usize,
    distances: Vec<f64>,
    metres_per_second: f64,
}

impl CostModel {
    #[expect(
        clippy::float_arithmetic,
        reason = "speed conversion from km/h to m/s"
    )]
    pub(crate) fn new(request: &OptimizationRequest) -> Self {
        let locations: Vec<_> = std::iter::once(request.depot.location)
            .chain(request.stops.iter().map(|stop| stop.location))
            .collect();
        let distances = locations
            .iter()
            .flat_map(|from| locations.iter().map(move |to| from.distance_to(to)))
            .collect();
        Self {
            size: locations.len(),
            distances,
            metres_per_second: request.constraints.average_speed_kmh / 3.6,
        }
    }

    /// Distance in metres between two nodes.
    pub(crate) fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances
            .get(from * self.size + to)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Time needed to drive `metres`.
    #[expect(clippy::float_arithmetic, reason = "distance over speed")]
    pub(crate) fn time_for(&self, metres: f64) -> Duration {
        Duration::try_from_secs_f64(metres / self.metres_per_second).unwrap_or(Duration::MAX)
    }

    /// Distance covered while waiting for `wait`, used to price waits in metres.
    #[expect(clippy::float_arithmetic, reason = "time times speed")]
    pub(crate) fn metres_for(&self, wait: Duration) -> f64 {
        wait.as_secs_f64() * self.metres_per_second
    }
}

/// The request plus its cost model.
#[derive(Debug)]
pub(crate) struct Problem<'a> {
    pub(crate) stops: &'a [Stop],
    pub(crate) constraints: &'a Constraints,
    pub(crate) cost: CostModel,
}

impl<'a> Problem<'a> {
    pub(crate) fn new(request: &'a OptimizationRequest) -> Self {
        Self {
            stops: &request.stops,
            constraints: &request.constraints,
            cost: CostModel::new(request),
        }
    }

    pub(crate) fn stop(&self, index: usize) -> Option<&'a Stop> {
        self.stops.get(index)
    }

    pub(crate) fn order_id(&self, index: usize) -> Option<OrderId> {
        self.stop(index).map(|stop| stop.order_id)
    }

    /// Node number of stop `index`.
    pub(crate) const fn node(index: usize) -> usize {
        index + 1
    }

    /// Total driving distance of visiting `order` from the depot.
    #[expect(clippy::float_arithmetic, reason = "summing leg distances")]
    pub(crate) fn route_distance(&self, order: &[usize]) -> f64 {
        let mut previous = DEPOT;
        let mut total = 0.0;
        for &index in order {
            let node = Self::node(index);
            total += self.cost.distance(previous, node);
            previous = node;
        }
        if self.constraints.return_to_depot {
            total += self.cost.distance(previous, DEPOT);
        }
        total
    }
}

/// Whether `a` is strictly smaller than `b` beyond the tie tolerance.
#[expect(clippy::float_arithmetic, reason = "relative tolerance comparison")]
pub(crate) fn strictly_less(a: f64, b: f64) -> bool {
    a < b - COST_TOLERANCE * b.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastmile_core::test_support::{request_from_origin, stop_at};
    use rstest::rstest;

    #[rstest]
    fn distances_are_symmetric_with_zero_diagonal() {
        let request = request_from_origin(
            vec![stop_at(1, 0.0, 1.0), stop_at(2, 0.5, 0.5)],
            Constraints::default(),
        );
        let cost = CostModel::new(&request);
        for from in 0..3 {
            assert_eq!(cost.distance(from, from), 0.0);
            for to in 0..3 {
                assert_eq!(cost.distance(from, to), cost.distance(to, from));
            }
        }
    }

    #[rstest]
    fn thirty_kmh_covers_500_metres_a_minute() {
        let request = request_from_origin(vec![stop_at(1, 0.0, 1.0)], Constraints::default());
        let cost = CostModel::new(&request);
        let minute = cost.time_for(500.0);
        assert!((minute.as_secs_f64() - 60.0).abs() < 1e-6);
    }

    #[rstest]
    fn round_trips_include_the_return_leg() {
        let stops = vec![stop_at(1, 0.0, 1.0)];
        let open = request_from_origin(stops.clone(), Constraints::default());
        let closed = request_from_origin(stops, Constraints::default().with_return_to_depot(true));
        let one_way = Problem::new(&open).route_distance(&[0]);
        let round = Problem::new(&closed).route_distance(&[0]);
        assert!((round - 2.0 * one_way).abs() < 1e-6);
    }

    #[rstest]
    #[case(1.0, 2.0, true)]
    #[case(1.0, 1.0, false)]
    #[case(1_000_000.0, 1_000_000.000_000_1, false)]
    fn strict_comparison_ignores_rounding_noise(#[case] a: f64, #[case] b: f64, #[case] expected: bool) {
        assert_eq!(strictly_less(a, b), expected);
    }
}
