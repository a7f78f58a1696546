//! Nearest-neighbour construction.
//!
//! Starting at the depot, repeatedly extend the route with the cheapest
//! feasible unvisited stop. Cost is the leg distance plus any forced wait,
//! priced at the average speed. Ties go to the lowest order identifier.

use std::time::{Duration, Instant};

use lastmile_core::{CancelToken, OptimizationError, OrderId, ViolatedConstraint};

use crate::problem::{DEPOT, Problem, strictly_less};
use crate::schedule::{completion, fits, serve, within_duration};

#[derive(Debug, Clone, Copy)]
struct Candidate {
    slot: usize,
    index: usize,
    order_id: OrderId,
    cost: f64,
    departure: Duration,
    demand: f64,
}

impl Candidate {
    fn beats(&self, other: &Self) -> bool {
        strictly_less(self.cost, other.cost)
            || (!strictly_less(other.cost, self.cost) && self.order_id < other.order_id)
    }
}

/// Reasons stops were passed over during one selection step.
#[derive(Debug, Default, Clone, Copy)]
struct Skipped {
    window: bool,
    duration: bool,
    capacity: bool,
}

/// Build an initial visiting order as request stop indices.
pub(crate) fn construct(
    problem: &Problem<'_>,
    cancel: &CancelToken,
    started: Instant,
) -> Result<Vec<usize>, OptimizationError> {
    reject_oversized(problem)?;

    let mut remaining: Vec<usize> = (0..problem.stops.len()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut position = DEPOT;
    let mut clock = Duration::ZERO;
    let mut load = 0.0;

    while !remaining.is_empty() {
        if cancel.check().is_some() {
            return Err(OptimizationError::Timeout {
                elapsed: started.elapsed(),
            });
        }
        let (chosen, skipped) = select(problem, &remaining, position, clock, load);
        let Some(candidate) = chosen else {
            return Err(stuck(problem, &remaining, skipped, load));
        };
        remaining.remove(candidate.slot);
        order.push(candidate.index);
        position = Problem::node(candidate.index);
        clock = candidate.departure;
        load = accumulate(load, candidate.demand);
    }

    log::debug!(
        "nearest-neighbour construction placed {} stops over {:.0} m",
        order.len(),
        problem.route_distance(&order)
    );
    Ok(order)
}

fn select(
    problem: &Problem<'_>,
    remaining: &[usize],
    position: usize,
    clock: Duration,
    load: f64,
) -> (Option<Candidate>, Skipped) {
    let mut skipped = Skipped::default();
    let mut best: Option<Candidate> = None;
    for (slot, &index) in remaining.iter().enumerate() {
        let Some(stop) = problem.stop(index) else {
            continue;
        };
        if !fits(problem, accumulate(load, stop.demand)) {
            skipped.capacity = true;
            continue;
        }
        let Ok(service) = serve(problem, position, clock, index, stop) else {
            skipped.window = true;
            continue;
        };
        let finish = completion(problem, Problem::node(index), service.departure);
        if !within_duration(problem, finish) {
            skipped.duration = true;
            continue;
        }
        let candidate = Candidate {
            slot,
            index,
            order_id: stop.order_id,
            cost: accumulate(service.leg_m, problem.cost.metres_for(service.wait)),
            departure: service.departure,
            demand: stop.demand,
        };
        if best.is_none_or(|current| candidate.beats(&current)) {
            best = Some(candidate);
        }
    }
    (best, skipped)
}

#[expect(clippy::float_arithmetic, reason = "summing load and cost terms")]
fn accumulate(total: f64, amount: f64) -> f64 {
    total + amount
}

fn reject_oversized(problem: &Problem<'_>) -> Result<(), OptimizationError> {
    let Some(capacity) = problem.constraints.vehicle_capacity else {
        return Ok(());
    };
    let mut oversized: Vec<OrderId> = problem
        .stops
        .iter()
        .filter(|stop| !fits(problem, stop.demand))
        .map(|stop| stop.order_id)
        .collect();
    if oversized.is_empty() {
        return Ok(());
    }
    oversized.sort_unstable();
    Err(OptimizationError::CapacityExceeded {
        orders: oversized,
        remaining: capacity,
    })
}

#[expect(clippy::float_arithmetic, reason = "remaining capacity")]
fn stuck(problem: &Problem<'_>, remaining: &[usize], skipped: Skipped, load: f64) -> OptimizationError {
    let mut orders: Vec<OrderId> = remaining
        .iter()
        .filter_map(|&index| problem.order_id(index))
        .collect();
    orders.sort_unstable();
    if skipped.capacity && !skipped.window && !skipped.duration {
        let left = problem
            .constraints
            .vehicle_capacity
            .map_or(f64::INFINITY, |capacity| capacity - load);
        log::debug!("construction stopped: capacity exhausted with {left} remaining");
        return OptimizationError::CapacityExceeded {
            orders,
            remaining: left,
        };
    }
    let constraint = if skipped.window {
        ViolatedConstraint::TimeWindow
    } else {
        ViolatedConstraint::MaxRouteDuration
    };
    log::debug!("construction stopped: {constraint} unreachable for {} stops", orders.len());
    OptimizationError::ConstraintViolation { constraint, orders }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastmile_core::test_support::{request_from_origin, stop_at};
    use lastmile_core::{Constraints, TimeWindow};
    use rstest::rstest;

    fn build(stops: Vec<lastmile_core::Stop>, constraints: Constraints) -> Result<Vec<usize>, OptimizationError> {
        let request = request_from_origin(stops, constraints);
        let problem = Problem::new(&request);
        construct(&problem, &CancelToken::new(), Instant::now())
    }

    #[rstest]
    fn visits_nearest_first_and_breaks_ties_by_order_id() {
        // Stops 1 and 3 are equidistant from the depot; 1 wins the tie.
        let stops = vec![
            stop_at(3, 0.0, -1.0),
            stop_at(2, 0.0, 2.0),
            stop_at(1, 0.0, 1.0),
        ];
        let order = build(stops, Constraints::default()).expect("feasible");
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[rstest]
    fn waiting_counts_towards_cost() {
        // The nearer stop opens late, so the farther one is cheaper first.
        let near = stop_at(1, 0.0, 0.01).with_time_window(
            TimeWindow::new(Some(Duration::from_secs(3600)), None).expect("valid window"),
        );
        let far = stop_at(2, 0.0, 0.02);
        let order = build(vec![near, far], Constraints::default()).expect("feasible");
        assert_eq!(order, vec![1, 0]);
    }

    #[rstest]
    fn oversized_stop_fails_before_search() {
        let stops = vec![stop_at(1, 0.0, 0.1).with_demand(12.0), stop_at(2, 0.0, 0.2)];
        let err = build(stops, Constraints::default().with_vehicle_capacity(10.0))
            .expect_err("stop 1 cannot fit");
        assert_eq!(
            err,
            OptimizationError::CapacityExceeded {
                orders: vec![OrderId(1)],
                remaining: 10.0,
            }
        );
    }

    #[rstest]
    fn exhausted_capacity_reports_leftover_orders() {
        let stops = vec![
            stop_at(1, 0.0, 0.1).with_demand(6.0),
            stop_at(2, 0.0, 0.2).with_demand(6.0),
        ];
        let err = build(stops, Constraints::default().with_vehicle_capacity(10.0))
            .expect_err("only one stop fits");
        assert!(matches!(
            err,
            OptimizationError::CapacityExceeded { ref orders, .. } if orders == &[OrderId(2)]
        ));
    }

    #[rstest]
    fn closed_window_is_a_constraint_violation() {
        let stops = vec![stop_at(4, 0.0, 1.0).with_time_window(TimeWindow::until(Duration::from_secs(60)))];
        let err = build(stops, Constraints::default()).expect_err("window unreachable");
        assert_eq!(
            err,
            OptimizationError::ConstraintViolation {
                constraint: ViolatedConstraint::TimeWindow,
                orders: vec![OrderId(4)],
            }
        );
    }

    #[rstest]
    fn unreachable_duration_limit_is_a_constraint_violation() {
        // A degree of longitude at the equator takes hours at the default speed.
        let stops = vec![stop_at(5, 0.0, 1.0)];
        let constraints =
            Constraints::default().with_max_route_duration(Duration::from_secs(60 * 60));
        let err = build(stops, constraints).expect_err("route too long");
        assert_eq!(
            err,
            OptimizationError::ConstraintViolation {
                constraint: ViolatedConstraint::MaxRouteDuration,
                orders: vec![OrderId(5)],
            }
        );
    }

    #[rstest]
    fn closed_window_outranks_duration_when_both_block() {
        let stops = vec![
            stop_at(6, 0.0, 1.0),
            stop_at(7, 0.0, -1.0).with_time_window(TimeWindow::until(Duration::from_secs(60))),
        ];
        let constraints =
            Constraints::default().with_max_route_duration(Duration::from_secs(60 * 60));
        let err = build(stops, constraints).expect_err("nothing reachable");
        assert_eq!(
            err,
            OptimizationError::ConstraintViolation {
                constraint: ViolatedConstraint::TimeWindow,
                orders: vec![OrderId(6), OrderId(7)],
            }
        );
    }

    #[rstest]
    fn elapsed_deadline_times_out() {
        let request = request_from_origin(vec![stop_at(1, 0.0, 0.1)], Constraints::default());
        let problem = Problem::new(&request);
        let token = CancelToken::new().with_deadline(Instant::now());
        let err = construct(&problem, &token, Instant::now()).expect_err("deadline passed");
        assert!(matches!(err, OptimizationError::Timeout { .. }));
    }
}
