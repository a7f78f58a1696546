//! Arrival-time derivation and feasibility checks for a visiting order.
//!
//! Walking an order from the depot: arrival is the previous departure plus
//! travel time; arriving before a window opens waits until it does; departure
//! adds the service time. The result is deterministic for a given order.

use std::time::Duration;

use lastmile_core::Stop;

use crate::problem::{DEPOT, Problem};

/// Capacity slack absorbing floating-point noise in demand sums.
const CAPACITY_SLACK: f64 = 1e-9;

/// Timing of one stop on a scheduled route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Visit {
    pub(crate) arrival: Duration,
    pub(crate) wait: Duration,
    pub(crate) departure: Duration,
    pub(crate) leg_m: f64,
    pub(crate) cumulative_m: f64,
}

/// A fully timed visiting order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Schedule {
    pub(crate) visits: Vec<Visit>,
    pub(crate) distance_m: f64,
    pub(crate) duration: Duration,
}

/// Why a visiting order cannot be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Infeasible {
    /// The stop at this request index is reached after its window closes.
    Window(usize),
    /// The route runs past the maximum duration.
    Duration,
    /// Total demand exceeds the vehicle capacity.
    Capacity,
    /// The order references a stop outside the request.
    UnknownStop(usize),
}

/// Outcome of serving one stop from a given position and time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Service {
    pub(crate) arrival: Duration,
    pub(crate) wait: Duration,
    pub(crate) departure: Duration,
    pub(crate) leg_m: f64,
}

/// Serve `stop` (request index `index`) after leaving `from` at `departed`.
pub(crate) fn serve(
    problem: &Problem<'_>,
    from: usize,
    departed: Duration,
    index: usize,
    stop: &Stop,
) -> Result<Service, Infeasible> {
    let leg_m = problem.cost.distance(from, Problem::node(index));
    let arrival = departed.saturating_add(problem.cost.time_for(leg_m));
    let window = stop.time_window.unwrap_or_default();
    if !window.admits(arrival) {
        return Err(Infeasible::Window(index));
    }
    let wait = window.wait_for(arrival);
    let departure = arrival.saturating_add(wait).saturating_add(stop.service_time);
    Ok(Service {
        arrival,
        wait,
        departure,
        leg_m,
    })
}

/// Time the route would finish if it ended after leaving `node` at
/// `departed`.
pub(crate) fn completion(problem: &Problem<'_>, node: usize, departed: Duration) -> Duration {
    if problem.constraints.return_to_depot {
        departed.saturating_add(problem.cost.time_for(problem.cost.distance(node, DEPOT)))
    } else {
        departed
    }
}

/// Whether finishing at `finish` respects the maximum route duration.
pub(crate) fn within_duration(problem: &Problem<'_>, finish: Duration) -> bool {
    problem
        .constraints
        .max_route_duration
        .is_none_or(|limit| finish <= limit)
}

/// Whether `load` fits the vehicle.
#[expect(clippy::float_arithmetic, reason = "capacity comparison with slack")]
pub(crate) fn fits(problem: &Problem<'_>, load: f64) -> bool {
    problem
        .constraints
        .vehicle_capacity
        .is_none_or(|capacity| load <= capacity + CAPACITY_SLACK)
}

/// Time and check every stop of `order`.
#[expect(clippy::float_arithmetic, reason = "accumulating distances and load")]
pub(crate) fn evaluate(problem: &Problem<'_>, order: &[usize]) -> Result<Schedule, Infeasible> {
    let mut visits = Vec::with_capacity(order.len());
    let mut position = DEPOT;
    let mut clock = Duration::ZERO;
    let mut travelled = 0.0;
    let mut load = 0.0;
    for &index in order {
        let stop = problem.stop(index).ok_or(Infeasible::UnknownStop(index))?;
        let service = serve(problem, position, clock, index, stop)?;
        travelled += service.leg_m;
        load += stop.demand;
        visits.push(Visit {
            arrival: service.arrival,
            wait: service.wait,
            departure: service.departure,
            leg_m: service.leg_m,
            cumulative_m: travelled,
        });
        position = Problem::node(index);
        clock = service.departure;
    }
    if !fits(problem, load) {
        return Err(Infeasible::Capacity);
    }
    if problem.constraints.return_to_depot {
        travelled += problem.cost.distance(position, DEPOT);
    }
    let duration = completion(problem, position, clock);
    if !within_duration(problem, duration) {
        return Err(Infeasible::Duration);
    }
    Ok(Schedule {
        visits,
        distance_m: travelled,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastmile_core::test_support::{request_from_origin, stop_at};
    use lastmile_core::{Constraints, TimeWindow};
    use rstest::rstest;

    /// Minutes from departure.
    fn minutes(value: u64) -> Duration {
        Duration::from_secs(value * 60)
    }

    #[rstest]
    fn early_arrival_waits_for_the_window() {
        // 500 m at 30 km/h is a one-minute drive.
        let stop = stop_at(1, 0.0, 0.004_496_6)
            .with_time_window(TimeWindow::new(Some(minutes(5)), None).expect("valid window"))
            .with_service_time(minutes(2));
        let request = request_from_origin(vec![stop], Constraints::default());
        let problem = Problem::new(&request);
        let schedule = evaluate(&problem, &[0]).expect("feasible");
        let visit = schedule.visits.first().expect("one visit");
        assert_eq!(visit.wait + visit.arrival, minutes(5));
        assert_eq!(visit.departure, minutes(7));
        assert_eq!(schedule.duration, minutes(7));
    }

    #[rstest]
    fn late_arrival_is_infeasible() {
        let stop = stop_at(1, 0.0, 1.0).with_time_window(TimeWindow::until(minutes(1)));
        let request = request_from_origin(vec![stop], Constraints::default());
        let problem = Problem::new(&request);
        assert_eq!(evaluate(&problem, &[0]), Err(Infeasible::Window(0)));
    }

    #[rstest]
    fn overload_is_infeasible() {
        let stops = vec![
            stop_at(1, 0.0, 0.1).with_demand(3.0),
            stop_at(2, 0.0, 0.2).with_demand(3.0),
        ];
        let request = request_from_origin(stops, Constraints::default().with_vehicle_capacity(5.0));
        let problem = Problem::new(&request);
        assert_eq!(evaluate(&problem, &[0, 1]), Err(Infeasible::Capacity));
    }

    #[rstest]
    fn duration_limit_counts_the_return_leg() {
        // Roughly 11.1 km each way: about 22 minutes out, 44 round trip.
        let stops = vec![stop_at(1, 0.0, 0.1)];
        let limit = minutes(30);
        let open = request_from_origin(
            stops.clone(),
            Constraints::default().with_max_route_duration(limit),
        );
        let closed = request_from_origin(
            stops,
            Constraints::default()
                .with_max_route_duration(limit)
                .with_return_to_depot(true),
        );
        assert!(evaluate(&Problem::new(&open), &[0]).is_ok());
        assert_eq!(
            evaluate(&Problem::new(&closed), &[0]),
            Err(Infeasible::Duration)
        );
    }

    #[rstest]
    fn cumulative_distance_matches_route_distance() {
        let stops = vec![stop_at(1, 0.0, 0.1), stop_at(2, 0.1, 0.1), stop_at(3, 0.1, 0.0)];
        let request = request_from_origin(stops, Constraints::default());
        let problem = Problem::new(&request);
        let schedule = evaluate(&problem, &[0, 1, 2]).expect("feasible");
        let last = schedule.visits.last().expect("three visits");
        assert!((last.cumulative_m - problem.route_distance(&[0, 1, 2])).abs() < 1e-6);
        assert!((schedule.distance_m - last.cumulative_m).abs() < 1e-6);
    }
}
