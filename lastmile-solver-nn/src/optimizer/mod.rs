//! `NearestNeighbourOptimizer`: greedy construction followed by local search.

use std::time::{Duration, Instant};

use lastmile_core::{
    CancelToken, Diagnostics, OptimizationError, OptimizationRequest, RequestValidationError,
    Route, RouteOptimizer, RouteStop, Truncation, ViolatedConstraint,
};

use crate::construction::construct;
use crate::improvement::improve;
use crate::problem::Problem;
use crate::schedule::{Infeasible, Schedule, evaluate};

/// Improvement iterations allowed when no cap is configured.
pub const DEFAULT_MAX_IMPROVEMENT_ITERATIONS: usize = 1000;

/// Configuration for [`NearestNeighbourOptimizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Upper bound on applied improvement moves.
    pub max_improvement_iterations: usize,
    /// Wall-clock budget for a single optimisation.
    pub time_budget: Option<Duration>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_improvement_iterations: DEFAULT_MAX_IMPROVEMENT_ITERATIONS,
            time_budget: None,
        }
    }
}

impl OptimizerConfig {
    /// Set the improvement iteration cap.
    #[must_use]
    pub const fn with_max_improvement_iterations(mut self, iterations: usize) -> Self {
        self.max_improvement_iterations = iterations;
        self
    }

    /// Set the wall-clock budget.
    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Route optimizer using nearest-neighbour construction and local search.
///
/// Output is deterministic: identical requests yield identical routes.
///
/// # Examples
/// ```
/// use lastmile_core::{
///     Constraints, Depot, DriverId, Location, OptimizationRequest, OrderId, RouteOptimizer,
///     Stop,
/// };
/// use lastmile_solver_nn::NearestNeighbourOptimizer;
///
/// let at = |lng| Location::new(0.0, lng);
/// let request = OptimizationRequest::new(
///     DriverId(2),
///     Depot::new(at(0.0)?),
///     vec![
///         Stop::new(OrderId(1), at(1.0)?),
///         Stop::new(OrderId(2), at(2.0)?),
///         Stop::new(OrderId(3), at(-1.0)?),
///     ],
///     Constraints::default(),
/// )?;
/// let route = NearestNeighbourOptimizer::default().optimize(&request)?;
/// assert_eq!(route.order_ids(), vec![OrderId(3), OrderId(1), OrderId(2)]);
/// assert!(!route.truncated);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NearestNeighbourOptimizer {
    config: OptimizerConfig,
}

impl NearestNeighbourOptimizer {
    /// Construct an optimizer with explicit configuration.
    #[must_use]
    pub const fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

impl RouteOptimizer for NearestNeighbourOptimizer {
    fn optimize_with_cancel(
        &self,
        request: &OptimizationRequest,
        cancel: &CancelToken,
    ) -> Result<Route, OptimizationError> {
        request.validate()?;
        let started = Instant::now();
        let token = match self.config.time_budget {
            Some(budget) => cancel.clone().with_budget(budget),
            None => cancel.clone(),
        };

        let problem = Problem::new(request);
        let constructed = construct(&problem, &token, started)?;
        let construction_distance_m = problem.route_distance(&constructed);
        let improvement = improve(
            &problem,
            constructed,
            self.config.max_improvement_iterations,
            &token,
        );
        let schedule = evaluate(&problem, &improvement.order).map_err(|reason| {
            log::error!("improved route failed re-evaluation: {reason:?}");
            infeasible_error(&problem, &improvement.order, reason)
        })?;

        if let Some(reason) = improvement.truncation {
            log::warn!(
                "improvement truncated after {} iterations ({reason:?})",
                improvement.iterations
            );
        }
        log::debug!(
            "optimised {} stops for driver {}: {:.0} m -> {:.0} m",
            improvement.order.len(),
            request.driver_id,
            construction_distance_m,
            schedule.distance_m
        );

        let diagnostics = Diagnostics {
            solve_time: started.elapsed(),
            improvement_iterations: improvement.iterations,
            construction_distance_m,
        };
        Ok(assemble(
            request,
            &improvement.order,
            schedule,
            improvement.truncation,
            diagnostics,
        ))
    }
}

fn assemble(
    request: &OptimizationRequest,
    order: &[usize],
    schedule: Schedule,
    truncation: Option<Truncation>,
    diagnostics: Diagnostics,
) -> Route {
    let stops = order
        .iter()
        .zip(schedule.visits)
        .filter_map(|(&index, visit)| {
            request.stops.get(index).map(|stop| RouteStop {
                stop: stop.clone(),
                arrival: visit.arrival,
                wait: visit.wait,
                departure: visit.departure,
                leg_distance_m: visit.leg_m,
                cumulative_distance_m: visit.cumulative_m,
            })
        })
        .collect();
    Route {
        driver_id: request.driver_id,
        depot: request.depot,
        stops,
        total_distance_m: schedule.distance_m,
        total_duration: schedule.duration,
        truncated: truncation.is_some(),
        truncation,
        diagnostics,
    }
}

fn infeasible_error(problem: &Problem<'_>, order: &[usize], reason: Infeasible) -> OptimizationError {
    let mut orders: Vec<_> = order
        .iter()
        .filter_map(|&index| problem.order_id(index))
        .collect();
    orders.sort_unstable();
    match reason {
        Infeasible::Capacity => OptimizationError::CapacityExceeded {
            orders,
            remaining: problem.constraints.vehicle_capacity.unwrap_or(f64::INFINITY),
        },
        Infeasible::Window(index) => OptimizationError::ConstraintViolation {
            constraint: ViolatedConstraint::TimeWindow,
            orders: problem.order_id(index).map_or(orders, |late| vec![late]),
        },
        Infeasible::Duration => OptimizationError::ConstraintViolation {
            constraint: ViolatedConstraint::MaxRouteDuration,
            orders,
        },
        Infeasible::UnknownStop(index) => {
            log::error!("route references stop {index} outside the request");
            RequestValidationError::StopOutOfRange(index).into()
        }
    }
}
