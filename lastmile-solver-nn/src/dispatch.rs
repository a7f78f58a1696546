//! End-to-end planning of a dispatch request.
//!
//! The [`Dispatcher`] wires the collaborators together: it checks the driver,
//! resolves orders through the store, optimises the route and publishes the
//! assignment. Publishing is best effort; a failed notification is logged and
//! the plan is still returned.

use lastmile_core::{
    AssignmentSink, CancelToken, DispatchError, DispatchRequest, DriverRoster, OrderStore,
    RequestValidationError, RouteAssignment, RouteOptimizer, RoutePlan, resolve_stops,
};

/// Plans routes for dispatch requests.
///
/// # Examples
/// ```
/// use lastmile_core::{
///     AnyDriver, DispatchRequest, DriverId, InMemoryOrderStore, Location, LogAssignmentSink,
///     OrderId, OrderRecord,
/// };
/// use lastmile_solver_nn::{Dispatcher, NearestNeighbourOptimizer};
///
/// let store = InMemoryOrderStore::with_records([
///     OrderRecord::pending(OrderId(1), Location::new(0.0, 0.01)?),
///     OrderRecord::pending(OrderId(2), Location::new(0.0, 0.02)?),
/// ]);
/// let dispatcher = Dispatcher::new(
///     store,
///     AnyDriver,
///     NearestNeighbourOptimizer::default(),
///     LogAssignmentSink,
/// );
/// let plan = dispatcher.plan(&DispatchRequest {
///     order_ids: vec![OrderId(2), OrderId(1)],
///     driver_id: DriverId(5),
///     start_location: Location::new(0.0, 0.0)?,
///     constraints: None,
/// })?;
/// assert_eq!(plan.stops.len(), 2);
/// assert_eq!(plan.stops.first().map(|stop| stop.order_id), Some(OrderId(1)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher<S, D, O, N> {
    store: S,
    roster: D,
    optimizer: O,
    sink: N,
}

impl<S, D, O, N> Dispatcher<S, D, O, N>
where
    S: OrderStore,
    D: DriverRoster,
    O: RouteOptimizer,
    N: AssignmentSink,
{
    /// Assemble a dispatcher from its collaborators.
    #[must_use]
    pub const fn new(store: S, roster: D, optimizer: O, sink: N) -> Self {
        Self {
            store,
            roster,
            optimizer,
            sink,
        }
    }

    /// The optimizer used for planning.
    #[must_use]
    pub const fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Plan `request` without external cancellation.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::plan_with_cancel`].
    pub fn plan(&self, request: &DispatchRequest) -> Result<RoutePlan, DispatchError> {
        self.plan_with_cancel(request, &CancelToken::new())
    }

    /// Plan `request`, honouring `cancel` while optimising.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when orders cannot be fetched and
    /// [`DispatchError::Optimization`] for invalid input, unavailable drivers,
    /// infeasible constraints or timeouts.
    pub fn plan_with_cancel(
        &self,
        request: &DispatchRequest,
        cancel: &CancelToken,
    ) -> Result<RoutePlan, DispatchError> {
        if request.order_ids.is_empty() {
            return Err(RequestValidationError::EmptyStops.into());
        }
        if !self.roster.is_available(request.driver_id) {
            return Err(RequestValidationError::DriverUnavailable(request.driver_id).into());
        }

        let records = self.store.resolve_orders(&request.order_ids)?;
        let stops = resolve_stops(&request.order_ids, records)?;
        let optimization = request.to_request(stops)?;
        let route = self
            .optimizer
            .optimize_with_cancel(&optimization, cancel)
            .inspect_err(|err| {
                log::info!("driver {} could not be routed: {err}", request.driver_id);
            })?;

        if let Err(err) = self.sink.publish(RouteAssignment::from(&route)) {
            log::warn!("route computed but assignment not published: {err}");
        }
        Ok(RoutePlan::from(&route))
    }
}
