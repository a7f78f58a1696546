//! Test-only helpers shared by unit, behaviour and property tests.

use std::sync::{Mutex, PoisonError};

use crate::{
    AssignmentSink, Constraints, Depot, DriverId, Location, NotifyError, OptimizationRequest,
    OrderId, OrderRecord, OrderStore, OrderStoreError, RouteAssignment, Stop,
};

/// Location at `(lat, lng)`; panics on out-of-range input.
#[must_use]
pub fn location(lat: f64, lng: f64) -> Location {
    Location::new(lat, lng).unwrap_or_else(|err| panic!("invalid test location: {err}"))
}

/// Unit-demand stop for order `id` at `(lat, lng)`.
#[must_use]
pub fn stop_at(id: u64, lat: f64, lng: f64) -> Stop {
    Stop::new(OrderId(id), location(lat, lng))
}

/// Validated request from the origin for driver 1.
#[must_use]
pub fn request_from_origin(stops: Vec<Stop>, constraints: Constraints) -> OptimizationRequest {
    OptimizationRequest::new(DriverId(1), Depot::new(location(0.0, 0.0)), stops, constraints)
        .unwrap_or_else(|err| panic!("invalid test request: {err}"))
}

/// Sink that keeps every published assignment.
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Mutex<Vec<RouteAssignment>>,
}

impl RecordingSink {
    /// Assignments published so far.
    #[must_use]
    pub fn published(&self) -> Vec<RouteAssignment> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AssignmentSink for RecordingSink {
    fn publish(&self, assignment: RouteAssignment) -> Result<(), NotifyError> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(assignment);
        Ok(())
    }
}

/// Sink whose receiver is always gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedSink;

impl AssignmentSink for DisconnectedSink {
    fn publish(&self, assignment: RouteAssignment) -> Result<(), NotifyError> {
        Err(NotifyError::Disconnected(assignment.driver_id))
    }
}

/// Order store that fails every lookup with a network error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableOrderStore;

impl OrderStore for UnreachableOrderStore {
    fn resolve_orders(&self, _ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        Err(OrderStoreError::NetworkError {
            url: "http://orders.invalid/api/orders".to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}
