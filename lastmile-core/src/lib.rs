//! Core domain types for the lastmile route engine.
//!
//! Locations, stops and requests validate on construction so that invalid
//! input surfaces before any search runs. The crate also defines the seams the
//! engine talks through: [`RouteOptimizer`] for the search itself,
//! [`OrderStore`] and [`DriverRoster`] for the order-management platform, and
//! [`AssignmentSink`] for notifying drivers of new routes.

mod dispatch;
mod ids;
mod location;
mod minutes;
mod notify;
mod optimizer;
mod order_store;
mod request;
mod roster;
mod route;
mod stop;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dispatch::{
    DispatchConstraints, DispatchError, DispatchRequest, ErrorBody, PlannedStop, RoutePlan,
};
pub use ids::{DriverId, OrderId};
pub use location::{Location, LocationError};
pub use notify::{
    AssignmentSink, ChannelAssignmentSink, LogAssignmentSink, NotifyError, RouteAssignment,
};
pub use optimizer::{
    CancelToken, ErrorKind, OptimizationError, RouteOptimizer, ViolatedConstraint,
};
pub use order_store::{
    InMemoryOrderStore, OrderRecord, OrderStatus, OrderStore, OrderStoreError, resolve_stops,
};
pub use request::{
    Constraints, DEFAULT_AVERAGE_SPEED_KMH, OptimizationRequest, RequestValidationError,
};
pub use roster::{AnyDriver, DriverRoster, FixedRoster};
pub use route::{Diagnostics, Route, RouteStop, Truncation};
pub use stop::{DEFAULT_DEMAND, Depot, Stop, TimeWindow, TimeWindowError};
