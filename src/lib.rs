//! Facade crate for the lastmile route engine.
//!
//! This crate re-exports the core domain types and exposes the optimizer and
//! the HTTP order store behind feature flags.
//!
//! # Examples
//! ```
//! # #[cfg(feature = "optimizer-nn")]
//! # {
//! use lastmile::{
//!     Constraints, Depot, DriverId, Location, NearestNeighbourOptimizer, OptimizationRequest,
//!     OrderId, RouteOptimizer, Stop,
//! };
//!
//! let request = OptimizationRequest::new(
//!     DriverId(1),
//!     Depot::new(Location::new(51.5, -0.1)?),
//!     vec![Stop::new(OrderId(4), Location::new(51.51, -0.12)?)],
//!     Constraints::default(),
//! )?;
//! let route = NearestNeighbourOptimizer::default().optimize(&request)?;
//! assert_eq!(route.order_ids(), vec![OrderId(4)]);
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub use lastmile_core::{
    AnyDriver, AssignmentSink, CancelToken, Constraints, Depot, Diagnostics, DispatchError,
    DispatchRequest, DriverId, DriverRoster, ErrorBody, ErrorKind, InMemoryOrderStore, Location,
    OptimizationError, OptimizationRequest, OrderId, OrderRecord, OrderStore, OrderStoreError,
    Route, RouteOptimizer, RoutePlan, RouteStop, Stop, TimeWindow, Truncation,
};

#[cfg(feature = "optimizer-nn")]
pub use lastmile_solver_nn::{Dispatcher, NearestNeighbourOptimizer, OptimizerConfig};

#[cfg(feature = "order-api")]
pub use lastmile_data::orders::{HttpOrderStore, HttpOrderStoreConfig};
