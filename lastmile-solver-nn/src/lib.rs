//! Nearest-neighbour route optimizer for `lastmile`.
//!
//! This crate provides [`NearestNeighbourOptimizer`], the default
//! implementation of the [`RouteOptimizer`](lastmile_core::RouteOptimizer)
//! trait. A route is built greedily from the depot, always driving to the
//! cheapest feasible stop, and then shortened by local search (segment
//! reversal, swaps and relocation) until no move helps, the iteration cap is
//! hit or the time budget runs out.
//!
//! Distances are great-circle metres; travel time follows from the request's
//! average speed. [`Dispatcher`] composes the optimizer with an order store,
//! a driver roster and an assignment sink.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod construction;
mod dispatch;
mod improvement;
mod optimizer;
mod problem;
mod schedule;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use dispatch::Dispatcher;
pub use optimizer::{DEFAULT_MAX_IMPROVEMENT_ITERATIONS, NearestNeighbourOptimizer, OptimizerConfig};
