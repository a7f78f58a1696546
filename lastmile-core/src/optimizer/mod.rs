//! The route optimizer contract.
//!
//! An optimizer turns a validated [`OptimizationRequest`] into a [`Route`].
//! Implementations are pure functions of their input: no I/O and no shared
//! mutable state, so independent requests may be optimised concurrently.
//!
//! Long searches poll a [`CancelToken`] and return the best route found so far,
//! flagged as truncated, once it fires.

mod cancel;
mod error;

pub use cancel::CancelToken;
pub use error::{ErrorKind, OptimizationError, ViolatedConstraint};

use crate::{OptimizationRequest, Route};

/// Compute a route for one driver.
///
/// Implementations must fail fast with [`OptimizationError::InvalidRequest`]
/// when handed a request that breaks its invariants, rather than repairing it.
/// Optimizers must be `Send + Sync` to be shared across worker threads.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lastmile_core::{
///     CancelToken, Diagnostics, OptimizationError, OptimizationRequest, Route,
///     RouteOptimizer,
/// };
///
/// struct EmptyRoutes;
///
/// impl RouteOptimizer for EmptyRoutes {
///     fn optimize_with_cancel(
///         &self,
///         request: &OptimizationRequest,
///         _cancel: &CancelToken,
///     ) -> Result<Route, OptimizationError> {
///         request.validate()?;
///         Ok(Route {
///             driver_id: request.driver_id,
///             depot: request.depot,
///             stops: Vec::new(),
///             total_distance_m: 0.0,
///             total_duration: Duration::ZERO,
///             truncated: false,
///             truncation: None,
///             diagnostics: Diagnostics::default(),
///         })
///     }
/// }
/// ```
pub trait RouteOptimizer: Send + Sync {
    /// Optimise without an external stop signal.
    ///
    /// # Errors
    ///
    /// See [`RouteOptimizer::optimize_with_cancel`].
    fn optimize(&self, request: &OptimizationRequest) -> Result<Route, OptimizationError> {
        self.optimize_with_cancel(request, &CancelToken::new())
    }

    /// Optimise, stopping early when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimizationError`] when the request is invalid or
    /// infeasible, or when the token fires before any complete route exists.
    fn optimize_with_cancel(
        &self,
        request: &OptimizationRequest,
        cancel: &CancelToken,
    ) -> Result<Route, OptimizationError>;
}
