use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::join_ids;
use crate::{OrderId, RequestValidationError};

/// Constraint that made the remaining stops unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolatedConstraint {
    /// Every remaining stop's window had already closed.
    TimeWindow,
    /// Serving any remaining stop would exceed the maximum route duration.
    MaxRouteDuration,
}

impl fmt::Display for ViolatedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TimeWindow => "time window",
            Self::MaxRouteDuration => "maximum route duration",
        })
    }
}

/// Errors returned by [`crate::RouteOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizationError {
    /// The request breaks a validation invariant.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    /// Remaining stops cannot be reached within their constraints.
    #[error("{constraint} cannot be met for orders {}", join_ids(.orders))]
    ConstraintViolation {
        /// Constraint that failed.
        constraint: ViolatedConstraint,
        /// Orders left unrouted.
        orders: Vec<OrderId>,
    },
    /// Demand exceeds the vehicle's remaining capacity.
    #[error("capacity exceeded for orders {} with {remaining} remaining", join_ids(.orders))]
    CapacityExceeded {
        /// Orders that do not fit.
        orders: Vec<OrderId>,
        /// Capacity left when the failure was detected.
        remaining: f64,
    },
    /// The wall-clock budget ran out before a complete route existed.
    #[error("no complete route within {elapsed:?}")]
    Timeout {
        /// Time spent before giving up.
        elapsed: Duration,
    },
}

impl OptimizationError {
    /// Coarse classification for callers mapping errors to statuses.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// Tag attached to every error crossing the service boundary.
///
/// # Examples
/// ```
/// use lastmile_core::ErrorKind;
///
/// assert_eq!(ErrorKind::CapacityExceeded.http_status(), 422);
/// assert_eq!(ErrorKind::Timeout.as_str(), "timeout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or unresolvable input.
    InvalidRequest,
    /// Time windows or route duration cannot be satisfied.
    ConstraintViolation,
    /// Demand exceeds vehicle capacity.
    CapacityExceeded,
    /// The search ran out of time.
    Timeout,
    /// A collaborator could not be reached.
    UpstreamUnavailable,
}

impl ErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::ConstraintViolation => "constraint_violation",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::Timeout => "timeout",
            Self::UpstreamUnavailable => "upstream_unavailable",
        }
    }

    /// HTTP status a gateway should answer with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::ConstraintViolation | Self::CapacityExceeded => 422,
            Self::UpstreamUnavailable => 503,
            Self::Timeout => 504,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::InvalidRequest, 400)]
    #[case(ErrorKind::ConstraintViolation, 422)]
    #[case(ErrorKind::CapacityExceeded, 422)]
    #[case(ErrorKind::Timeout, 504)]
    #[case(ErrorKind::UpstreamUnavailable, 503)]
    fn kinds_map_to_statuses(#[case] kind: ErrorKind, #[case] status: u16) {
        assert_eq!(kind.http_status(), status);
    }

    #[rstest]
    fn serde_name_matches_as_str() {
        for kind in [
            ErrorKind::InvalidRequest,
            ErrorKind::ConstraintViolation,
            ErrorKind::CapacityExceeded,
            ErrorKind::Timeout,
            ErrorKind::UpstreamUnavailable,
        ] {
            let json = serde_json::to_value(kind).expect("serialise");
            assert_eq!(json, serde_json::Value::from(kind.as_str()));
        }
    }

    #[rstest]
    fn capacity_message_lists_orders() {
        let err = OptimizationError::CapacityExceeded {
            orders: vec![OrderId(4), OrderId(9)],
            remaining: 2.0,
        };
        assert_eq!(err.to_string(), "capacity exceeded for orders 4, 9 with 2 remaining");
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    }

    #[rstest]
    fn validation_errors_are_invalid_requests() {
        let err = OptimizationError::from(RequestValidationError::EmptyStops);
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
