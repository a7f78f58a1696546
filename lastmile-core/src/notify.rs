//! Route assignment notifications.
//!
//! Once a route is computed the dispatcher emits a [`RouteAssignment`] message
//! through an [`AssignmentSink`]. Delivery is decoupled from optimisation: a
//! failed publish never invalidates the computed route.

use std::sync::mpsc::Sender;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DriverId, OrderId, Route, ids::join_ids};

/// Message announcing a driver's new route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAssignment {
    /// Driver receiving the route.
    pub driver_id: DriverId,
    /// Orders in visiting order.
    pub order_ids: Vec<OrderId>,
    /// Total distance in metres.
    pub total_distance_m: f64,
    /// Total route duration.
    pub total_duration: Duration,
}

impl From<&Route> for RouteAssignment {
    fn from(route: &Route) -> Self {
        Self {
            driver_id: route.driver_id,
            order_ids: route.order_ids(),
            total_distance_m: route.total_distance_m,
            total_duration: route.total_duration,
        }
    }
}

/// Errors from [`AssignmentSink::publish`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// Nobody is listening any more.
    #[error("assignment receiver for driver {0} has disconnected")]
    Disconnected(DriverId),
}

/// Destination for route assignments.
pub trait AssignmentSink: Send + Sync {
    /// Emit `assignment`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be delivered.
    fn publish(&self, assignment: RouteAssignment) -> Result<(), NotifyError>;
}

/// Sink forwarding assignments over an `mpsc` channel.
///
/// # Examples
/// ```
/// use std::sync::mpsc;
/// use std::time::Duration;
/// use lastmile_core::{AssignmentSink, ChannelAssignmentSink, DriverId, RouteAssignment};
///
/// let (tx, rx) = mpsc::channel();
/// let sink = ChannelAssignmentSink::new(tx);
/// let assignment = RouteAssignment {
///     driver_id: DriverId(2),
///     order_ids: Vec::new(),
///     total_distance_m: 0.0,
///     total_duration: Duration::ZERO,
/// };
/// sink.publish(assignment.clone())?;
/// assert_eq!(rx.recv().ok(), Some(assignment));
/// # Ok::<(), lastmile_core::NotifyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChannelAssignmentSink {
    sender: Sender<RouteAssignment>,
}

impl ChannelAssignmentSink {
    /// Wrap `sender`.
    #[must_use]
    pub const fn new(sender: Sender<RouteAssignment>) -> Self {
        Self { sender }
    }
}

impl AssignmentSink for ChannelAssignmentSink {
    fn publish(&self, assignment: RouteAssignment) -> Result<(), NotifyError> {
        let driver = assignment.driver_id;
        self.sender
            .send(assignment)
            .map_err(|_| NotifyError::Disconnected(driver))
    }
}

/// Sink that records assignments in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAssignmentSink;

impl AssignmentSink for LogAssignmentSink {
    fn publish(&self, assignment: RouteAssignment) -> Result<(), NotifyError> {
        log::info!(
            "driver {} assigned orders [{}] ({:.0} m)",
            assignment.driver_id,
            join_ids(&assignment.order_ids),
            assignment.total_distance_m
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::sync::mpsc;

    #[fixture]
    fn assignment() -> RouteAssignment {
        RouteAssignment {
            driver_id: DriverId(4),
            order_ids: vec![OrderId(2), OrderId(1)],
            total_distance_m: 1500.0,
            total_duration: Duration::from_secs(180),
        }
    }

    #[rstest]
    fn dropped_receiver_reports_disconnect(assignment: RouteAssignment) {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let sink = ChannelAssignmentSink::new(tx);
        assert_eq!(
            sink.publish(assignment),
            Err(NotifyError::Disconnected(DriverId(4)))
        );
    }

    #[rstest]
    fn log_sink_always_succeeds(assignment: RouteAssignment) {
        assert!(LogAssignmentSink.publish(assignment).is_ok());
    }
}
