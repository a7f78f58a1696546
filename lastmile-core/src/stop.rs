//! Delivery stops, their time windows, and the depot a route departs from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Location, OrderId, minutes};

/// Demand assumed for a stop when the order does not state one.
pub const DEFAULT_DEMAND: f64 = 1.0;

/// Errors returned by [`TimeWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    /// `earliest` lies after `latest`.
    #[error("time window opens after it closes")]
    Inverted,
}

/// Permissible arrival interval at a stop.
///
/// Bounds are offsets from the route's departure time. Either bound may be
/// open. Arriving before `earliest` forces a wait; arriving after `latest` is
/// infeasible.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lastmile_core::TimeWindow;
///
/// let window = TimeWindow::new(
///     Some(Duration::from_secs(600)),
///     Some(Duration::from_secs(1200)),
/// )?;
/// assert_eq!(window.wait_for(Duration::from_secs(300)), Duration::from_secs(300));
/// assert!(!window.admits(Duration::from_secs(1500)));
/// # Ok::<(), lastmile_core::TimeWindowError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow", into = "RawTimeWindow")]
pub struct TimeWindow {
    earliest: Option<Duration>,
    latest: Option<Duration>,
}

#[derive(Serialize, Deserialize)]
struct RawTimeWindow {
    #[serde(default, with = "minutes::optional", rename = "earliest_minutes")]
    earliest: Option<Duration>,
    #[serde(default, with = "minutes::optional", rename = "latest_minutes")]
    latest: Option<Duration>,
}

impl TimeWindow {
    /// Validate and construct a window.
    ///
    /// # Errors
    ///
    /// Returns [`TimeWindowError::Inverted`] when both bounds are set and
    /// `earliest > latest`.
    pub fn new(earliest: Option<Duration>, latest: Option<Duration>) -> Result<Self, TimeWindowError> {
        if let (Some(open), Some(close)) = (earliest, latest)
            && open > close
        {
            return Err(TimeWindowError::Inverted);
        }
        Ok(Self { earliest, latest })
    }

    /// A window that closes at `latest`.
    #[must_use]
    pub const fn until(latest: Duration) -> Self {
        Self {
            earliest: None,
            latest: Some(latest),
        }
    }

    /// Earliest permitted arrival, if bounded.
    #[must_use]
    pub const fn earliest(&self) -> Option<Duration> {
        self.earliest
    }

    /// Latest permitted arrival, if bounded.
    #[must_use]
    pub const fn latest(&self) -> Option<Duration> {
        self.latest
    }

    /// Whether arriving at `arrival` is allowed.
    #[must_use]
    pub fn admits(&self, arrival: Duration) -> bool {
        self.latest.is_none_or(|close| arrival <= close)
    }

    /// Forced wait when arriving at `arrival`.
    #[must_use]
    pub fn wait_for(&self, arrival: Duration) -> Duration {
        self.earliest
            .map_or(Duration::ZERO, |open| open.saturating_sub(arrival))
    }
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = TimeWindowError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.earliest, raw.latest)
    }
}

impl From<TimeWindow> for RawTimeWindow {
    fn from(window: TimeWindow) -> Self {
        Self {
            earliest: window.earliest,
            latest: window.latest,
        }
    }
}

/// One delivery to be routed.
///
/// Created from an order record when a request is built and never mutated
/// afterwards.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lastmile_core::{Location, OrderId, Stop};
///
/// let stop = Stop::new(OrderId(42), Location::new(40.71, -74.0)?)
///     .with_demand(3.0)
///     .with_service_time(Duration::from_secs(300));
/// assert_eq!(stop.order_id, OrderId(42));
/// assert_eq!(stop.demand, 3.0);
/// # Ok::<(), lastmile_core::LocationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Order delivered at this stop; unique within a request.
    pub order_id: OrderId,
    /// Delivery location.
    pub location: Location,
    /// Time spent completing the delivery.
    #[serde(default, with = "minutes::required", rename = "service_minutes")]
    pub service_time: Duration,
    /// Optional arrival window.
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    /// Load consumed from the vehicle.
    #[serde(default = "default_demand")]
    pub demand: f64,
}

const fn default_demand() -> f64 {
    DEFAULT_DEMAND
}

impl Stop {
    /// Construct a stop with unit demand, no service time and no window.
    #[must_use]
    pub const fn new(order_id: OrderId, location: Location) -> Self {
        Self {
            order_id,
            location,
            service_time: Duration::ZERO,
            time_window: None,
            demand: DEFAULT_DEMAND,
        }
    }

    /// Set the demand weight.
    #[must_use]
    pub const fn with_demand(mut self, demand: f64) -> Self {
        self.demand = demand;
        self
    }

    /// Set the service time.
    #[must_use]
    pub const fn with_service_time(mut self, service_time: Duration) -> Self {
        self.service_time = service_time;
        self
    }

    /// Attach an arrival window.
    #[must_use]
    pub const fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }
}

/// Fixed start (and, for round trips, end) of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Depot {
    /// Where the driver departs from.
    pub location: Location,
}

impl Depot {
    /// Construct a depot at `location`.
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self { location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn inverted_window_is_rejected() {
        let result = TimeWindow::new(Some(Duration::from_secs(10)), Some(Duration::from_secs(5)));
        assert_eq!(result, Err(TimeWindowError::Inverted));
    }

    #[rstest]
    #[case(Duration::from_secs(100), Duration::from_secs(200))]
    #[case(Duration::from_secs(300), Duration::ZERO)]
    #[case(Duration::from_secs(900), Duration::ZERO)]
    fn wait_covers_early_arrival(#[case] arrival: Duration, #[case] expected: Duration) {
        let window = TimeWindow::new(Some(Duration::from_secs(300)), None).expect("valid window");
        assert_eq!(window.wait_for(arrival), expected);
    }

    #[rstest]
    fn open_window_admits_anything() {
        let window = TimeWindow::default();
        assert!(window.admits(Duration::from_secs(86_400)));
        assert_eq!(window.wait_for(Duration::ZERO), Duration::ZERO);
    }

    #[rstest]
    fn stop_deserialises_with_defaults() {
        let stop: Stop = serde_json::from_str(
            r#"{"order_id": 5, "location": {"lat": 1.0, "lng": 2.0}}"#,
        )
        .expect("stop should decode");
        assert_eq!(stop.order_id, OrderId(5));
        assert_eq!(stop.service_time, Duration::ZERO);
        assert!(stop.time_window.is_none());
        assert!((stop.demand - DEFAULT_DEMAND).abs() < f64::EPSILON);
    }

    #[rstest]
    fn window_deserialises_from_minutes() {
        let window: TimeWindow =
            serde_json::from_str(r#"{"earliest_minutes": 10, "latest_minutes": 30}"#)
                .expect("window should decode");
        assert_eq!(window.earliest(), Some(Duration::from_secs(600)));
        assert_eq!(window.latest(), Some(Duration::from_secs(1800)));
    }

    #[rstest]
    fn inverted_window_fails_to_deserialise() {
        let result =
            serde_json::from_str::<TimeWindow>(r#"{"earliest_minutes": 30, "latest_minutes": 10}"#);
        assert!(result.is_err());
    }
}
