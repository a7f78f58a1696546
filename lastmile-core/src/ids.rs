//! Identifier newtypes for orders and drivers.
//!
//! Both serialise transparently as integers, matching the platform's JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a customer order.
///
/// Ordering is numeric and is used to break cost ties deterministically.
///
/// # Examples
/// ```
/// use lastmile_core::OrderId;
///
/// assert!(OrderId(1) < OrderId(3));
/// assert_eq!(OrderId(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

/// Unique identifier of a delivery driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for DriverId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Comma-separated rendering of order identifiers for error messages.
pub(crate) fn join_ids(ids: &[OrderId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
