//! Driver availability lookup.

use std::collections::BTreeSet;

use crate::DriverId;

/// Decide whether a driver can take a new route.
pub trait DriverRoster: Send + Sync {
    /// Whether `driver` is free to be assigned.
    fn is_available(&self, driver: DriverId) -> bool;
}

/// Roster that accepts every driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyDriver;

impl DriverRoster for AnyDriver {
    fn is_available(&self, _driver: DriverId) -> bool {
        true
    }
}

/// Roster with an explicit set of available drivers.
///
/// # Examples
/// ```
/// use lastmile_core::{DriverId, DriverRoster, FixedRoster};
///
/// let roster = FixedRoster::new([DriverId(2)]);
/// assert!(roster.is_available(DriverId(2)));
/// assert!(!roster.is_available(DriverId(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedRoster {
    available: BTreeSet<DriverId>,
}

impl FixedRoster {
    /// Roster containing exactly `drivers`.
    pub fn new<I>(drivers: I) -> Self
    where
        I: IntoIterator<Item = DriverId>,
    {
        Self {
            available: drivers.into_iter().collect(),
        }
    }
}

impl DriverRoster for FixedRoster {
    fn is_available(&self, driver: DriverId) -> bool {
        self.available.contains(&driver)
    }
}
