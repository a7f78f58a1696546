//! WGS84 locations and the great-circle cost model.
//!
//! Travel cost between two [`Location`] values is the haversine distance in
//! metres. The metric is symmetric, zero on identical points and respects the
//! triangle inequality.

use geo::{Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`Location::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LocationError {
    /// Latitude was not finite or fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was not finite or fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// An immutable latitude/longitude pair in decimal degrees.
///
/// Deserialisation goes through [`Location::new`], so malformed coordinates are
/// rejected at the boundary.
///
/// # Examples
/// ```
/// use lastmile_core::Location;
///
/// let warehouse = Location::new(40.7128, -74.0060)?;
/// assert_eq!(warehouse.lat(), 40.7128);
/// assert!(Location::new(91.0, 0.0).is_err());
/// # Ok::<(), lastmile_core::LocationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLng", into = "LatLng")]
pub struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl Location {
    /// Validate and construct a location.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] when either coordinate is non-finite or out of
    /// range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, LocationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(LocationError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Coordinate with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// # Examples
    /// ```
    /// use lastmile_core::Location;
    ///
    /// let a = Location::new(0.0, 0.0)?;
    /// let b = Location::new(0.0, 1.0)?;
    /// assert_eq!(a.distance_to(&a), 0.0);
    /// assert_eq!(a.distance_to(&b), b.distance_to(&a));
    /// # Ok::<(), lastmile_core::LocationError>(())
    /// ```
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        Haversine.distance(Point::from(self.coord()), Point::from(other.coord()))
    }
}

impl TryFrom<LatLng> for Location {
    type Error = LocationError;

    fn try_from(value: LatLng) -> Result<Self, Self::Error> {
        Self::new(value.lat, value.lng)
    }
}

impl From<Location> for LatLng {
    fn from(value: Location) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}
