//! Serde adapters encoding [`Duration`] values as fractional minutes.
//!
//! The platform exchanges durations in minutes; internally the engine keeps
//! `std::time::Duration`. Negative or non-finite minute values are rejected.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer, de::Error};

#[expect(
    clippy::float_arithmetic,
    reason = "minute conversion is inherently fractional"
)]
pub(crate) fn to_minutes(duration: Duration) -> f64 {
    duration.as_secs_f64() / 60.0
}

#[expect(
    clippy::float_arithmetic,
    reason = "minute conversion is inherently fractional"
)]
pub(crate) fn from_minutes(minutes: f64) -> Option<Duration> {
    if !minutes.is_finite() || minutes < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(minutes * 60.0).ok()
}

/// Required durations.
pub(crate) mod required {
    use super::{Deserialize, Deserializer, Duration, Error, Serializer, from_minutes, to_minutes};

    pub(crate) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_minutes(*value))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = f64::deserialize(deserializer)?;
        from_minutes(minutes)
            .ok_or_else(|| D::Error::custom(format!("invalid minute value {minutes}")))
    }
}

/// Optional durations; pair with `#[serde(default)]`.
pub(crate) mod optional {
    use super::{Deserialize, Deserializer, Duration, Error, Serializer, from_minutes, to_minutes};

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&to_minutes(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|minutes| {
                from_minutes(minutes)
                    .ok_or_else(|| D::Error::custom(format!("invalid minute value {minutes}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn converts_whole_minutes() {
        assert_eq!(from_minutes(2.5), Some(Duration::from_secs(150)));
        assert!((to_minutes(Duration::from_secs(90)) - 1.5).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_minutes(#[case] minutes: f64) {
        assert!(from_minutes(minutes).is_none());
    }
}
