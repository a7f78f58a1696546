//! Test-only utilities for `lastmile-solver-nn`.
//!
//! Available to unit tests and, through the `test-support` feature, to
//! dependent crates that need a known optimisation outcome.

use lastmile_core::Stop;
use lastmile_core::test_support::stop_at;

/// Stops 1 and 2 one and two degrees east of the origin, stop 3 one degree
/// west.
///
/// Greedy construction visits them as 1, 2, 3 (five degrees); relocating
/// stop 3 to the front shortens the open route to four degrees.
///
/// # Examples
/// ```rust
/// use lastmile_solver_nn::test_support::detour_stops;
///
/// assert_eq!(detour_stops().len(), 3);
/// ```
#[must_use]
pub fn detour_stops() -> Vec<Stop> {
    vec![stop_at(1, 0.0, 1.0), stop_at(2, 0.0, 2.0), stop_at(3, 0.0, -1.0)]
}

/// Length of one degree of longitude on the equator, in metres.
#[must_use]
pub fn one_degree_m() -> f64 {
    stop_at(0, 0.0, 0.0)
        .location
        .distance_to(&stop_at(0, 0.0, 1.0).location)
}
