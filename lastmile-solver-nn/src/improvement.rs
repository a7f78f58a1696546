//! Local improvement over a constructed visiting order.
//!
//! Each iteration scans segment reversals (2-opt), pairwise swaps and
//! single-stop relocations in a fixed order and applies the feasible move
//! that shortens the route the most. Only strict improvements are taken, so
//! the loop terminates; it also stops at the iteration cap or when the cancel
//! token fires, in which case the result is marked truncated. A route that
//! reaches the cap with no improving move left counts as converged; a cap of
//! zero never searches, so it is always truncated.

use lastmile_core::{CancelToken, Truncation};

use crate::problem::{Problem, strictly_less};
use crate::schedule::evaluate;

/// A rearrangement of the visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Reverse positions `from..=to`.
    Reverse { from: usize, to: usize },
    /// Exchange the stops at two positions.
    Swap { first: usize, second: usize },
    /// Take the stop at `from` and reinsert it at `to`.
    Relocate { from: usize, to: usize },
}

impl Move {
    pub(crate) fn apply(self, order: &[usize]) -> Vec<usize> {
        let mut next = order.to_vec();
        match self {
            Self::Reverse { from, to } => {
                if let Some(segment) = next.get_mut(from..=to) {
                    segment.reverse();
                }
            }
            Self::Swap { first, second } => next.swap(first, second),
            Self::Relocate { from, to } => {
                let stop = next.remove(from);
                next.insert(to, stop);
            }
        }
        next
    }
}

/// Every move for a route of `len` stops, in scan order.
fn moves(len: usize) -> impl Iterator<Item = Move> {
    let reversals = (0..len)
        .flat_map(move |from| (from + 1..len).map(move |to| Move::Reverse { from, to }));
    let swaps = (0..len).flat_map(move |first| {
        (first + 2..len).map(move |second| Move::Swap { first, second })
    });
    let relocations = (0..len).flat_map(move |from| {
        (0..len)
            .filter(move |&to| to != from)
            .map(move |to| Move::Relocate { from, to })
    });
    reversals.chain(swaps).chain(relocations)
}

/// Result of the improvement phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Improvement {
    pub(crate) order: Vec<usize>,
    pub(crate) iterations: usize,
    pub(crate) truncation: Option<Truncation>,
}

/// Best strictly improving feasible neighbour of `order`, if any.
fn best_neighbour(problem: &Problem<'_>, order: &[usize]) -> Option<(Move, Vec<usize>)> {
    let mut best_distance = problem.route_distance(order);
    let mut best = None;
    for candidate_move in moves(order.len()) {
        let candidate = candidate_move.apply(order);
        let distance = problem.route_distance(&candidate);
        if strictly_less(distance, best_distance) && evaluate(problem, &candidate).is_ok() {
            best_distance = distance;
            best = Some((candidate_move, candidate));
        }
    }
    best
}

/// Improve `order` until convergence, the iteration cap, or cancellation.
pub(crate) fn improve(
    problem: &Problem<'_>,
    mut order: Vec<usize>,
    max_iterations: usize,
    cancel: &CancelToken,
) -> Improvement {
    let mut iterations = 0;
    let truncation = loop {
        if iterations >= max_iterations {
            let converged = max_iterations > 0 && best_neighbour(problem, &order).is_none();
            break (!converged).then_some(Truncation::IterationCap);
        }
        if let Some(reason) = cancel.check() {
            break Some(reason);
        }
        let Some((applied, next)) = best_neighbour(problem, &order) else {
            break None;
        };
        log::trace!("improvement iteration {iterations}: applied {applied:?}");
        order = next;
        iterations += 1;
    };
    Improvement {
        order,
        iterations,
        truncation,
    }
}
