//! Data access adapters for the `lastmile` route optimizer.
//!
//! Responsibilities:
//! - Implement the collaborator traits of `lastmile-core` over real systems.
//! - Encapsulate wire formats of the order-management platform.
//!
//! Boundaries:
//! - Do not encode routing rules (they live in `lastmile-core` and the
//!   optimizer crates).
//! - Keep blocking I/O off async executors; bridge through an owned runtime.
//!
//! Invariants:
//! - No global mutable state.

pub mod orders;
