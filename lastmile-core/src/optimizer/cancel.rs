//! Cooperative cancellation for long-running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::Truncation;

/// Shared stop signal with an optional wall-clock deadline.
///
/// Clones share the same flag, so one thread may cancel a search running on
/// another. Optimizers poll [`CancelToken::check`] between iterations.
///
/// # Examples
/// ```
/// use lastmile_core::{CancelToken, Truncation};
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert_eq!(token.check(), None);
/// handle.cancel();
/// assert_eq!(token.check(), Some(Truncation::Cancelled));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires unless cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once `deadline` passes.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fire once `budget` has elapsed from now, or at the existing deadline
    /// if that comes first.
    ///
    /// Budgets too large to represent leave the deadline unchanged.
    #[must_use]
    pub fn with_budget(self, budget: Duration) -> Self {
        let Some(candidate) = Instant::now().checked_add(budget) else {
            return self;
        };
        let deadline = self
            .deadline
            .map_or(candidate, |existing| existing.min(candidate));
        self.with_deadline(deadline)
    }

    /// Raise the cancel flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether [`CancelToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Configured deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reason to stop now, if any. Cancellation wins over the deadline.
    #[must_use]
    pub fn check(&self) -> Option<Truncation> {
        if self.is_cancelled() {
            return Some(Truncation::Cancelled);
        }
        self.deadline
            .filter(|deadline| Instant::now() >= *deadline)
            .map(|_| Truncation::Deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn elapsed_deadline_fires() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert_eq!(token.check(), Some(Truncation::Deadline));
    }

    #[rstest]
    fn distant_deadline_does_not_fire() {
        let token = CancelToken::new().with_budget(Duration::from_secs(3600));
        assert_eq!(token.check(), None);
        assert!(token.deadline().is_some());
    }

    #[rstest]
    fn budget_keeps_an_earlier_deadline() {
        let soon = Instant::now();
        let token = CancelToken::new()
            .with_deadline(soon)
            .with_budget(Duration::from_secs(3600));
        assert_eq!(token.deadline(), Some(soon));
    }

    #[rstest]
    fn cancellation_takes_precedence() {
        let token = CancelToken::new().with_deadline(Instant::now());
        token.cancel();
        assert_eq!(token.check(), Some(Truncation::Cancelled));
    }

    #[rstest]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        std::thread::spawn(move || clone.cancel())
            .join()
            .expect("cancel thread");
        assert!(token.is_cancelled());
    }
}
