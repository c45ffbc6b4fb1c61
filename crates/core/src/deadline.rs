use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Default safety margin: stop computing when less than this remains.
/// Serverless hosts kill the whole invocation at the hard deadline; a
/// short-but-valid partial series beats an opaque 5xx.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(1500);

/// A wall-clock execution budget, polled cooperatively by CPU-bound
/// loops that have no natural suspension points.
///
/// Constructed once per request from the host's remaining budget and
/// passed down explicitly — a first-class cancellation signal rather
/// than ad hoc remaining-time polling against the host API.
#[derive(Debug)]
pub struct Deadline {
    expires_at: Option<Instant>,
    safety_margin: Duration,
    /// When set, `is_expired` reports expiry after this many polls
    /// instead of consulting the clock
    check_allowance: Option<AtomicUsize>,
}

impl Deadline {
    /// A deadline `budget` from now, with the default safety margin.
    pub fn with_budget(budget: Duration) -> Self {
        Self::with_budget_and_margin(budget, DEFAULT_SAFETY_MARGIN)
    }

    pub fn with_budget_and_margin(budget: Duration, safety_margin: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
            safety_margin,
            check_allowance: None,
        }
    }

    /// No budget — never expires. For tests and offline callers.
    pub fn none() -> Self {
        Self {
            expires_at: None,
            safety_margin: Duration::ZERO,
            check_allowance: None,
        }
    }

    /// An already-expired deadline. Test hook for the truncation path.
    pub fn expired_now() -> Self {
        Self {
            expires_at: Some(Instant::now()),
            safety_margin: Duration::ZERO,
            check_allowance: None,
        }
    }

    /// A deadline that expires after `checks` polls of
    /// [`is_expired`](Self::is_expired), independent of wall time.
    /// Test hook for exercising mid-computation truncation
    /// deterministically.
    pub fn expiring_after_checks(checks: usize) -> Self {
        Self {
            expires_at: None,
            safety_margin: Duration::ZERO,
            check_allowance: Some(AtomicUsize::new(checks)),
        }
    }

    /// Time left before the safety margin is eaten into, zero if none.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// True once less than the safety margin remains. Work should stop
    /// and return whatever has been accumulated.
    pub fn is_expired(&self) -> bool {
        if let Some(allowance) = &self.check_allowance {
            return allowance
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err();
        }
        match self.expires_at {
            Some(at) => at.saturating_duration_since(Instant::now()) <= self.safety_margin,
            None => false,
        }
    }
}
