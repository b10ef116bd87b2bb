//! Per-identity request timestamp history.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::policy::Policy;

/// The recorded request timestamps for a single identity.
///
/// Timestamps are appended in arrival order and are therefore
/// non-decreasing. Stale entries are removed lazily by [`prune`]; the
/// history itself is never discarded once created.
///
/// [`prune`]: RequestHistory::prune
#[derive(Debug, Default)]
pub struct RequestHistory {
    timestamps: VecDeque<Instant>,
}

impl RequestHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove timestamps that fall outside every window the policy
    /// configures.
    ///
    /// For a policy with no thresholds there is no window to measure
    /// against, so nothing is pruned and recorded entries accumulate. This
    /// growth is a documented characteristic of unlimited policies, not a
    /// defect.
    ///
    /// Pruning is idempotent: a second call with the same `now` is a no-op.
    pub fn prune(&mut self, policy: &Policy, now: Instant) {
        if policy.is_unlimited() {
            return;
        }

        // Entries are in time order, so the stale ones form a prefix.
        while let Some(&oldest) = self.timestamps.front() {
            if policy.retains(now.saturating_duration_since(oldest)) {
                break;
            }
            self.timestamps.pop_front();
        }
    }

    /// Count the requests seen within the trailing `window` ending at `now`.
    pub fn count_within(&self, window: Duration, now: Instant) -> usize {
        self.timestamps
            .iter()
            .rev()
            .take_while(|&&t| now.saturating_duration_since(t) < window)
            .count()
    }

    /// Append a request at `now`. Callers must pass non-decreasing
    /// timestamps.
    pub fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    /// Number of retained timestamps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether no timestamps are retained.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
