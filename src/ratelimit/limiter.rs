//! Core rate limiter engine.

use dashmap::DashMap;
use std::time::Instant;
use tracing::{debug, trace};

use super::history::RequestHistory;
use super::policy::{LimitDimension, Policy};

/// Decision produced by an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitDecision {
    /// The request is within every configured threshold and was recorded
    Allow,
    /// The request exceeds the given dimension and was not recorded
    Reject(LimitDimension),
}

impl AdmitDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, AdmitDecision::Allow)
    }

    /// Check if this decision is Reject.
    pub fn is_reject(&self) -> bool {
        matches!(self, AdmitDecision::Reject(_))
    }
}

/// The rate limiter engine, owning every identity's request history.
///
/// Construct one instance at startup and share it; histories are created on
/// an identity's first request and the keys are kept for the lifetime of the
/// engine. Stale timestamps are pruned lazily on each admission check, but
/// idle identity keys are never evicted, so the map grows with the number of
/// distinct identities seen.
///
/// This struct is thread-safe. Admission for a single identity is serialized
/// under that identity's map entry; requests from different identities
/// proceed in parallel.
pub struct RateLimiter {
    /// Request histories indexed by identity key
    histories: DashMap<String, RequestHistory>,
}

impl RateLimiter {
    /// Create a new rate limiter with no tracked identities.
    pub fn new() -> Self {
        Self {
            histories: DashMap::new(),
        }
    }

    /// Check whether a request from `identity` is admissible under `policy`
    /// at time `now`, recording it when it is.
    ///
    /// Pruning, evaluation, and recording happen atomically with respect to
    /// other requests from the same identity. Thresholds reject when the
    /// count of already-recorded requests in the window reaches the limit,
    /// so the N-th request under a limit of N is the first one rejected.
    ///
    /// Dimensions are evaluated in fixed order (minute, hour, sliding
    /// window); the first violation is reported. A decision is always
    /// produced.
    pub fn admit(&self, identity: &str, policy: &Policy, now: Instant) -> AdmitDecision {
        trace!(identity = %identity, "Checking admission");

        let mut entry = self
            .histories
            .entry(identity.to_string())
            .or_insert_with(|| {
                debug!(identity = %identity, "Creating request history");
                RequestHistory::new()
            });
        let history = entry.value_mut();

        history.prune(policy, now);

        if let Some(dimension) = Self::violated(policy, history, now) {
            debug!(
                identity = %identity,
                dimension = %dimension,
                "Rate limit exceeded"
            );
            return AdmitDecision::Reject(dimension);
        }

        history.record(now);
        AdmitDecision::Allow
    }

    /// Find the first violated dimension, if any.
    fn violated(policy: &Policy, history: &RequestHistory, now: Instant) -> Option<LimitDimension> {
        if let Some(limit) = policy.requests_per_minute {
            let dimension = LimitDimension::Minute;
            if history.count_within(dimension.window(), now) >= limit as usize {
                return Some(dimension);
            }
        }

        if let Some(limit) = policy.requests_per_hour {
            let dimension = LimitDimension::Hour;
            if history.count_within(dimension.window(), now) >= limit as usize {
                return Some(dimension);
            }
        }

        if let Some(window) = policy.sliding_window {
            let dimension = window.dimension();
            if history.count_within(dimension.window(), now) >= window.limit as usize {
                return Some(dimension);
            }
        }

        None
    }

    /// Number of identities with a history entry.
    pub fn tracked_identities(&self) -> usize {
        self.histories.len()
    }

    /// Number of retained timestamps for an identity.
    ///
    /// Returns `None` if the identity has never been admitted.
    pub fn history_len(&self, identity: &str) -> Option<usize> {
        self.histories.get(identity).map(|h| h.len())
    }

    /// Drop all histories.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.histories.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
