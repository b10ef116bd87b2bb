//! Caller-facing request evaluation service.

use std::time::Instant;
use tracing::{debug, info};

use crate::error::RateLimitError;

use super::identity::Identity;
use super::limiter::{AdmitDecision, RateLimiter};
use super::resolver::{Resolution, TierTable};

/// Evaluates incoming requests against the tier table and the limiter.
///
/// One instance is constructed at startup with a validated [`TierTable`] and
/// owns the limiter state for its lifetime. The hosting layer calls
/// [`evaluate_request`] once per request and passes the body through
/// untouched.
///
/// [`evaluate_request`]: RateLimitService::evaluate_request
pub struct RateLimitService {
    table: TierTable,
    limiter: RateLimiter,
}

impl RateLimitService {
    /// Create a service with the given tier table and an empty limiter.
    pub fn new(table: TierTable) -> Self {
        Self {
            table,
            limiter: RateLimiter::new(),
        }
    }

    /// Decide whether the request may proceed.
    ///
    /// Administrators are accepted without touching the limiter and leave no
    /// trace in any history. Everyone else is admitted against their
    /// resolved tier policy; accepted requests are recorded, rejected ones
    /// surface a [`RateLimitError`] with tier-appropriate messaging. All
    /// window checks for one call share a single clock snapshot.
    pub fn evaluate_request<B>(&self, identity: &Identity, body: B) -> Result<B, RateLimitError> {
        let (tier, policy, top_tier) = match self.table.resolve(identity) {
            Resolution::Bypass => {
                debug!(identity = %identity.key(), "Request accepted without limiting");
                return Ok(body);
            }
            Resolution::Limited {
                tier,
                policy,
                top_tier,
            } => (tier, policy, top_tier),
        };

        let now = Instant::now();
        match self.limiter.admit(identity.key(), policy, now) {
            AdmitDecision::Allow => {
                info!(identity = %identity.key(), tier = %tier, "Request accepted");
                Ok(body)
            }
            AdmitDecision::Reject(dimension) => {
                info!(
                    identity = %identity.key(),
                    tier = %tier,
                    dimension = %dimension,
                    "Request rejected"
                );
                Err(RateLimitError::new(tier, dimension, top_tier))
            }
        }
    }

    /// The limiter backing this service.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The tier table backing this service.
    pub fn table(&self) -> &TierTable {
        &self.table
    }
}
