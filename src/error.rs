//! Error types for the Tollgate library.

use thiserror::Error;

use crate::ratelimit::policy::LimitDimension;

/// Main error type for Tollgate operations.
#[derive(Error, Debug)]
pub enum TollgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tollgate operations.
pub type Result<T> = std::result::Result<T, TollgateError>;

/// Rejection returned to the caller when a request exceeds its tier's policy.
///
/// This is the only error a rate limit evaluation can produce. Retry and
/// backoff are the caller's responsibility.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RateLimitError {
    /// Name of the tier whose policy rejected the request
    pub tier: String,
    /// The first violated limit dimension
    pub dimension: LimitDimension,
    /// Human-readable message for the end user
    pub message: String,
}

impl RateLimitError {
    /// Build a rejection for the given tier and dimension.
    ///
    /// Callers on the highest-precedence tier are told to wait; everyone
    /// else is also offered an upgrade path.
    pub fn new(tier: &str, dimension: LimitDimension, top_tier: bool) -> Self {
        let message = if top_tier {
            format!(
                "Rate limit exceeded for tier '{}' on the {}. Please wait and try again later.",
                tier, dimension
            )
        } else {
            format!(
                "Rate limit exceeded for tier '{}' on the {}. Upgrade to a higher tier or try again later.",
                tier, dimension
            )
        };

        Self {
            tier: tier.to_string(),
            dimension,
            message,
        }
    }
}
