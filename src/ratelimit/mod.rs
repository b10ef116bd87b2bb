//! Rate limiting logic and state management.

pub mod history;
pub mod identity;
pub mod limiter;
pub mod policy;
pub mod resolver;
pub mod service;

pub use history::RequestHistory;
pub use identity::{Identity, ADMIN_ROLE, FALLBACK_KEY};
pub use limiter::{AdmitDecision, RateLimiter};
pub use policy::{LimitDimension, Policy, SlidingWindow};
pub use resolver::{Resolution, TierTable, DEFAULT_TIER};
pub use service::RateLimitService;
