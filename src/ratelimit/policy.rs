//! Rate limit policies and their threshold dimensions.

use std::time::Duration;

/// The limit dimension a request can be rejected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitDimension {
    /// Per-minute request count
    Minute,
    /// Per-hour request count
    Hour,
    /// Trailing-window request count with a configurable length
    SlidingWindow {
        /// Length of the trailing window in minutes
        window_minutes: u32,
    },
}

impl LimitDimension {
    /// Get the duration of this dimension's time window.
    pub fn window(&self) -> Duration {
        match self {
            LimitDimension::Minute => Duration::from_secs(60),
            LimitDimension::Hour => Duration::from_secs(3600),
            LimitDimension::SlidingWindow { window_minutes } => {
                Duration::from_secs(u64::from(*window_minutes) * 60)
            }
        }
    }
}

impl std::fmt::Display for LimitDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitDimension::Minute => write!(f, "per-minute limit"),
            LimitDimension::Hour => write!(f, "per-hour limit"),
            LimitDimension::SlidingWindow { window_minutes } => {
                write!(f, "sliding window limit ({} minutes)", window_minutes)
            }
        }
    }
}

/// A sliding-window threshold: at most `limit` requests in the trailing
/// `minutes` minutes.
///
/// The pairing of limit and window length is enforced at configuration load,
/// so a window length is always present here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingWindow {
    /// Maximum requests allowed inside the window
    pub limit: u32,
    /// Window length in minutes
    pub minutes: u32,
}

impl SlidingWindow {
    /// The dimension this threshold rejects on.
    pub fn dimension(&self) -> LimitDimension {
        LimitDimension::SlidingWindow {
            window_minutes: self.minutes,
        }
    }
}

/// A validated rate limit policy: a set of independent, optional thresholds.
///
/// An absent threshold leaves that dimension unconstrained. A policy with all
/// thresholds absent performs no limiting at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    /// Maximum requests in any trailing 60 seconds
    pub requests_per_minute: Option<u32>,
    /// Maximum requests in any trailing 3600 seconds
    pub requests_per_hour: Option<u32>,
    /// Maximum requests in a configurable trailing window
    pub sliding_window: Option<SlidingWindow>,
}

impl Policy {
    /// An unconstrained policy.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Whether no threshold is configured.
    pub fn is_unlimited(&self) -> bool {
        self.requests_per_minute.is_none()
            && self.requests_per_hour.is_none()
            && self.sliding_window.is_none()
    }

    /// Whether a request of the given age is still relevant to at least one
    /// configured threshold window.
    pub fn retains(&self, age: Duration) -> bool {
        (self.requests_per_minute.is_some() && age < LimitDimension::Minute.window())
            || (self.requests_per_hour.is_some() && age < LimitDimension::Hour.window())
            || self
                .sliding_window
                .map_or(false, |w| age < w.dimension().window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_windows() {
        assert_eq!(LimitDimension::Minute.window(), Duration::from_secs(60));
        assert_eq!(LimitDimension::Hour.window(), Duration::from_secs(3600));
        assert_eq!(
            LimitDimension::SlidingWindow { window_minutes: 15 }.window(),
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(LimitDimension::Minute.to_string(), "per-minute limit");
        assert_eq!(LimitDimension::Hour.to_string(), "per-hour limit");
        assert_eq!(
            LimitDimension::SlidingWindow { window_minutes: 5 }.to_string(),
            "sliding window limit (5 minutes)"
        );
    }

    #[test]
    fn test_unlimited_policy() {
        assert!(Policy::unlimited().is_unlimited());

        let policy = Policy {
            requests_per_hour: Some(10),
            ..Policy::default()
        };
        assert!(!policy.is_unlimited());
    }

    #[test]
    fn test_retains_uses_longest_configured_window() {
        let policy = Policy {
            requests_per_minute: Some(5),
            requests_per_hour: Some(100),
            sliding_window: None,
        };

        // Inside the minute window: relevant to both thresholds.
        assert!(policy.retains(Duration::from_secs(30)));
        // Outside the minute window but inside the hour window.
        assert!(policy.retains(Duration::from_secs(600)));
        // Outside every window.
        assert!(!policy.retains(Duration::from_secs(3600)));
    }

    #[test]
    fn test_retains_minute_only() {
        let policy = Policy {
            requests_per_minute: Some(5),
            ..Policy::default()
        };

        assert!(policy.retains(Duration::from_secs(59)));
        assert!(!policy.retains(Duration::from_secs(60)));
    }

    #[test]
    fn test_retains_sliding_window() {
        let policy = Policy {
            sliding_window: Some(SlidingWindow {
                limit: 20,
                minutes: 10,
            }),
            ..Policy::default()
        };

        assert!(policy.retains(Duration::from_secs(599)));
        assert!(!policy.retains(Duration::from_secs(600)));
    }

    #[test]
    fn test_unconstrained_policy_retains_nothing() {
        // With no thresholds there is no window to measure against; the
        // engine skips pruning for such policies instead.
        assert!(!Policy::unlimited().retains(Duration::from_secs(0)));
    }
}
