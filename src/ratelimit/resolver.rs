//! Tier table lookup: maps identity metadata to a concrete policy.

use tracing::trace;

use super::identity::{Identity, ADMIN_ROLE};
use super::policy::Policy;

/// Name of the policy applied when no tier label matches.
pub const DEFAULT_TIER: &str = "default";

/// Outcome of resolving an identity against the tier table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Administrator: the request is accepted without consulting the
    /// limiter and must not be recorded.
    Bypass,
    /// The identity is subject to the given tier's policy.
    Limited {
        /// Resolved tier name (or [`DEFAULT_TIER`])
        tier: &'a str,
        /// The tier's policy
        policy: &'a Policy,
        /// Whether this is the highest-privilege tier on offer
        top_tier: bool,
    },
}

/// An ordered tier table: tier policies in descending precedence plus a
/// default policy for identities matching none of them.
///
/// The table is immutable after construction; it is built from validated
/// configuration (see [`crate::config::TierTableConfig`]) or assembled
/// directly in tests.
#[derive(Debug, Clone, Default)]
pub struct TierTable {
    tiers: Vec<(String, Policy)>,
    default_policy: Policy,
}

impl TierTable {
    /// Create a table from tiers in descending precedence and a default
    /// policy.
    pub fn new(tiers: Vec<(String, Policy)>, default_policy: Policy) -> Self {
        Self {
            tiers,
            default_policy,
        }
    }

    /// Number of named tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Resolve an identity to a policy.
    ///
    /// Administrators (by role flag or by carrying the reserved `admin`
    /// label) bypass limiting regardless of table contents. Otherwise the
    /// first tier, in precedence order, whose name appears among the
    /// identity's labels wins; identities matching nothing fall back to the
    /// default policy. Resolution never fails.
    pub fn resolve<'a>(&'a self, identity: &Identity) -> Resolution<'a> {
        if identity.is_admin() || identity.has_tier(ADMIN_ROLE) {
            trace!(identity = %identity.key(), "Administrator bypasses rate limiting");
            return Resolution::Bypass;
        }

        for (index, (name, policy)) in self.tiers.iter().enumerate() {
            if identity.has_tier(name) {
                trace!(identity = %identity.key(), tier = %name, "Resolved tier policy");
                return Resolution::Limited {
                    tier: name,
                    policy,
                    top_tier: index == 0,
                };
            }
        }

        trace!(identity = %identity.key(), "No tier label matched, using default policy");
        Resolution::Limited {
            tier: DEFAULT_TIER,
            policy: &self.default_policy,
            // With no named tiers configured there is nothing to upgrade to.
            top_tier: self.tiers.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(limit: u32) -> Policy {
        Policy {
            requests_per_hour: Some(limit),
            ..Policy::default()
        }
    }

    fn sample_table() -> TierTable {
        TierTable::new(
            vec![
                ("Gold".to_string(), hourly(100)),
                ("Silver".to_string(), hourly(50)),
            ],
            hourly(10),
        )
    }

    #[test]
    fn test_admin_role_bypasses() {
        let table = sample_table();
        let identity = Identity::new("u1").with_role("admin");

        assert_eq!(table.resolve(&identity), Resolution::Bypass);
    }

    #[test]
    fn test_admin_label_bypasses() {
        let table = sample_table();
        let identity = Identity::new("u1").with_tiers(["admin"]);

        assert_eq!(table.resolve(&identity), Resolution::Bypass);
    }

    #[test]
    fn test_precedence_highest_tier_wins() {
        let table = sample_table();
        let identity = Identity::new("u1").with_tiers(["Silver", "Gold"]);

        match table.resolve(&identity) {
            Resolution::Limited {
                tier,
                policy,
                top_tier,
            } => {
                assert_eq!(tier, "Gold");
                assert_eq!(policy.requests_per_hour, Some(100));
                assert!(top_tier);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_second_tier_is_not_top() {
        let table = sample_table();
        let identity = Identity::new("u1").with_tiers(["Silver"]);

        match table.resolve(&identity) {
            Resolution::Limited { tier, top_tier, .. } => {
                assert_eq!(tier, "Silver");
                assert!(!top_tier);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_labels_fall_back_to_default() {
        let table = sample_table();
        let identity = Identity::new("u1").with_tiers(["Bronze"]);

        match table.resolve(&identity) {
            Resolution::Limited {
                tier,
                policy,
                top_tier,
            } => {
                assert_eq!(tier, DEFAULT_TIER);
                assert_eq!(policy.requests_per_hour, Some(10));
                assert!(!top_tier);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_missing_metadata_falls_back_to_default() {
        let table = sample_table();
        let identity = Identity::new("u1");

        match table.resolve(&identity) {
            Resolution::Limited { tier, .. } => assert_eq!(tier, DEFAULT_TIER),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_default_is_top_when_no_tiers_configured() {
        let table = TierTable::new(Vec::new(), hourly(10));
        let identity = Identity::new("u1");

        match table.resolve(&identity) {
            Resolution::Limited { top_tier, .. } => assert!(top_tier),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }
}
