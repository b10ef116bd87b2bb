//! Tier table configuration loading and validation.
//!
//! Tier policies arrive as loosely-typed optional fields (every threshold may
//! be omitted). Validation happens once at load time, producing the typed
//! [`TierTable`] the resolver works with; the evaluation path never has to
//! re-check field pairings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, TollgateError};
use crate::ratelimit::identity::ADMIN_ROLE;
use crate::ratelimit::policy::{Policy, SlidingWindow};
use crate::ratelimit::resolver::TierTable;

/// On-disk tier table: named tiers in descending precedence plus the
/// default policy for identities matching none of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTableConfig {
    /// Named tiers, highest privilege first
    #[serde(default)]
    pub tiers: Vec<TierConfig>,

    /// Policy applied when no tier label matches
    #[serde(default = "default_fallback_policy", rename = "default")]
    pub default_policy: PolicyConfig,
}

impl Default for TierTableConfig {
    fn default() -> Self {
        Self {
            tiers: Vec::new(),
            default_policy: default_fallback_policy(),
        }
    }
}

/// Shipped fallback: 10 requests per hour for unrecognized identities.
fn default_fallback_policy() -> PolicyConfig {
    PolicyConfig {
        requests_per_hour: Some(10),
        ..PolicyConfig::default()
    }
}

/// A named tier and its thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    /// The tier name matched against identity labels
    pub name: String,

    /// The tier's thresholds
    #[serde(flatten)]
    pub policy: PolicyConfig,
}

/// Raw, unvalidated policy thresholds as they appear in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Maximum requests in any trailing 60 seconds
    #[serde(default)]
    pub requests_per_minute: Option<u32>,

    /// Maximum requests in any trailing 3600 seconds
    #[serde(default)]
    pub requests_per_hour: Option<u32>,

    /// Maximum requests in the trailing sliding window
    #[serde(default)]
    pub sliding_window_limit: Option<u32>,

    /// Sliding window length in minutes; required when a limit is set
    #[serde(default)]
    pub sliding_window_minutes: Option<u32>,
}

impl PolicyConfig {
    /// Validate the thresholds into a typed [`Policy`].
    ///
    /// The sliding-window limit and window length must be configured
    /// together, and the window length must be non-zero.
    pub fn build(&self, tier: &str) -> Result<Policy> {
        let sliding_window = match (self.sliding_window_limit, self.sliding_window_minutes) {
            (None, None) => None,
            (Some(limit), Some(minutes)) => {
                if minutes == 0 {
                    return Err(TollgateError::Config(format!(
                        "tier '{}': sliding_window_minutes must be greater than zero",
                        tier
                    )));
                }
                Some(SlidingWindow { limit, minutes })
            }
            (Some(_), None) => {
                return Err(TollgateError::Config(format!(
                    "tier '{}': sliding_window_limit requires sliding_window_minutes",
                    tier
                )));
            }
            (None, Some(_)) => {
                return Err(TollgateError::Config(format!(
                    "tier '{}': sliding_window_minutes requires sliding_window_limit",
                    tier
                )));
            }
        };

        Ok(Policy {
            requests_per_minute: self.requests_per_minute,
            requests_per_hour: self.requests_per_hour,
            sliding_window,
        })
    }
}

impl TierTableConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading tier table configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TollgateError::Config(format!("Failed to parse tier table: {}", e)))
    }

    /// Validate the configuration into a [`TierTable`].
    ///
    /// Tier order in the file is precedence order. A tier named `admin` is
    /// skipped (administrator bypass is absolute and not configurable), and
    /// only the first occurrence of a duplicated name is kept.
    pub fn build(self) -> Result<TierTable> {
        let mut tiers: Vec<(String, Policy)> = Vec::with_capacity(self.tiers.len());

        for tier in &self.tiers {
            if tier.name == ADMIN_ROLE {
                warn!("Ignoring configured '{}' tier, administrators always bypass", ADMIN_ROLE);
                continue;
            }
            if tiers.iter().any(|(name, _)| *name == tier.name) {
                warn!(tier = %tier.name, "Ignoring duplicate tier definition");
                continue;
            }

            tiers.push((tier.name.clone(), tier.policy.build(&tier.name)?));
        }

        let default_policy = self.default_policy.build("default")?;

        info!(tiers = tiers.len(), "Tier table validated");
        Ok(TierTable::new(tiers, default_policy))
    }
}
