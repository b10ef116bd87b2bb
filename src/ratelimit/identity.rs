//! Request identity metadata and key normalization.

/// Stable fallback key for requests whose identity cannot be resolved.
pub const FALLBACK_KEY: &str = "default_user";

/// Role name that bypasses rate limiting entirely.
pub const ADMIN_ROLE: &str = "admin";

/// Identity metadata attached to an incoming request.
///
/// All fields beyond the id are optional; missing metadata is normalized
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Caller-supplied identifier; may be empty
    pub id: String,
    /// Optional role flag (e.g. `admin`)
    pub role: Option<String>,
    /// Membership tier labels, if any
    pub tiers: Option<Vec<String>>,
}

impl Identity {
    /// Create an identity with just an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
            tiers: None,
        }
    }

    /// Set the role flag.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the tier labels.
    pub fn with_tiers<I, S>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tiers = Some(tiers.into_iter().map(Into::into).collect());
        self
    }

    /// The history key for this identity.
    ///
    /// An empty id maps to the stable [`FALLBACK_KEY`] so that anonymous
    /// requests share one history instead of failing.
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            FALLBACK_KEY
        } else {
            &self.id
        }
    }

    /// Whether the role flag marks this identity as an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    /// Whether the identity carries the given tier label.
    pub fn has_tier(&self, name: &str) -> bool {
        self.tiers
            .as_ref()
            .map_or(false, |tiers| tiers.iter().any(|t| t == name))
    }
}
