//! Privilege tiers granted by the shared secrets.

use serde::Serialize;
use utoipa::ToSchema;

/// Ordered privilege tier. A higher tier satisfies every lower requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeTier {
    /// May call any gated operation without a stricter requirement.
    ReadOnly,
    /// May call moderator operations.
    Moderator,
    /// Full access.
    Administrator,
}

impl PrivilegeTier {
    /// Derive the wire flags for this tier.
    pub fn flags(self) -> TierFlags {
        TierFlags {
            is_admin: self >= PrivilegeTier::Administrator,
            is_mod: self >= PrivilegeTier::Moderator,
            is_read_only: true,
        }
    }
}

impl std::fmt::Display for PrivilegeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivilegeTier::ReadOnly => write!(f, "read_only"),
            PrivilegeTier::Moderator => write!(f, "moderator"),
            PrivilegeTier::Administrator => write!(f, "administrator"),
        }
    }
}

/// The three independent booleans carried in a token.
///
/// Only [`PrivilegeTier::flags`] builds these on the issuing side. On the
/// verifying side they come from an untrusted token and must be turned back
/// into a tier with [`TierFlags::tier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierFlags {
    pub is_admin: bool,
    pub is_mod: bool,
    pub is_read_only: bool,
}

impl TierFlags {
    /// Rebuild the tier, or `None` if the flags are not monotonic
    /// (admin implies mod implies read-only) or grant nothing.
    pub fn tier(self) -> Option<PrivilegeTier> {
        match (self.is_admin, self.is_mod, self.is_read_only) {
            (true, true, true) => Some(PrivilegeTier::Administrator),
            (false, true, true) => Some(PrivilegeTier::Moderator),
            (false, false, true) => Some(PrivilegeTier::ReadOnly),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(PrivilegeTier::Administrator > PrivilegeTier::Moderator);
        assert!(PrivilegeTier::Moderator > PrivilegeTier::ReadOnly);
    }

    #[test]
    fn test_flags_are_monotonic() {
        for tier in [
            PrivilegeTier::ReadOnly,
            PrivilegeTier::Moderator,
            PrivilegeTier::Administrator,
        ] {
            let flags = tier.flags();
            assert!(!flags.is_admin || flags.is_mod);
            assert!(!flags.is_mod || flags.is_read_only);
            assert_eq!(flags.tier(), Some(tier));
        }
    }

    #[test]
    fn test_inconsistent_flags_rejected() {
        let admin_without_mod = TierFlags {
            is_admin: true,
            is_mod: false,
            is_read_only: true,
        };
        assert_eq!(admin_without_mod.tier(), None);

        let mod_without_read = TierFlags {
            is_admin: false,
            is_mod: true,
            is_read_only: false,
        };
        assert_eq!(mod_without_read.tier(), None);

        assert_eq!(TierFlags::default().tier(), None);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(PrivilegeTier::ReadOnly.to_string(), "read_only");
        assert_eq!(PrivilegeTier::Moderator.to_string(), "moderator");
        assert_eq!(PrivilegeTier::Administrator.to_string(), "administrator");
    }
}
