//! Shared-secret login for the three privilege tiers.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::PrivilegeTier;
use crate::error::{GateError, GateResult};

/// The three configured shared secrets, one per tier.
#[derive(Clone)]
pub struct TierSecrets {
    pub admin: String,
    pub moderator: String,
    pub read_only: String,
}

/// Maps a submitted secret to the highest tier it unlocks.
///
/// Secrets are kept only as SHA-256 digests so every comparison runs over
/// equal-length input in constant time.
#[derive(Clone)]
pub struct CredentialVerifier {
    admin: [u8; 32],
    moderator: [u8; 32],
    read_only: [u8; 32],
}

impl CredentialVerifier {
    /// Build a verifier from configured secrets. Blank secrets are refused.
    pub fn new(secrets: &TierSecrets) -> GateResult<Self> {
        for (tier, secret) in [
            (PrivilegeTier::Administrator, &secrets.admin),
            (PrivilegeTier::Moderator, &secrets.moderator),
            (PrivilegeTier::ReadOnly, &secrets.read_only),
        ] {
            if secret.is_empty() {
                return Err(GateError::Config(format!(
                    "Secret for tier {} must not be empty",
                    tier
                )));
            }
        }

        Ok(Self {
            admin: digest(&secrets.admin),
            moderator: digest(&secrets.moderator),
            read_only: digest(&secrets.read_only),
        })
    }

    /// Determine the tier unlocked by `secret`.
    pub fn verify(&self, secret: &str) -> GateResult<PrivilegeTier> {
        let submitted = digest(secret);

        // All three comparisons always run.
        let is_admin: bool = submitted.as_slice().ct_eq(self.admin.as_slice()).into();
        let is_mod: bool = submitted.as_slice().ct_eq(self.moderator.as_slice()).into();
        let is_read_only: bool = submitted.as_slice().ct_eq(self.read_only.as_slice()).into();

        if is_admin {
            Ok(PrivilegeTier::Administrator)
        } else if is_mod {
            Ok(PrivilegeTier::Moderator)
        } else if is_read_only {
            Ok(PrivilegeTier::ReadOnly)
        } else {
            tracing::warn!("Login attempted with unrecognized secret");
            Err(GateError::CredentialInvalid)
        }
    }
}

fn digest(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_secrets() -> TierSecrets {
        TierSecrets {
            admin: "admin-secret".to_string(),
            moderator: "mod-secret".to_string(),
            read_only: "ro-secret".to_string(),
        }
    }

    #[test]
    fn test_each_secret_unlocks_its_tier() {
        let verifier = CredentialVerifier::new(&make_secrets()).unwrap();

        assert_eq!(
            verifier.verify("admin-secret").unwrap(),
            PrivilegeTier::Administrator
        );
        assert_eq!(verifier.verify("mod-secret").unwrap(), PrivilegeTier::Moderator);
        assert_eq!(verifier.verify("ro-secret").unwrap(), PrivilegeTier::ReadOnly);
    }

    #[test]
    fn test_unknown_secret_rejected() {
        let verifier = CredentialVerifier::new(&make_secrets()).unwrap();

        for attempt in ["", "admin", "admin-secret ", "ADMIN-SECRET"] {
            assert!(matches!(
                verifier.verify(attempt),
                Err(GateError::CredentialInvalid)
            ));
        }
    }

    #[test]
    fn test_shared_secret_resolves_to_highest_tier() {
        let secrets = TierSecrets {
            admin: "same".to_string(),
            moderator: "same".to_string(),
            read_only: "ro".to_string(),
        };
        let verifier = CredentialVerifier::new(&secrets).unwrap();

        assert_eq!(verifier.verify("same").unwrap(), PrivilegeTier::Administrator);
    }

    #[test]
    fn test_blank_secret_refused() {
        let mut secrets = make_secrets();
        secrets.moderator = String::new();

        assert!(matches!(
            CredentialVerifier::new(&secrets),
            Err(GateError::Config(_))
        ));
    }
}
