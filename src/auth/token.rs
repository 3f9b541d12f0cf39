//! RSA-signed session tokens.
//!
//! Tokens are self-contained JWTs: the server keeps no registry, so a token
//! stays valid until its embedded expiry.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};

use crate::domain::{PrivilegeTier, TierFlags};
use crate::error::{GateError, GateResult};

/// Validity window applied when configuration does not override it.
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 6;

/// Longest validity window accepted at startup.
pub const MAX_TOKEN_VALIDITY_HOURS: i64 = 24 * 30;

/// Algorithm used for every issued token.
const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Algorithms accepted on verification (RSA PKCS#1 v1.5 family).
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Claim set carried by a token.
///
/// Flag names match the tokens issued by the previous deployment so that
/// outstanding sessions keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Not before (Unix timestamp).
    pub nbf: i64,
    #[serde(rename = "IsAdmin")]
    pub is_admin: bool,
    #[serde(rename = "IsMod")]
    pub is_mod: bool,
    #[serde(rename = "IsRO")]
    pub is_read_only: bool,
}

impl TokenClaims {
    fn flags(&self) -> TierFlags {
        TierFlags {
            is_admin: self.is_admin,
            is_mod: self.is_mod,
            is_read_only: self.is_read_only,
        }
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The process-wide RSA keypair.
///
/// The private half is optional so a verify-only codec can be built; issuing
/// with such a codec fails with a signing error.
#[derive(Clone)]
pub struct SigningKeys {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
}

impl SigningKeys {
    /// Load a keypair from PEM-encoded RSA keys.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> GateResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| GateError::Config(format!("Invalid RSA private key: {}", e)))?;

        Ok(Self {
            encoding_key: Some(encoding_key),
            ..Self::verify_only(public_pem)?
        })
    }

    /// Load only the public key.
    pub fn verify_only(public_pem: &[u8]) -> GateResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| GateError::Config(format!("Invalid RSA public key: {}", e)))?;

        Ok(Self {
            encoding_key: None,
            decoding_key,
        })
    }

    /// Read both PEM files from disk.
    pub fn from_pem_files(private_path: &Path, public_path: &Path) -> GateResult<Self> {
        let read = |path: &Path| {
            std::fs::read(path).map_err(|e| {
                GateError::Config(format!("Failed to read key {}: {}", path.display(), e))
            })
        };

        Self::from_pem(&read(private_path)?, &read(public_path)?)
    }
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Claims of a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub tier: PrivilegeTier,
    /// Issue time (for handlers that want session age).
    #[allow(dead_code)]
    pub issued_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: SigningKeys,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec on the system clock.
    pub fn new(keys: SigningKeys, validity: Duration) -> GateResult<Self> {
        Self::with_clock(keys, validity, Arc::new(SystemClock))
    }

    /// Create a codec with an explicit time source.
    ///
    /// The validity window must be positive and at most
    /// [`MAX_TOKEN_VALIDITY_HOURS`].
    pub fn with_clock(
        keys: SigningKeys,
        validity: Duration,
        clock: Arc<dyn Clock>,
    ) -> GateResult<Self> {
        if validity <= Duration::zero() || validity > Duration::hours(MAX_TOKEN_VALIDITY_HOURS) {
            return Err(GateError::Config(format!(
                "Token validity must be between 1 second and {} hours, got {} seconds",
                MAX_TOKEN_VALIDITY_HOURS,
                validity.num_seconds()
            )));
        }

        Ok(Self {
            keys,
            validity,
            clock,
        })
    }

    /// Get the token validity window.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token for `tier`.
    pub fn issue(&self, tier: PrivilegeTier) -> GateResult<IssuedToken> {
        let encoding_key = self
            .keys
            .encoding_key
            .as_ref()
            .ok_or_else(|| GateError::Signing("No private key loaded".to_string()))?;

        let now = self.clock.now();
        let expires = now
            .checked_add_signed(self.validity)
            .ok_or_else(|| GateError::Signing("Token expiry out of range".to_string()))?;
        let flags = tier.flags();

        let claims = TokenClaims {
            exp: expires.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            is_admin: flags.is_admin,
            is_mod: flags.is_mod,
            is_read_only: flags.is_read_only,
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, encoding_key)
            .map_err(|e| GateError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires })
    }

    /// Check signature, algorithm, time window and tier flags of `token`.
    pub fn verify(&self, token: &str) -> GateResult<VerifiedToken> {
        let header =
            decode_header(token).map_err(|e| GateError::TokenMalformed(e.to_string()))?;

        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(GateError::TokenAlgorithmUnexpected(format!("{:?}", header.alg)));
        }

        // Time checks run below against the injected clock.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<TokenClaims>(token, &self.keys.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => GateError::TokenSignatureInvalid,
                ErrorKind::InvalidAlgorithm => {
                    GateError::TokenAlgorithmUnexpected(format!("{:?}", header.alg))
                }
                _ => GateError::TokenMalformed(e.to_string()),
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if claims.iat > now || claims.nbf > now {
            return Err(GateError::TokenNotYetValid);
        }
        if now > claims.exp {
            return Err(GateError::TokenExpired);
        }

        let tier = claims
            .flags()
            .tier()
            .ok_or_else(|| GateError::TokenMalformed("Inconsistent tier flags".to_string()))?;

        Ok(VerifiedToken {
            tier,
            issued_at: timestamp(claims.iat)?,
            not_before: timestamp(claims.nbf)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}

/// Turn the configured hour count into a validity window.
pub fn validity_from_hours(hours: i64) -> GateResult<Duration> {
    if !(1..=MAX_TOKEN_VALIDITY_HOURS).contains(&hours) {
        return Err(GateError::Config(format!(
            "token_validity_hours must be between 1 and {}, got {}",
            MAX_TOKEN_VALIDITY_HOURS, hours
        )));
    }

    Ok(Duration::hours(hours))
}

fn timestamp(secs: i64) -> GateResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| GateError::TokenMalformed(format!("Timestamp out of range: {}", secs)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const SIGNING_PRIVATE_PEM: &[u8] = include_bytes!("../../testdata/signing_rsa.pem");
    pub const SIGNING_PUBLIC_PEM: &[u8] = include_bytes!("../../testdata/signing_rsa.pub.pem");
    pub const FOREIGN_PRIVATE_PEM: &[u8] = include_bytes!("../../testdata/foreign_rsa.pem");
    pub const FOREIGN_PUBLIC_PEM: &[u8] = include_bytes!("../../testdata/foreign_rsa.pub.pem");

    /// Clock frozen at a chosen instant.
    pub struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub fn signing_keys() -> SigningKeys {
        SigningKeys::from_pem(SIGNING_PRIVATE_PEM, SIGNING_PUBLIC_PEM).unwrap()
    }

    pub fn foreign_keys() -> SigningKeys {
        SigningKeys::from_pem(FOREIGN_PRIVATE_PEM, FOREIGN_PUBLIC_PEM).unwrap()
    }

    pub fn make_codec() -> TokenCodec {
        TokenCodec::new(signing_keys(), Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS)).unwrap()
    }

    pub fn codec_at(keys: SigningKeys, at: DateTime<Utc>) -> TokenCodec {
        TokenCodec::with_clock(
            keys,
            Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS),
            Arc::new(FixedClock(at)),
        )
        .unwrap()
    }
}
