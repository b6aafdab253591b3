//! Identity verification: bearer token in, verified claims out.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use thiserror::Error;

use crate::claims::{ClaimExpectations, Claims, validate_claims};

/// Why a credential could not be verified.
///
/// Error messages never include token contents.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("unsupported algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("missing key id")]
    MissingKeyId,

    #[error("signing key not found")]
    KeyNotFound,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("client mismatch")]
    ClientMismatch,

    #[error("unexpected token use '{0}'")]
    TokenUse(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("key fetch failed: {0}")]
    KeyFetch(#[from] reqwest::Error),

    #[error("invalid user pool id '{0}'")]
    InvalidUserPoolId(String),
}

/// Validates a bearer credential and returns its claims.
///
/// Implementations may suspend on network IO (key retrieval) but never retry
/// a failed verification.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, VerificationError>;
}

/// Shared-secret (HS256) verifier for local development and tests.
pub struct Hs256JwtVerifier {
    key: DecodingKey,
    issuer: Option<String>,
    expect: ClaimExpectations,
}

impl Hs256JwtVerifier {
    pub fn new(secret: impl AsRef<[u8]>, expect: ClaimExpectations) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            issuer: None,
            expect,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

#[async_trait]
impl IdentityVerifier for Hs256JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::HS256 {
            return Err(VerificationError::UnsupportedAlgorithm(header.alg));
        }

        let validation = base_validation(Algorithm::HS256, self.issuer.as_deref());
        let data = decode::<Claims>(token, &self.key, &validation)?;
        validate_claims(&data.claims, &self.expect, Utc::now())?;
        Ok(data.claims)
    }
}

/// Signature + issuer validation; time and client checks are done by
/// [`validate_claims`] so every verifier shares one clock policy.
pub(crate) fn base_validation(alg: Algorithm, issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(alg);
    validation.validate_exp = false;
    validation.validate_aud = false;
    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
        validation.required_spec_claims.insert("iss".to_string());
    }
    validation
}
