use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::groups::{self, Groups};
use crate::verifier::VerificationError;

/// Verified identity attributes carried by an access token.
///
/// Only the claims the authorizer and handlers read are modeled; the rest of
/// the payload is ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / principal identifier (the user pool `sub`).
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// `access` or `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,

    /// App client the access token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiration, seconds since the epoch.
    pub exp: i64,

    /// Group memberships. Missing or malformed values decode as empty.
    #[serde(
        rename = "cognito:groups",
        default,
        deserialize_with = "groups::deserialize_lenient"
    )]
    pub groups: Groups,
}

/// What a verifier requires of decoded claims beyond the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimExpectations {
    /// App client id the token must be issued to.
    pub client_id: String,
    /// Required `token_use`.
    pub token_use: String,
    /// Allowed clock skew, in seconds.
    pub leeway_secs: i64,
}

impl ClaimExpectations {
    /// Expect an access token issued to `client_id`.
    pub fn access_token(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            token_use: "access".to_string(),
            leeway_secs: 60,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

/// Deterministically validate decoded claims.
///
/// Signature verification happens before this in the verifier; this checks
/// token use, client binding and the time window against `now`.
pub fn validate_claims(
    claims: &Claims,
    expect: &ClaimExpectations,
    now: DateTime<Utc>,
) -> Result<(), VerificationError> {
    match claims.token_use.as_deref() {
        Some(use_) if use_ == expect.token_use => {}
        other => {
            return Err(VerificationError::TokenUse(
                other.unwrap_or("<missing>").to_string(),
            ));
        }
    }

    if claims.client_id.as_deref() != Some(expect.client_id.as_str()) {
        return Err(VerificationError::ClientMismatch);
    }

    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(VerificationError::InvalidTimeWindow);
    }
    if now + expect.leeway_secs < claims.iat {
        return Err(VerificationError::NotYetValid);
    }
    if now - expect.leeway_secs >= claims.exp {
        return Err(VerificationError::Expired);
    }
    Ok(())
}
