//! Cognito user pool access-token verification.
//!
//! Tokens are RS256 JWTs signed with keys the pool publishes at
//! `<issuer>/.well-known/jwks.json`. The key set is cached for a TTL and
//! refetched when a token names an unknown `kid` (key rotation), no more than
//! once per refresh cooldown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, decode, decode_header};

use crate::claims::{ClaimExpectations, Claims, validate_claims};
use crate::verifier::{IdentityVerifier, VerificationError, base_validation};

/// Minimum time between key set fetches triggered by an unknown `kid`.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(60);

/// Connection details for a user pool.
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub user_pool_id: String,
    pub client_id: String,
    /// Overrides the key set location derived from the issuer.
    pub jwks_url: Option<String>,
    pub jwks_ttl: Duration,
    pub refresh_cooldown: Duration,
    pub clock_skew_secs: i64,
}

impl CognitoConfig {
    pub fn new(user_pool_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
            jwks_url: None,
            jwks_ttl: Duration::from_secs(3600),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            clock_skew_secs: 60,
        }
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_jwks_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_ttl = ttl;
        self
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn with_clock_skew(mut self, secs: i64) -> Self {
        self.clock_skew_secs = secs;
        self
    }
}

#[derive(Debug, Clone)]
struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
    /// `None` when the TTL does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl CachedJwks {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Verifier for access tokens issued by a Cognito user pool.
#[derive(Debug, Clone)]
pub struct CognitoJwtVerifier {
    client: reqwest::Client,
    issuer: String,
    jwks_url: String,
    expect: ClaimExpectations,
    jwks_cache: Arc<DashMap<String, CachedJwks>>,
    jwks_ttl: Duration,
    refresh_cooldown: Duration,
}

impl CognitoJwtVerifier {
    pub fn new(config: CognitoConfig) -> Result<Self, VerificationError> {
        let issuer = issuer_for_pool(&config.user_pool_id)?;
        let jwks_url = config
            .jwks_url
            .unwrap_or_else(|| format!("{issuer}/.well-known/jwks.json"));
        Ok(Self {
            client: reqwest::Client::new(),
            issuer,
            jwks_url,
            expect: ClaimExpectations::access_token(config.client_id)
                .with_leeway(config.clock_skew_secs),
            jwks_cache: Arc::new(DashMap::new()),
            jwks_ttl: config.jwks_ttl,
            refresh_cooldown: config.refresh_cooldown,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    async fn get_jwks(&self) -> Result<CachedJwks, VerificationError> {
        let cached = self.jwks_cache.get(&self.jwks_url).map(|entry| entry.clone());
        match cached {
            Some(entry) if entry.is_fresh(Instant::now()) => Ok(entry),
            _ => self.refresh_jwks().await,
        }
    }

    async fn refresh_jwks(&self) -> Result<CachedJwks, VerificationError> {
        tracing::debug!(url = %self.jwks_url, "fetching jwks");
        let jwks: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let now = Instant::now();
        let entry = CachedJwks {
            jwks,
            fetched_at: now,
            expires_at: now.checked_add(self.jwks_ttl),
        };
        self.jwks_cache.insert(self.jwks_url.clone(), entry.clone());
        Ok(entry)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerificationError> {
        let cached = self.get_jwks().await?;
        if let Some(jwk) = cached.jwks.find(kid) {
            return rsa_key(jwk);
        }
        // Unknown kid: the pool may have rotated keys, but refetch at most
        // once per cooldown.
        if cached.fetched_at.elapsed() < self.refresh_cooldown {
            tracing::debug!(kid, "unknown kid within refresh cooldown");
            return Err(VerificationError::KeyNotFound);
        }
        let refreshed = self.refresh_jwks().await?;
        let jwk = refreshed.jwks.find(kid).ok_or(VerificationError::KeyNotFound)?;
        rsa_key(jwk)
    }
}

#[async_trait]
impl IdentityVerifier for CognitoJwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        // Reject on the header alone before any key fetch.
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(VerificationError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.as_deref().ok_or(VerificationError::MissingKeyId)?;

        let key = self.decoding_key(kid).await?;
        let validation = base_validation(Algorithm::RS256, Some(&self.issuer));
        let data = decode::<Claims>(token, &key, &validation)?;
        validate_claims(&data.claims, &self.expect, Utc::now())?;
        Ok(data.claims)
    }
}

/// `https://cognito-idp.<region>.amazonaws.com/<pool>`; the region is the
/// pool id prefix (`us-east-1_AbCdEf`).
pub fn issuer_for_pool(user_pool_id: &str) -> Result<String, VerificationError> {
    let invalid = || VerificationError::InvalidUserPoolId(user_pool_id.to_string());
    let (region, suffix) = user_pool_id.split_once('_').ok_or_else(invalid)?;
    if region.is_empty() || suffix.is_empty() {
        return Err(invalid());
    }
    Ok(format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}"))
}

fn rsa_key(jwk: &Jwk) -> Result<DecodingKey, VerificationError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Ok(DecodingKey::from_jwk(jwk)?),
        _ => Err(VerificationError::InvalidKey("expected an RSA key".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config(pool: &str) -> CognitoConfig {
        CognitoConfig::new(pool, "client-a")
    }

    #[test]
    fn issuer_is_derived_from_pool_id() {
        let v = CognitoJwtVerifier::new(config("eu-central-1_Ab12Cd")).unwrap();
        assert_eq!(v.issuer(), "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_Ab12Cd");
        assert_eq!(
            v.jwks_url(),
            "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_Ab12Cd/.well-known/jwks.json"
        );
    }

    #[test]
    fn jwks_url_can_be_overridden() {
        let v = CognitoJwtVerifier::new(
            config("eu-central-1_Ab12Cd").with_jwks_url("http://127.0.0.1:9/keys.json"),
        )
        .unwrap();
        assert_eq!(v.jwks_url(), "http://127.0.0.1:9/keys.json");
        assert_eq!(v.issuer(), "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_Ab12Cd");
    }

    #[test]
    fn unbounded_ttl_never_expires() {
        let entry = CachedJwks {
            jwks: JwkSet { keys: Vec::new() },
            fetched_at: Instant::now(),
            expires_at: Instant::now().checked_add(Duration::MAX),
        };
        assert!(entry.expires_at.is_none());
        assert!(entry.is_fresh(Instant::now()));
    }

    #[test]
    fn malformed_pool_id_is_rejected() {
        assert!(matches!(
            issuer_for_pool("no-underscore"),
            Err(VerificationError::InvalidUserPoolId(_))
        ));
        assert!(issuer_for_pool("_abc").is_err());
        assert!(issuer_for_pool("us-east-1_").is_err());
    }

    #[tokio::test]
    async fn hmac_tokens_are_rejected_before_key_fetch() {
        let v = CognitoJwtVerifier::new(config("us-east-1_Pool")).unwrap();
        let claims = serde_json::json!({ "sub": "s", "iat": 0, "exp": 1 });
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"k")).unwrap();
        assert!(matches!(
            v.verify(&token).await,
            Err(VerificationError::UnsupportedAlgorithm(Algorithm::HS256))
        ));
    }
}
