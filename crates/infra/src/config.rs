//! Configuration loading and representation.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Which identity verifier to run.
#[derive(Clone, PartialEq, Eq)]
pub enum IdentitySettings {
    /// Cognito user pool (RS256 + JWKS).
    Cognito {
        user_pool_id: String,
        client_id: String,
        /// Key set location when not the pool's published one.
        jwks_url: Option<String>,
    },
    /// HS256 shared secret (local development / tests).
    SharedSecret { secret: String, client_id: String },
}

impl core::fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IdentitySettings::Cognito {
                user_pool_id,
                client_id,
                jwks_url,
            } => f
                .debug_struct("Cognito")
                .field("user_pool_id", user_pool_id)
                .field("client_id", client_id)
                .field("jwks_url", jwks_url)
                .finish(),
            IdentitySettings::SharedSecret { client_id, .. } => f
                .debug_struct("SharedSecret")
                .field("secret", &"<redacted>")
                .field("client_id", client_id)
                .finish(),
        }
    }
}

/// Shared secret the identity provider presents when invoking triggers.
#[derive(Clone, PartialEq, Eq)]
pub struct TriggerSecret(String);

impl TriggerSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Constant-time comparison against a presented value.
    pub fn matches(&self, presented: &str) -> bool {
        let (a, b) = (self.0.as_bytes(), presented.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |diff, (l, r)| diff | (l ^ r)) == 0
    }
}

impl core::fmt::Debug for TriggerSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TriggerSecret(<redacted>)")
    }
}

/// Components of the method ARNs the gateway builds for incoming requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub region: String,
    pub account_id: String,
    pub api_id: String,
    pub stage: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            region: "local".to_string(),
            account_id: "000000000000".to_string(),
            api_id: "kots-api".to_string(),
            stage: "prod".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub user_table: String,
    pub identity: IdentitySettings,
    pub gateway: GatewaySettings,
    /// `None` disables the post-confirmation trigger endpoint.
    pub trigger_secret: Option<TriggerSecret>,
    pub jwks_ttl: Duration,
    pub clock_skew_secs: i64,
}

pub const DEV_CLIENT_ID: &str = "kots-dev-client";

impl Settings {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let identity = match (get("USER_POOL_ID"), get("JWT_SECRET")) {
            (Some(user_pool_id), _) => IdentitySettings::Cognito {
                user_pool_id,
                client_id: get("CLIENT_ID").ok_or(ConfigError::Missing("CLIENT_ID"))?,
                jwks_url: get("JWKS_URL"),
            },
            (None, Some(secret)) => {
                tracing::warn!("USER_POOL_ID not set; verifying tokens with the JWT_SECRET shared secret");
                IdentitySettings::SharedSecret {
                    secret,
                    client_id: get("CLIENT_ID").unwrap_or_else(|| DEV_CLIENT_ID.to_string()),
                }
            }
            (None, None) => return Err(ConfigError::Missing("USER_POOL_ID or JWT_SECRET")),
        };

        let clock_skew_secs: i64 = parse_num("CLOCK_SKEW_SECS", get("CLOCK_SKEW_SECS"), 60)?;
        if clock_skew_secs < 0 {
            return Err(ConfigError::Invalid {
                key: "CLOCK_SKEW_SECS",
                value: clock_skew_secs.to_string(),
            });
        }

        let defaults = GatewaySettings::default();
        let gateway = GatewaySettings {
            region: get("API_REGION").unwrap_or(defaults.region),
            account_id: get("API_ACCOUNT_ID").unwrap_or(defaults.account_id),
            api_id: get("API_ID").unwrap_or(defaults.api_id),
            stage: get("API_STAGE").unwrap_or(defaults.stage),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            user_table: get("USER_TABLE").unwrap_or_else(|| "users".to_string()),
            identity,
            gateway,
            trigger_secret: get("TRIGGER_SECRET").map(TriggerSecret::new),
            jwks_ttl: Duration::from_secs(parse_num("JWKS_TTL_SECS", get("JWKS_TTL_SECS"), 3600)?),
            clock_skew_secs,
        })
    }
}

fn parse_num<T: core::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
