use std::sync::Arc;

use kots_auth::{
    Authorizer, ClaimExpectations, CognitoConfig, CognitoJwtVerifier, Hs256JwtVerifier,
    IdentityVerifier, VerificationError,
};
use kots_infra::{
    GroupDirectory, IdentitySettings, InMemoryGroupDirectory, InMemoryUserStore, Settings,
    UserStore,
};

/// Managed-service adapters shared by the handlers.
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub directory: Arc<dyn GroupDirectory>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, directory: Arc<dyn GroupDirectory>) -> Self {
        Self { users, directory }
    }
}

pub fn build_services(settings: &Settings) -> AppServices {
    AppServices::new(
        Arc::new(InMemoryUserStore::new(settings.user_table.clone())),
        Arc::new(InMemoryGroupDirectory::new()),
    )
}

pub fn build_authorizer(settings: &Settings) -> Result<Authorizer, VerificationError> {
    let verifier: Arc<dyn IdentityVerifier> = match &settings.identity {
        IdentitySettings::Cognito {
            user_pool_id,
            client_id,
            jwks_url,
        } => {
            let mut config = CognitoConfig::new(user_pool_id.clone(), client_id.clone())
                .with_jwks_ttl(settings.jwks_ttl)
                .with_clock_skew(settings.clock_skew_secs);
            if let Some(url) = jwks_url {
                config = config.with_jwks_url(url.clone());
            }
            Arc::new(CognitoJwtVerifier::new(config)?)
        }
        IdentitySettings::SharedSecret { secret, client_id } => Arc::new(Hs256JwtVerifier::new(
            secret,
            ClaimExpectations::access_token(client_id.clone()).with_leeway(settings.clock_skew_secs),
        )),
    };
    Ok(Authorizer::new(verifier))
}
