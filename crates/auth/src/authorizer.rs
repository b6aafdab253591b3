//! Token authorizer: bearer credential + method ARN in, policy out.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;

use crate::decide::decide;
use crate::request::{RequestDescriptor, RequestError};
use crate::verifier::{IdentityVerifier, VerificationError};
use crate::PolicyResult;

/// Authorization failure. Every variant fails closed: no policy is issued.
///
/// Callers must not expose which variant occurred; they all surface as the
/// same generic unauthorized response.
#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("missing or malformed bearer token")]
    MissingBearer,

    #[error("invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("credential rejected: {0}")]
    Verification(#[from] VerificationError),

    #[error("unauthorized")]
    Unauthorized,
}

/// Runs verification and the decision procedure for one request at a time.
#[derive(Clone)]
pub struct Authorizer {
    verifier: Arc<dyn IdentityVerifier>,
}

impl Authorizer {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Authorize `authorization_token` (`Bearer <jwt>`) against `method_arn`.
    pub async fn authorize(
        &self,
        authorization_token: &str,
        method_arn: &str,
    ) -> Result<PolicyResult, AuthzError> {
        let span = tracing::info_span!("authorize", method_arn = %method_arn);
        self.authorize_in(authorization_token, method_arn, &span)
            .instrument(span.clone())
            .await
    }

    async fn authorize_in(
        &self,
        authorization_token: &str,
        method_arn: &str,
        span: &tracing::Span,
    ) -> Result<PolicyResult, AuthzError> {
        let token = strip_bearer(authorization_token).ok_or_else(|| {
            tracing::warn!("authorization token is not a bearer token");
            AuthzError::MissingBearer
        })?;

        let request = RequestDescriptor::from_method_arn(method_arn).inspect_err(|e| {
            tracing::warn!(error = %e, "rejecting request descriptor");
        })?;

        let claims = self.verifier.verify(token).await.inspect_err(|e| {
            tracing::warn!(error = %e, "token not valid");
        })?;

        decide(&claims, request.verb, &request.resource, span)
    }
}

/// Extract the credential from an `Authorization` value.
pub fn strip_bearer(value: &str) -> Option<&str> {
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
