//! Enforcing gateway: authorize every protected request before it reaches a
//! handler, then enforce the policy effect. Trigger endpoints are guarded by
//! a shared secret instead of a user token.

use axum::{
    extract::State,
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use kots_auth::Authorizer;
use kots_infra::{GatewaySettings, TriggerSecret};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct GatewayState {
    pub authorizer: Authorizer,
    pub gateway: GatewaySettings,
}

pub async fn gateway_middleware(
    State(state): State<GatewayState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authorization = authorization_value(req.headers()).to_string();
    let method_arn = method_arn_for(&state.gateway, req.method(), req.uri().path());

    match state.authorizer.authorize(&authorization, &method_arn).await {
        Ok(policy) if policy.effect.is_allow() => {
            req.extensions_mut()
                .insert(PrincipalContext::new(policy.principal_id));
            next.run(req).await
        }
        Ok(_) => errors::forbidden(),
        // Bad credential and insufficient groups look the same to the caller.
        Err(_) => errors::unauthorized(),
    }
}

/// Header the identity provider's trigger invoker sends the shared secret in.
pub const TRIGGER_SECRET_HEADER: &str = "x-kots-trigger-secret";

/// Admit trigger invocations carrying the configured secret. With no secret
/// configured every invocation is rejected.
pub async fn trigger_guard(
    State(secret): State<Option<TriggerSecret>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(TRIGGER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match (secret.as_ref(), presented) {
        (Some(secret), Some(presented)) if secret.matches(presented) => next.run(req).await,
        (None, _) => {
            tracing::warn!(path = %req.uri().path(), "trigger invoked but no trigger secret is configured");
            errors::unauthorized()
        }
        _ => {
            tracing::warn!(path = %req.uri().path(), "trigger invoked without a valid secret");
            errors::unauthorized()
        }
    }
}

fn authorization_value(headers: &HeaderMap) -> &str {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Method ARN for the request as API Gateway would report it. Verbs outside
/// the supported set are kept verbatim so the authorizer rejects them.
pub fn method_arn_for(gateway: &GatewaySettings, method: &Method, path: &str) -> String {
    format!(
        "arn:aws:execute-api:{}:{}:{}/{}/{}/{}",
        gateway.region,
        gateway.account_id,
        gateway.api_id,
        gateway.stage,
        method.as_str(),
        path.trim_start_matches('/')
    )
}
