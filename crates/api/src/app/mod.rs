//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: verifier / store / directory wiring from settings
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs (gateway and user pool event shapes)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use kots_auth::Authorizer;
use kots_infra::{GatewaySettings, Settings, TriggerSecret};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from settings (public entrypoint used by `main.rs`).
pub fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let authorizer = services::build_authorizer(settings)?;
    let services = Arc::new(services::build_services(settings));
    if settings.trigger_secret.is_none() {
        tracing::warn!("TRIGGER_SECRET not set; post-confirmation trigger is disabled");
    }
    Ok(build_router(
        services,
        authorizer,
        settings.gateway.clone(),
        settings.trigger_secret.clone(),
    ))
}

/// Build the router around already-constructed collaborators.
pub fn build_router(
    services: Arc<services::AppServices>,
    authorizer: Authorizer,
    gateway: GatewaySettings,
    trigger_secret: Option<TriggerSecret>,
) -> Router {
    let gateway_state = middleware::GatewayState {
        authorizer: authorizer.clone(),
        gateway,
    };

    // Protected routes: every request passes the authorizer first.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            gateway_state,
            middleware::gateway_middleware,
        ));

    // Identity provider triggers: shared secret, no user token.
    let triggers = Router::new()
        .route(
            "/triggers/post-confirmation",
            post(routes::triggers::post_confirmation),
        )
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            trigger_secret,
            middleware::trigger_guard,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/authorizer", post(routes::authorizer::authorize))
        .layer(Extension(authorizer))
        .merge(triggers)
        .merge(protected)
}
