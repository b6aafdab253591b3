use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use kots_auth::{Authorizer, AuthorizerResponse};

use crate::app::{dto, errors};

/// `TOKEN` authorizer entrypoint: returns the policy document for the
/// gateway to enforce, or a bare unauthorized rejection.
pub async fn authorize(
    Extension(authorizer): Extension<Authorizer>,
    Json(event): Json<dto::TokenAuthorizerEvent>,
) -> axum::response::Response {
    if event.kind != dto::TOKEN_EVENT_TYPE {
        tracing::warn!(kind = %event.kind, "rejecting non-TOKEN authorizer event");
        return errors::unauthorized();
    }
    match authorizer
        .authorize(&event.authorization_token, &event.method_arn)
        .await
    {
        Ok(policy) => (StatusCode::OK, Json(AuthorizerResponse::from(&policy))).into_response(),
        Err(_) => errors::unauthorized(),
    }
}
