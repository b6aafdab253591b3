use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kots_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::AlreadyExists(id) => {
            json_error(StatusCode::CONFLICT, "conflict", format!("user {id} already exists"))
        }
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "user table unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

/// Generic rejection for any authentication/authorization failure.
pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized")
}

/// Explicit Deny policy for a recognized principal.
pub fn forbidden() -> axum::response::Response {
    json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "User is not authorized to access this resource",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
