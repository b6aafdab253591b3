use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use kots_core::UserId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UserIdQuery>,
) -> axum::response::Response {
    let id = match parse_id(query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.get(&id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    let item = body.item;
    if let Err(e) = services.users.create(item.clone()).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(user = %item.id, principal = principal.principal_id(), "user created");
    (StatusCode::OK, Json(item)).into_response()
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::UserIdQuery>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let id = match parse_id(query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.update(&id, body).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::UserIdQuery>,
) -> axum::response::Response {
    let id = match parse_id(query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.delete(&id).await {
        Ok(Some(old)) => {
            tracing::info!(user = %id, principal = principal.principal_id(), "user deleted");
            (StatusCode::OK, Json(old)).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn parse_id(query: dto::UserIdQuery) -> Result<UserId, axum::response::Response> {
    let raw = query
        .id
        .ok_or_else(|| errors::json_error(StatusCode::BAD_REQUEST, "missing_id", "id query parameter is required"))?;
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"))
}
