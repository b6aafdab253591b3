use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use kots_auth::GroupName;
use kots_core::UserId;
use kots_infra::{StoreError, UserRecord};

use crate::app::dto::PostConfirmationEvent;
use crate::app::errors;
use crate::app::services::AppServices;

/// Post-confirmation trigger: create the new user's table record and enrol
/// them in the default group. The event is echoed back unchanged.
///
/// The record is created conditionally; a user that already exists is a
/// conflict and neither the record nor the group membership is touched.
pub async fn post_confirmation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(raw): Json<serde_json::Value>,
) -> axum::response::Response {
    match register_confirmed_user(&services, &raw).await {
        Ok(()) => (StatusCode::OK, Json(raw)).into_response(),
        Err(e) if matches!(e.downcast_ref::<StoreError>(), Some(StoreError::AlreadyExists(_))) => {
            tracing::warn!(error = %e, "post-confirmation for an existing user");
            errors::json_error(StatusCode::CONFLICT, "conflict", "User already exists")
        }
        Err(e) => {
            tracing::error!(error = %e, "post-confirmation failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "trigger_error",
                "Error creating user",
            )
        }
    }
}

async fn register_confirmed_user(services: &AppServices, raw: &serde_json::Value) -> anyhow::Result<()> {
    let event: PostConfirmationEvent = serde_json::from_value(raw.clone())?;
    let attrs = &event.request.user_attributes;
    let attr = |key: &str| attrs.get(key).cloned();

    let id: UserId = attr("sub")
        .ok_or_else(|| anyhow::anyhow!("missing sub attribute"))?
        .parse()?;

    let record = UserRecord {
        id,
        email: attr("email").unwrap_or_default(),
        name: attr("name").unwrap_or_default(),
        country: attr("custom:country"),
        zip_code: attr("custom:zipcode"),
        role: GroupName::User,
    };
    services.users.create(record).await?;

    services
        .directory
        .add_user_to_group(&event.user_pool_id, &event.user_name, GroupName::User)
        .await?;

    tracing::info!(user = %id, username = %event.user_name, "confirmed user registered");
    Ok(())
}
