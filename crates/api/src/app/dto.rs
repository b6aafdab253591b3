use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use kots_infra::{UserRecord, UserUpdate};

// -------------------------
// Gateway / user pool events
// -------------------------

/// Only `TOKEN` authorizer events are accepted.
pub const TOKEN_EVENT_TYPE: &str = "TOKEN";

/// API Gateway `TOKEN` authorizer event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuthorizerEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub authorization_token: String,
    pub method_arn: String,
}

/// User pool post-confirmation trigger event (the parts the handler reads).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationEvent {
    pub user_pool_id: String,
    pub user_name: String,
    pub request: PostConfirmationRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationRequest {
    #[serde(default)]
    pub user_attributes: HashMap<String, String>,
}

// -------------------------
// User CRUD
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub item: UserRecord,
}

pub type UpdateUserRequest = UserUpdate;
