use serde::{Deserialize, Serialize};

use kots_auth::GroupName;
use kots_core::UserId;

/// One row of the user table, keyed by `id` (the identity provider `sub`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(default = "default_role")]
    pub role: GroupName,
}

fn default_role() -> GroupName {
    GroupName::User
}

impl UserRecord {
    /// Record created by a key-value update on a missing id.
    pub fn bare(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            name: String::new(),
            country: None,
            zip_code: None,
            role: default_role(),
        }
    }

    pub fn apply(&mut self, update: UserUpdate) {
        self.name = update.name;
        self.country = update.country;
        self.zip_code = update.zip_code;
    }
}

/// Mutable profile attributes. All three are written on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}
