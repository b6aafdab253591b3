use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// User pool group recognized by the authorizer.
///
/// Group names are matched case-sensitively, the same way the identity
/// provider stores them. Any other group a token carries is dropped when the
/// claims are parsed, so it can never satisfy a rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupName {
    Admin,
    User,
}

impl GroupName {
    pub const ALL: [GroupName; 2] = [GroupName::Admin, GroupName::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupName::Admin => "Admin",
            GroupName::User => "User",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == name)
    }
}

impl core::fmt::Display for GroupName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown group '{0}'")]
pub struct UnknownGroup(pub String);

impl FromStr for GroupName {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownGroup(s.to_string()))
    }
}

/// Set of recognized groups attached to a verified identity.
pub type Groups = std::collections::BTreeSet<GroupName>;

/// Lenient `cognito:groups` decoding.
///
/// A missing claim, `null`, or anything that is not a list yields an empty set.
/// Non-string entries and unrecognized names are skipped.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Groups, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let groups = match raw {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(GroupName::from_name)
            .collect(),
        _ => Groups::new(),
    };
    Ok(groups)
}
