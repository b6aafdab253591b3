/// Principal context for a request that the gateway allowed.
///
/// Inserted into request extensions by the gateway middleware; immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: String,
}

impl PrincipalContext {
    pub fn new(principal_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
        }
    }

    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }
}
