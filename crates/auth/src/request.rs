//! Request descriptors: the verb and resource an authorization applies to.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested operation type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("unsupported verb '{0}'")]
    UnsupportedVerb(String),

    #[error("malformed method arn: {0}")]
    MalformedArn(String),
}

impl FromStr for Verb {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| RequestError::UnsupportedVerb(s.to_string()))
    }
}

/// Immutable per-request descriptor handed to the decision procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub resource: String,
    pub verb: Verb,
}

impl RequestDescriptor {
    /// Descriptor for a gateway method ARN. The resource is the ARN exactly
    /// as received, so the issued policy matches what the gateway asked for.
    pub fn from_method_arn(method_arn: &str) -> Result<Self, RequestError> {
        let arn = MethodArn::parse(method_arn)?;
        Ok(Self {
            resource: method_arn.to_string(),
            verb: arn.verb,
        })
    }
}

/// API Gateway method ARN.
///
/// `arn:<partition>:execute-api:<region>:<account>:<api-id>/<stage>/<VERB>/<path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArn {
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub api_id: String,
    pub stage: String,
    pub verb: Verb,
    /// Resource path without the leading slash (may be empty).
    pub path: String,
}

impl MethodArn {
    /// Parse a method ARN. Only the verb is interpreted; the path is opaque.
    pub fn parse(arn: &str) -> Result<Self, RequestError> {
        let malformed = || RequestError::MalformedArn(arn.to_string());

        let mut parts = arn.splitn(6, ':');
        let (Some("arn"), Some(partition), Some("execute-api"), Some(region), Some(account), Some(rest)) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(malformed());
        };

        let mut segments = rest.splitn(4, '/');
        let (Some(api_id), Some(stage), Some(verb)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(malformed());
        };
        if api_id.is_empty() || stage.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            partition: partition.to_string(),
            region: region.to_string(),
            account_id: account.to_string(),
            api_id: api_id.to_string(),
            stage: stage.to_string(),
            verb: verb.parse()?,
            path: segments.next().unwrap_or_default().to_string(),
        })
    }
}

impl core::fmt::Display for MethodArn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "arn:{}:execute-api:{}:{}:{}/{}/{}",
            self.partition, self.region, self.account_id, self.api_id, self.stage, self.verb
        )?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        Ok(())
    }
}

impl FromStr for MethodArn {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
