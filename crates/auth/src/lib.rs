//! `kots-auth` — token verification and the authorization decision procedure.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorizer;
pub mod claims;
pub mod cognito;
pub mod decide;
pub mod groups;
pub mod policy;
pub mod request;
pub mod verifier;

pub use authorizer::{Authorizer, AuthzError, strip_bearer};
pub use claims::{ClaimExpectations, Claims, validate_claims};
pub use cognito::{CognitoConfig, CognitoJwtVerifier};
pub use decide::{Decision, decide, evaluate};
pub use groups::{GroupName, Groups};
pub use policy::{AuthorizerResponse, Effect, PolicyResult};
pub use request::{MethodArn, RequestDescriptor, RequestError, Verb};
pub use verifier::{Hs256JwtVerifier, IdentityVerifier, VerificationError};
