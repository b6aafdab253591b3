//! HTTP API: the enforcing gateway, the token authorizer endpoint, the
//! post-confirmation trigger and the user CRUD handler.

pub mod app;
pub mod context;
pub mod middleware;
