//! User table: record shape and key-value store abstraction.

pub mod record;
pub mod store;

pub use record::{UserRecord, UserUpdate};
pub use store::{InMemoryUserStore, StoreError, UserStore};
