//! Infrastructure layer: configuration and adapters for the managed services
//! the backend consumes (user table, identity provider group admin).

pub mod config;
pub mod directory;
pub mod users;

pub use config::{ConfigError, GatewaySettings, IdentitySettings, Settings, TriggerSecret};
pub use directory::{DirectoryError, GroupDirectory, InMemoryGroupDirectory};
pub use users::{InMemoryUserStore, StoreError, UserRecord, UserStore, UserUpdate};
