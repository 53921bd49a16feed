//! Application state, configuration and the services it holds.

pub mod auth;
mod config;
mod error;
mod state;

pub use crate::service::auth::{AuthHasher, AuthKeys, AuthKeysConfig};
pub use crate::service::config::ServiceConfig;
pub use crate::service::error::{Result, ServiceError};
pub use crate::service::state::{AppInfo, ServiceState};
