//! HTTP request extractors.
//!
//! All extractors reject with [`Error`], so every malformed or unauthorized
//! request produces the same JSON error body.
//!
//! - [`AuthHeader`], [`AuthState`], [`ActiveAccount`] and [`AuthProvider`]
//!   authenticate and authorize the caller.
//! - [`Json`], [`ValidateJson`], [`Path`], [`Query`] and [`Form`] replace
//!   their `axum` counterparts.
//!
//! [`Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{ActiveAccount, AuthHeader, AuthProvider, AuthState};
pub use crate::extract::reject::{Form, Json, Path, Query, ValidateJson};
