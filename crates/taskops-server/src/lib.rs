#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

/// Tracing target for token and identity resolution.
pub const TRACING_TARGET_AUTHENTICATION: &str = "taskops_server::authentication";

/// Tracing target for access decisions on resolved identities.
pub const TRACING_TARGET_AUTHORIZATION: &str = "taskops_server::authorization";
