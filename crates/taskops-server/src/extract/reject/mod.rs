//! Drop-in replacements for the `axum` extractors that reject with
//! [`Error`], so every malformed request gets the same error body.
//!
//! [`Error`]: crate::handler::Error

mod body;
mod parts;
mod validated_json;

pub use self::body::{Form, Json};
pub use self::parts::{Path, Query};
pub use self::validated_json::ValidateJson;
use crate::handler::{Error, ErrorKind};

/// Rejection details are cut to one line of at most 200 characters.
fn short_detail(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    line.chars().take(200).collect()
}

fn bad_request(message: &'static str, detail: &str) -> Error<'static> {
    let error = ErrorKind::BadRequest.with_message(message);
    match short_detail(detail) {
        detail if detail.is_empty() => error,
        detail => error.with_context(detail),
    }
}
