use std::borrow::Cow;

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::handler::ErrorKind;

/// JSON body of a failed request.
///
/// Serialized as `{name, message, resource?, context?}`. The status code
/// travels with the body but is never part of it.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Stable snake_case identifier of the failure.
    pub name: &'static str,
    /// Human-readable message, safe to show to clients.
    pub message: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    /// Returns the default body for the given kind.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            name: kind.name(),
            message: Cow::Borrowed(kind.default_message()),
            resource: None,
            context: None,
            status: kind.status_code(),
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Appends a resource segment, joined to any previous one with `/`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(join(self.resource.take(), resource.into(), "/"));
        self
    }

    /// Appends context, joined to any previous context with `; `.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(join(self.context.take(), context.into(), "; "));
        self
    }

    /// Copies any borrowed text so the body outlives its inputs.
    pub fn into_owned(self) -> ErrorResponse<'static> {
        ErrorResponse {
            name: self.name,
            message: Cow::Owned(self.message.into_owned()),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            status: self.status,
        }
    }
}

fn join<'a>(head: Option<Cow<'a, str>>, tail: Cow<'a, str>, sep: &str) -> Cow<'a, str> {
    match head {
        Some(head) => Cow::Owned(format!("{head}{sep}{tail}")),
        None => tail,
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::from_kind(ErrorKind::default())
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Json(self)).into_response();

        // Bearer challenge on every 401.
        if status == StatusCode::UNAUTHORIZED {
            let headers = response.headers_mut();
            headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}
