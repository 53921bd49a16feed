//! The error every handler and extractor rejection is funnelled into.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// A failed request: its [`ErrorKind`] plus the body that will be sent.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    body: ErrorResponse<'a>,
}

impl Error<'static> {
    /// Creates an error carrying the default body of `kind`.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            body: ErrorResponse::from_kind(kind),
        }
    }
}

impl<'a> Error<'a> {
    /// Replaces the client-facing message.
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self.kind,
            body: self.body.with_message(message),
        }
    }

    /// Names the resource the failure concerns.
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self.kind,
            body: self.body.with_resource(resource),
        }
    }

    /// Adds extra detail for the client.
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self.kind,
            body: self.body.with_context(context),
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message that will be sent.
    #[inline]
    pub fn message(&self) -> &str {
        &self.body.message
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.body.resource.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.body.context.as_deref()
    }

    /// Detaches the error from any borrowed input.
    pub fn into_owned(self) -> Error<'static> {
        Error {
            kind: self.kind,
            body: self.body.into_owned(),
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.body.status.as_u16(), self.kind, self.body.message)?;
        if let Some(resource) = self.resource() {
            write!(f, " ({resource})")?;
        }
        if let Some(context) = self.context() {
            write!(f, ", {context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    #[inline]
    fn into_response(self) -> Response {
        self.body.into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result alias for handlers and extractors.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Category of a failed request. Decides the status code and `name` field.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    /// No bearer token on a protected route.
    MissingAuthToken,
    /// Bad credentials, or a token that does not verify.
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    #[default]
    InternalServerError,
    /// The database could not be reached.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Identifier sent as the `name` field.
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MissingAuthToken | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message used when the error does not override it.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed due to invalid data",
            Self::MissingAuthToken => "Not authenticated",
            Self::Unauthorized => "Could not validate credentials",
            Self::Forbidden => "You don't have permission to access this resource",
            Self::NotFound => "The requested resource was not found",
            Self::Conflict => "The request conflicts with the current state of the resource",
            Self::InternalServerError => "An internal server error occurred. Please try again later",
            Self::ServiceUnavailable => "The service is temporarily unavailable. Please try again later",
        }
    }

    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_message(message)
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_resource(resource)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        self.into_error().with_context(context)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::WWW_AUTHENTICATE;

    use super::*;

    const ALL_KINDS: [ErrorKind; 8] = [
        ErrorKind::BadRequest,
        ErrorKind::MissingAuthToken,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::InternalServerError,
        ErrorKind::ServiceUnavailable,
    ];

    #[test]
    fn default_is_internal() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(ErrorKind::MissingAuthToken.name(), "missing_auth_token");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(ErrorKind::InternalServerError.name(), "internal_server_error");
    }

    #[test]
    fn message_override_and_fallback() {
        let error = ErrorKind::NotFound.with_message("Task not found");
        assert_eq!(error.message(), "Task not found");

        let error = ErrorKind::Unauthorized.into_error();
        assert_eq!(error.message(), "Could not validate credentials");
    }

    #[test]
    fn display_includes_details() {
        let display = ErrorKind::NotFound
            .with_message("Task not found")
            .with_resource("task")
            .with_context("id 123")
            .to_string();

        assert_eq!(display, "404 not_found: Task not found (task), id 123");
    }

    #[test]
    fn into_owned_keeps_details() {
        let resource = String::from("task");
        let error = ErrorKind::Conflict.with_resource(resource.as_str()).into_owned();
        drop(resource);

        assert_eq!(error.resource(), Some("task"));
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn unauthorized_kinds_challenge_bearer() {
        for kind in [ErrorKind::MissingAuthToken, ErrorKind::Unauthorized] {
            let response = kind.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(WWW_AUTHENTICATE).map(|v| v.as_bytes()),
                Some(b"Bearer".as_slice())
            );
        }
    }

    #[test]
    fn every_kind_is_an_error_status() {
        for kind in ALL_KINDS {
            assert!(kind.status_code().is_client_error() || kind.status_code().is_server_error());
            assert!(!kind.default_message().is_empty());
            assert_eq!(kind.status_code(), kind.into_response().status());
        }
    }
}
