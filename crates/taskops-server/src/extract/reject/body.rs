//! Body extractors: [`Json`] and [`Form`].

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{bad_request, short_detail};
use crate::handler::{Error, ErrorKind};

/// [`axum::Json`] with an [`Error`] rejection. Also usable as a response.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    #[inline]
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                bad_request("Expected an application/json body", "")
            }
            JsonRejection::JsonSyntaxError(_) => bad_request("Malformed JSON body", &detail),
            JsonRejection::JsonDataError(_) => bad_request("Unexpected JSON shape", &detail),
            JsonRejection::BytesRejection(_) => bad_request("Unreadable request body", &detail),
            _ => ErrorKind::InternalServerError.with_context(short_detail(&detail)),
        }
    }
}

/// [`axum::Form`] for `application/x-www-form-urlencoded` bodies, with an
/// [`Error`] rejection.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Form(value) = axum::Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<FormRejection> for Error<'static> {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::InvalidFormContentType(_) => {
                bad_request("Expected an application/x-www-form-urlencoded body", "")
            }
            other => bad_request("Invalid form fields", &other.body_text()),
        }
    }
}
