//! [`ValidateJson`]: deserialize, then run [`Validate`].

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON body that also passed its [`Validate`] rules.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Describes the broken rule. Never includes the rejected value.
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = error.message.as_deref() {
        return format!("Field '{field}': {message}");
    }

    let param = |key: &str| error.params.get(key).and_then(serde_json::Value::as_u64);
    let rule = match (error.code.as_ref(), param("min"), param("max")) {
        ("email", ..) => "must be a valid email address".to_owned(),
        ("length", Some(min), Some(max)) => format!("must be between {min} and {max} characters long"),
        ("length", Some(min), None) => format!("must be at least {min} characters long"),
        ("length", None, Some(max)) => format!("must be at most {max} characters long"),
        (code, ..) => format!("is invalid ({code})"),
    };
    format!("Field '{field}' {rule}")
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();

        let mut problems = Vec::new();
        for (field, field_errors) in &fields {
            problems.extend(field_errors.iter().map(|e| describe(field, e)));
        }
        problems.sort_unstable();

        tracing::debug!(fields = ?fields.keys().collect::<Vec<_>>(), "request body failed validation");

        let message = if problems.is_empty() {
            "Validation failed".to_owned()
        } else {
            problems.join(". ")
        };
        ErrorKind::BadRequest.with_message(message).with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Debug, Validate)]
    struct Credentials {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, max = 64))]
        password: String,
    }

    #[derive(Debug, Validate)]
    struct Title {
        #[validate(length(min = 1))]
        title: String,
    }

    #[test]
    fn messages_name_fields_but_not_values() {
        let credentials = Credentials {
            email: "nope".into(),
            password: "short".into(),
        };

        let error: Error = credentials
            .validate()
            .expect_err("both fields are invalid")
            .into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("request"));

        let message = error.message();
        assert!(message.contains("Field 'email' must be a valid email address"));
        assert!(message.contains("Field 'password' must be between 8 and 64 characters long"));
        assert!(!message.contains("short"));
        assert!(!message.contains("nope"));
    }

    #[test]
    fn lower_bound_only() {
        let error: Error = Title { title: String::new() }
            .validate()
            .expect_err("empty title")
            .into();

        assert_eq!(error.message(), "Field 'title' must be at least 1 characters long");
    }
}
