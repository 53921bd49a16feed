//! Mapping of database failures onto HTTP errors.

use taskops_postgres::PgError;
use taskops_postgres::types::{AccountConstraints, ConstraintViolation, TaskConstraints};

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "taskops_server::handler::database";

impl From<ConstraintViolation> for Error<'static> {
    fn from(violation: ConstraintViolation) -> Self {
        let error = match violation {
            ConstraintViolation::Account(AccountConstraints::EmailUnique) => ErrorKind::Conflict
                .with_message("A user with this email already exists.")
                .with_resource("account"),
            ConstraintViolation::Account(
                AccountConstraints::EmailLowercase | AccountConstraints::EmailNotEmpty,
            ) => ErrorKind::BadRequest
                .with_message("Invalid email address")
                .with_resource("account"),
            ConstraintViolation::Task(TaskConstraints::TitleLength) => ErrorKind::BadRequest
                .with_message("Title must be between 1 and 255 characters")
                .with_resource("task"),
            // Guarded by the handlers; hitting one is a bug, not bad input.
            ConstraintViolation::Account(AccountConstraints::PasswordHashNotEmpty)
            | ConstraintViolation::Task(TaskConstraints::OwnerExists) => {
                return ErrorKind::InternalServerError.into_error();
            }
        };

        error.with_context(format!("violates {violation}"))
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(violation) = error.constraint_violation() {
            tracing::warn!(target: TRACING_TARGET, %violation, "constraint rejected the write");
            return violation.into();
        }

        if error.is_transient() || matches!(error, PgError::Connection(_)) {
            tracing::error!(target: TRACING_TARGET, %error, "database unavailable");
            return ErrorKind::ServiceUnavailable.into_error();
        }

        tracing::error!(target: TRACING_TARGET, %error, "database call failed");
        ErrorKind::InternalServerError.into_error()
    }
}
