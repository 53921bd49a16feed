//! Named constraints from the migrations, parsed from database errors.

use std::fmt;

use strum::{Display, EnumString};

/// Constraints on the `accounts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_email_lowercase")]
    EmailLowercase,
    #[strum(serialize = "accounts_email_not_empty")]
    EmailNotEmpty,
    #[strum(serialize = "accounts_password_hash_not_empty")]
    PasswordHashNotEmpty,
    #[strum(serialize = "accounts_email_unique_idx")]
    EmailUnique,
}

/// Constraints on the `tasks` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum TaskConstraints {
    #[strum(serialize = "tasks_title_length")]
    TitleLength,
    /// Postgres' default name for the `owner_id` foreign key.
    #[strum(serialize = "tasks_owner_id_fkey")]
    OwnerExists,
}

/// Any constraint this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    Task(TaskConstraints),
}

impl ConstraintViolation {
    /// Looks up a constraint by the name Postgres reported.
    ///
    /// ```
    /// use taskops_postgres::types::{AccountConstraints, ConstraintViolation};
    ///
    /// assert_eq!(
    ///     ConstraintViolation::new("accounts_email_unique_idx"),
    ///     Some(ConstraintViolation::Account(AccountConstraints::EmailUnique)),
    /// );
    /// assert_eq!(ConstraintViolation::new("pg_catalog_thing"), None);
    /// ```
    pub fn new(name: &str) -> Option<Self> {
        let account = || name.parse().ok().map(Self::Account);
        let task = || name.parse().ok().map(Self::Task);
        account().or_else(task)
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Account(_) => "accounts",
            Self::Task(_) => "tasks",
        }
    }

    #[inline]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Account(AccountConstraints::EmailUnique))
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(c) => fmt::Display::fmt(c, f),
            Self::Task(c) => fmt::Display::fmt(c, f),
        }
    }
}
