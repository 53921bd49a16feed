//! Constraint names and column enums shared with the schema.

mod constraints;
mod enums;

pub use constraints::{AccountConstraints, ConstraintViolation, TaskConstraints};
pub use enums::TaskStatus;
