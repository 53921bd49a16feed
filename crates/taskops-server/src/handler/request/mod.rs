//! Request types for HTTP handlers.

mod agents;
mod authentications;
mod paginations;
mod paths;
mod tasks;

pub use agents::*;
pub use authentications::*;
pub use paginations::*;
pub use paths::*;
pub use tasks::*;
