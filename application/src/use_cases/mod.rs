//! Use cases (application services)

pub mod executor;
pub(crate) mod tool_helpers;
