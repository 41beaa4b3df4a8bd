//! Tool domain module
//!
//! Defines the pure data side of the tool system: what a tool declares
//! ([`ToolDefinition`]), how the model invokes it ([`ToolCall`]) and what
//! comes back ([`ToolResult`]).
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (declaration)  │    │ (invocation) │    │ (outcome)    │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! The async `Tool` capability and the registry port live in the
//! application layer; concrete tools live in infrastructure.

pub mod arguments;
pub mod entities;
pub mod traits;
pub mod value_objects;

pub use arguments::{Arguments, ArgumentsExt};
pub use entities::{ToolCall, ToolDefinition, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
