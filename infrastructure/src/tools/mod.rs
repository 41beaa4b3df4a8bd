//! Built-in tools and the tool registry
//!
//! Concrete [`Tool`](conductor_application::Tool) implementations that
//! work against the local file system and shell:
//!
//! | Tool | Module |
//! |------|--------|
//! | `read`, `write`, `edit` | [`file`] |
//! | `bash` | [`command`] |
//! | `glob`, `grep` | [`search`] |

pub mod command;
pub mod file;
pub mod search;

mod registry;

pub use command::BashTool;
pub use file::{EditTool, ReadTool, WriteTool};
pub use registry::ToolRegistry;
pub use search::{GlobTool, GrepTool};
