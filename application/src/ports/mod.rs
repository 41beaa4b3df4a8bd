//! Port definitions (interfaces for external systems)
//!
//! Ports define the boundaries between the application and the outside
//! world. Adapters in the infrastructure layer implement these traits.

pub mod alert;
pub mod audit;
pub mod compactor;
pub mod execution_handler;
pub mod hooks;
pub mod llm_client;
pub mod permission;
pub mod redactor;
pub mod tool;
