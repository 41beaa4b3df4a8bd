//! Tool safety: risk levels, static metadata and pre-flight checks.
//!
//! ```text
//! SafetyValidator::pre_flight(tool, args, ctx) ──▶ PreFlightCheck
//! SafetyValidator::get_summary(tool, args)     ──▶ ExecutionSummary
//! ```

pub mod level;
pub mod metadata;
pub mod preflight;
pub mod validator;

pub use level::{SafetyLevel, ToolCategory};
pub use metadata::ToolSafetyMetadata;
pub use preflight::{ExecutionSummary, PreFlightCheck, SafetyContext};
pub use validator::SafetyValidator;
