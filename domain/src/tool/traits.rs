//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async `Tool` capability is defined in the application layer (ports).

use super::arguments::Arguments;
use super::entities::ToolDefinition;

/// Validator for tool arguments
///
/// This is a pure domain trait that validates arguments
/// against a tool declaration without any I/O operations.
pub trait ToolValidator {
    /// Validate call arguments against a definition
    fn validate(&self, args: &Arguments, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, args: &Arguments, definition: &ToolDefinition) -> Result<(), String> {
        // Check that all required parameters are present and non-empty
        for param in &definition.parameters {
            if !param.required {
                continue;
            }
            match args.get(&param.name) {
                None | Some(serde_json::Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
                    return Err(format!(
                        "Parameter '{}' for tool '{}' must not be empty",
                        param.name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }

        // Check that all provided arguments are valid parameters
        let valid_params: std::collections::HashSet<&str> =
            definition.parameters.iter().map(|p| p.name.as_str()).collect();

        for arg_name in args.keys() {
            if !valid_params.contains(arg_name.as_str()) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCall, ToolParameter};

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("test", "test tool")
            .with_parameter(ToolParameter::new("required_param", "A required param", true));

        let call = ToolCall::new("c1", "test");
        let result = validator.validate(&call.arguments, &definition);
        assert!(result.unwrap_err().contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_empty_required_string() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("bash", "Run a command")
            .with_parameter(ToolParameter::new("command", "Command", true));

        let call = ToolCall::new("c1", "bash").with_arg("command", "   ");
        let result = validator.validate(&call.arguments, &definition);
        assert!(result.unwrap_err().contains("must not be empty"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("test", "test tool")
            .with_parameter(ToolParameter::new("known_param", "A known param", false));

        let call = ToolCall::new("c1", "test").with_arg("unknown_param", "value");
        let result = validator.validate(&call.arguments, &definition);
        assert!(result.unwrap_err().contains("Unknown parameter"));
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let definition = ToolDefinition::new("test", "test tool")
            .with_parameter(ToolParameter::new("param1", "First param", true))
            .with_parameter(ToolParameter::new("param2", "Second param", false));

        let call = ToolCall::new("c1", "test")
            .with_arg("param1", "value1")
            .with_arg("param2", "value2");

        assert!(validator.validate(&call.arguments, &definition).is_ok());
    }
}
