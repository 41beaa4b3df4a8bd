//! Tool domain entities

use super::arguments::{Arguments, ArgumentsExt};
use serde::{Deserialize, Serialize};

/// Machine-readable declaration of a tool
///
/// This is what gets advertised to the model and what
/// [`DefaultToolValidator`](super::traits::DefaultToolValidator) checks calls against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Render the declaration as a JSON Schema function object.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let json_type = match param.param_type.as_str() {
                "number" | "integer" => "number",
                "boolean" => "boolean",
                "array" => "array",
                "object" => "object",
                _ => "string",
            };
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": json_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(param.name.clone());
            }
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// A model-requested invocation of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call ID used to correlate the function response
    pub id: String,
    /// Name of the tool to call
    #[serde(rename = "name")]
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(rename = "args", default)]
    pub arguments: Arguments,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments: Arguments::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get_string(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("read", "Read file contents").with_parameter(
            ToolParameter::new("file_path", "File path to read", true).with_type("path"),
        );

        assert_eq!(tool.name, "read");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].name, "file_path");
        assert_eq!(tool.parameters[0].param_type, "path");
    }

    #[test]
    fn test_json_schema() {
        let tool = ToolDefinition::new("grep", "Search file contents")
            .with_parameter(ToolParameter::new("pattern", "Regex", true))
            .with_parameter(ToolParameter::new("limit", "Max results", false).with_type("number"));

        let schema = tool.to_json_schema();
        assert_eq!(schema["name"], "grep");
        assert_eq!(schema["parameters"]["properties"]["pattern"]["type"], "string");
        assert_eq!(schema["parameters"]["properties"]["limit"]["type"], "number");
        assert_eq!(schema["parameters"]["required"], serde_json::json!(["pattern"]));
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("call_1", "read").with_arg("file_path", "/test/file.txt");

        assert_eq!(call.id, "call_1");
        assert_eq!(call.tool_name, "read");
        assert_eq!(call.get_string("file_path"), Some("/test/file.txt"));
        assert_eq!(call.get_string("missing"), None);
    }

    #[test]
    fn test_tool_call_wire_names() {
        let call: ToolCall = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "bash",
            "args": {"command": "ls"}
        }))
        .unwrap();
        assert_eq!(call.tool_name, "bash");
        assert_eq!(call.get_string("command"), Some("ls"));
    }
}
