//! Argument map shared by tool calls, validators and tools.

use std::collections::HashMap;

/// Arguments of a tool call, keyed by parameter name
pub type Arguments = HashMap<String, serde_json::Value>;

/// Typed accessors over an [`Arguments`] map
pub trait ArgumentsExt {
    /// Get a string argument
    fn get_string(&self, key: &str) -> Option<&str>;

    /// Get the first present string argument among `keys`
    fn first_string(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get_string(k))
    }

    /// Get a required string argument or return an error message
    fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    fn get_i64(&self, key: &str) -> Option<i64>;

    /// Get an optional bool argument
    fn get_bool(&self, key: &str) -> Option<bool>;
}

impl ArgumentsExt for Arguments {
    fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }
}
