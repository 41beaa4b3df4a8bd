//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`Tool`] trait objects and
//! implements the [`ToolLookup`] port the executor resolves calls through.
//!
//! # Usage
//!
//! ```ignore
//! use conductor_infrastructure::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_builtins();
//! assert!(registry.contains("read"));
//! assert!(registry.contains("grep"));
//!
//! // Later registrations replace earlier ones with the same name
//! registry.register(Arc::new(MyReadTool::new()));
//! ```
//!
//! Registration takes `&self`, so a registry shared behind an `Arc` can be
//! extended while the executor is already resolving calls.

use super::{BashTool, EditTool, GlobTool, GrepTool, ReadTool, WriteTool};
use conductor_application::ports::tool::{Tool, ToolLookup};
use conductor_domain::ToolDefinition;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Name → tool map behind a reader/writer lock
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Registry with read, write, edit, bash, glob and grep
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        let builtins: [Arc<dyn Tool>; 6] = [
            Arc::new(ReadTool::new()),
            Arc::new(WriteTool::new()),
            Arc::new(EditTool::new()),
            Arc::new(BashTool::new()),
            Arc::new(GlobTool::new()),
            Arc::new(GrepTool::new()),
        ];
        for tool in builtins {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool, returning the one it replaced
    pub fn register(&self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let replaced = self
            .tools
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.clone(), tool);
        if replaced.is_some() {
            tracing::debug!(tool = %name, "Replaced registered tool");
        }
        replaced
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolLookup for ToolRegistry {
    fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().unwrap_or_else(|e| e.into_inner());
        let mut definitions: Vec<ToolDefinition> =
            tools.values().map(|t| t.definition().clone()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}
