use super::error::{ToolError, ToolRegistryError};
use super::ToolExecutionError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A callable capability with a single-string-in, single-string-out contract.
///
/// The description is free text handed verbatim to the reasoning model; the
/// loop never interprets it, only the name is used for dispatch.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn invoke(&self, input: &str) -> Result<String, ToolExecutionError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

/// Named set of tools, validated against duplicate names at registration and
/// read-only afterwards.
pub struct ToolRegistry {
    order: Vec<Arc<dyn Tool>>,
    index: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolRegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolRegistryError::DuplicateName(name));
        }
        self.index.insert(name, Arc::clone(&tool));
        self.order.push(tool);
        Ok(())
    }

    /// Descriptors in registration order, for prompt construction.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn invoke(&self, name: &str, input: &str) -> Result<String, ToolError> {
        let Some(tool) = self.index.get(name) else {
            warn!(requested_tool = %name, "Unknown tool requested");
            return Err(ToolError::NotFound(name.to_string()));
        };

        match tool.invoke(input).await {
            Ok(output) => {
                info!(tool = %name, "Tool executed");
                Ok(output)
            }
            Err(source) => {
                warn!(tool = %name, %source, "Tool execution failed");
                Err(ToolError::Execution {
                    tool: name.to_string(),
                    source,
                })
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input."
        }

        async fn invoke(&self, input: &str) -> Result<String, ToolExecutionError> {
            Ok(format!("echo: {input}"))
        }
    }

    struct Broken;

    #[async_trait]
    impl Tool for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        async fn invoke(&self, _input: &str) -> Result<String, ToolExecutionError> {
            Err(ToolExecutionError("wire pulled".into()))
        }
    }

    #[tokio::test]
    async fn invokes_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo)).expect("register echo");

        let output = registry.invoke("echo", "hi").await.expect("invoke succeeds");
        assert_eq!(output, "echo: hi");
    }

    #[tokio::test]
    async fn unknown_tool_fails_with_not_found() {
        let registry = ToolRegistry::new();
        let error = registry.invoke("missing", "x").await.unwrap_err();
        assert!(matches!(error, ToolError::NotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn tool_failure_is_wrapped_with_tool_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Broken)).expect("register broken");

        let error = registry.invoke("broken", "x").await.unwrap_err();
        match error {
            ToolError::Execution { tool, source } => {
                assert_eq!(tool, "broken");
                assert_eq!(source.to_string(), "wire pulled");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo)).expect("first register");
        let error = registry.register(Arc::new(Echo)).unwrap_err();
        assert!(matches!(error, ToolRegistryError::DuplicateName(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn list_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Broken)).expect("register broken");
        registry.register(Arc::new(Echo)).expect("register echo");

        let names: Vec<_> = registry.list().into_iter().map(|tool| tool.name).collect();
        assert_eq!(names, vec!["broken", "echo"]);
    }
}
