use super::error::{ToolExecutionError, ToolRegistryError};
use super::registry::{Tool, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Placeholder web search. Swap in a real search API client in production.
pub struct SearchWeb;

#[async_trait]
impl Tool for SearchWeb {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Use this tool when you need to find \
         recent information, facts, or data that might not be in your training data. \
         Input should be a search query string."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolExecutionError> {
        info!(query = %input, "Searching web");
        Ok(format!(
            "Search results for '{input}': This is a placeholder. Integrate with a real search API in production."
        ))
    }
}

/// Placeholder weather lookup. Swap in a real weather API client in production.
pub struct GetWeather;

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather information for a specific location. Input should be a \
         location name (e.g., 'New York', 'London')."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolExecutionError> {
        info!(location = %input, "Getting weather");
        Ok(format!(
            "Weather for {input}: This is a placeholder. Integrate with a real weather API in production."
        ))
    }
}

/// The fixed tool set available to the agent executor.
pub fn default_registry() -> Result<ToolRegistry, ToolRegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchWeb))?;
    registry.register(Arc::new(GetWeather))?;
    Ok(registry)
}
