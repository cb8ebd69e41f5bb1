use thiserror::Error;

/// Failure raised inside a tool body. The builtin placeholder tools never
/// fail, but the contract admits real implementations that do.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ToolExecutionError(pub String);

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    NotFound(String),
    #[error("failed to execute tool '{tool}': {source}")]
    Execution {
        tool: String,
        #[source]
        source: ToolExecutionError,
    },
}

#[derive(Debug, Error)]
pub enum ToolRegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),
}
