mod builtin;
mod error;
mod registry;

pub use builtin::{GetWeather, SearchWeb, default_registry};
pub use error::{ToolError, ToolExecutionError, ToolRegistryError};
pub use registry::{Tool, ToolDescriptor, ToolRegistry};
