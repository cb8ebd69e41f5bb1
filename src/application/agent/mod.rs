mod directive;
mod errors;
mod models;
mod parser;
mod prompt;
mod runner;

#[cfg(test)]
mod tests;

pub use directive::Directive;
pub use errors::AgentError;
pub use models::{AgentOutcome, NO_OUTPUT_PLACEHOLDER, TraceStep};
pub use parser::parse_directive;
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, PromptTemplate, load_prompt_template};
pub use runner::Agent;
