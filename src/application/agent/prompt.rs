use crate::application::tooling::ToolDescriptor;
use std::path::Path;
use tracing::{info, warn};

/// Built-in ReAct reasoning template, used whenever no external template is
/// configured or the configured one cannot be read.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a helpful AI assistant. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {input}
Thought: {agent_scratchpad}";

/// Reasoning prompt with `{tools}`, `{tool_names}`, `{input}` and
/// `{agent_scratchpad}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, tools: &[ToolDescriptor], query: &str, scratchpad: &str) -> String {
        let tool_lines = tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name, tool.description))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = tools
            .iter()
            .map(|tool| tool.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        self.template
            .replace("{tools}", &tool_lines)
            .replace("{tool_names}", &tool_names)
            .replace("{input}", query)
            .replace("{agent_scratchpad}", scratchpad)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_TEMPLATE)
    }
}

/// Loads the reasoning template from `path` when configured. Any failure
/// falls back to the built-in template; callers never see the difference,
/// the substitution is only logged.
pub fn load_prompt_template(path: Option<&Path>) -> PromptTemplate {
    let Some(path) = path else {
        return PromptTemplate::default();
    };
    match std::fs::read_to_string(path) {
        Ok(content) => {
            info!(path = %path.display(), "Loaded reasoning prompt template");
            PromptTemplate::new(content)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "Could not load prompt template; using built-in default");
            PromptTemplate::default()
        }
    }
}
