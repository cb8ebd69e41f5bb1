use super::directive::Directive;
use super::errors::AgentError;
use super::models::{AgentOutcome, NO_OUTPUT_PLACEHOLDER, TraceStep};
use super::parser::parse_directive;
use super::prompt::PromptTemplate;
use crate::application::tooling::{ToolError, ToolRegistry};
use crate::infrastructure::model::{CompletionProvider, CompletionRequest};
use tracing::{debug, info, warn};

/// Stop sequence handed to the completion capability so the model does not
/// fabricate its own observations.
const OBSERVATION_STOP: &str = "\nObservation:";

/// Bounded ReAct executor: asks the completion capability for a directive,
/// executes it against the registry, folds the result back into the running
/// transcript, and repeats until a final answer or budget exhaustion.
pub struct Agent<P: CompletionProvider> {
    provider: P,
    registry: ToolRegistry,
    template: PromptTemplate,
    max_iterations: usize,
}

impl<P: CompletionProvider> Agent<P> {
    pub fn new(
        provider: P,
        registry: ToolRegistry,
        template: PromptTemplate,
        max_iterations: usize,
    ) -> Self {
        Self {
            provider,
            registry,
            template,
            max_iterations,
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Runs one query to completion. Tool failures and malformed outputs are
    /// recovered in-loop as observations; a completion-capability failure
    /// fails the whole run and is not retried.
    pub async fn run(&self, query: &str) -> Result<AgentOutcome, AgentError> {
        info!("Agent run started");
        let tools = self.registry.list();
        let mut steps: Vec<TraceStep> = Vec::new();

        for iteration in 0..self.max_iterations {
            let scratchpad = render_scratchpad(&steps);
            let prompt = self.template.render(&tools, query, &scratchpad);
            debug!(iteration, "Submitting reasoning step to completion provider");

            let completion = self
                .provider
                .complete(CompletionRequest {
                    prompt,
                    stop: vec![OBSERVATION_STOP.to_string()],
                })
                .await?;

            match parse_directive(&completion) {
                Directive::FinalAnswer { text } => {
                    info!(steps = steps.len(), "Agent concluded with final answer");
                    return Ok(AgentOutcome {
                        answer: text,
                        steps,
                        concluded: true,
                    });
                }
                Directive::UseTool { name, input } => {
                    info!(tool = %name, "Agent requested tool execution");
                    let observation = match self.registry.invoke(&name, &input).await {
                        Ok(output) => output,
                        // Unknown tool is recoverable: tell the model and let
                        // it try again next iteration.
                        Err(ToolError::NotFound(_)) => format!(
                            "{name} is not a valid tool. Valid tools are: [{}].",
                            self.registry.names().join(", ")
                        ),
                        Err(error @ ToolError::Execution { .. }) => {
                            format!("Tool execution failed: {error}")
                        }
                    };
                    steps.push(TraceStep {
                        directive: Directive::UseTool { name, input },
                        observation,
                    });
                }
                Directive::Malformed { raw } => {
                    warn!("Completion output did not match the expected format");
                    steps.push(TraceStep {
                        directive: Directive::Malformed { raw },
                        observation: "Invalid format. Respond with 'Action:' and 'Action Input:' \
                                      lines to use a tool, or 'Final Answer:' to conclude."
                            .to_string(),
                    });
                }
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "Agent stopped without reaching a final answer"
        );
        Ok(AgentOutcome {
            answer: NO_OUTPUT_PLACEHOLDER.to_string(),
            steps,
            concluded: false,
        })
    }
}

/// Renders the execution trace as a ReAct transcript for the next prompt.
fn render_scratchpad(steps: &[TraceStep]) -> String {
    let mut transcript = String::new();
    for step in steps {
        match &step.directive {
            Directive::UseTool { name, input } => {
                transcript.push_str(&format!("Action: {name}\nAction Input: {input}\n"));
            }
            Directive::Malformed { raw } => {
                transcript.push_str(raw);
                transcript.push('\n');
            }
            // Final answers end the run; they never enter the trace.
            Directive::FinalAnswer { .. } => {}
        }
        transcript.push_str(&format!("Observation: {}\nThought: ", step.observation));
    }
    transcript
}
