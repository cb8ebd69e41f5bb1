use super::directive::Directive;

/// Answer text returned when the iteration budget runs out before the model
/// concludes. A soft failure: the caller still receives a normal response.
pub const NO_OUTPUT_PLACEHOLDER: &str = "No output generated";

/// One completed loop iteration: what the model decided and what came back.
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub directive: Directive,
    pub observation: String,
}

/// Result of one agent run. The trace is request-local and discarded with it.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub answer: String,
    pub steps: Vec<TraceStep>,
    /// False when the run was cut off by the iteration budget.
    pub concluded: bool,
}
