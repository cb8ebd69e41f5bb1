use super::*;
use crate::application::tooling::{
    Tool, ToolExecutionError, ToolRegistry, default_registry,
};
use crate::infrastructure::model::{CompletionError, CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
struct ScriptedProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn requests(&self) -> Vec<CompletionRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(CompletionError::InvalidResponse("script exhausted".into()));
        }
        let response = responses.remove(0);
        self.recordings.lock().await.push(request);
        Ok(response)
    }
}

struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::MissingCredentials)
    }
}

struct FlakyTool;

#[async_trait]
impl Tool for FlakyTool {
    fn name(&self) -> &str {
        "flaky"
    }

    fn description(&self) -> &str {
        "A tool whose backend is down."
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolExecutionError> {
        Err(ToolExecutionError("backend unreachable".into()))
    }
}

fn agent_with(provider: ScriptedProvider, max_iterations: usize) -> Agent<ScriptedProvider> {
    Agent::new(
        provider,
        default_registry().expect("builtin registry"),
        PromptTemplate::default(),
        max_iterations,
    )
}

#[tokio::test]
async fn returns_final_answer_without_tools() {
    let provider = ScriptedProvider::new(vec!["Thought: trivial\nFinal Answer: 4"]);
    let agent = agent_with(provider.clone(), 10);

    let outcome = agent.run("What is 2+2?").await.expect("agent succeeds");

    assert_eq!(outcome.answer, "4");
    assert!(outcome.concluded);
    assert!(outcome.steps.is_empty());

    let records = provider.requests().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].prompt.contains("Question: What is 2+2?"));
    assert!(records[0].prompt.contains("search_web"));
    assert!(records[0].prompt.contains("get_weather"));
    assert_eq!(records[0].stop, vec!["\nObservation:".to_string()]);
}

#[tokio::test]
async fn executes_tool_then_concludes() {
    let provider = ScriptedProvider::new(vec![
        "Thought: need data\nAction: search_web\nAction Input: rust news",
        "Thought: done\nFinal Answer: here is what I found",
    ]);
    let agent = agent_with(provider.clone(), 10);

    let outcome = agent.run("any rust news?").await.expect("agent succeeds");

    assert_eq!(outcome.answer, "here is what I found");
    assert!(outcome.concluded);
    assert_eq!(outcome.steps.len(), 1);
    assert!(
        outcome.steps[0]
            .observation
            .contains("Search results for 'rust news'")
    );

    let records = provider.requests().await;
    assert_eq!(records.len(), 2);
    // The second prompt carries the transcript of the first step.
    assert!(records[1].prompt.contains("Action: search_web"));
    assert!(records[1].prompt.contains("Observation: Search results for 'rust news'"));
    assert!(records[1].prompt.ends_with("Thought: "));
}

#[tokio::test]
async fn unknown_tool_is_recoverable() {
    let provider = ScriptedProvider::new(vec![
        "Action: get_stock_price\nAction Input: AAPL",
        "Final Answer: I cannot look up stock prices.",
    ]);
    let agent = agent_with(provider, 10);

    let outcome = agent.run("AAPL price?").await.expect("agent succeeds");

    assert!(outcome.concluded);
    assert_eq!(outcome.steps.len(), 1);
    assert!(
        outcome.steps[0]
            .observation
            .contains("get_stock_price is not a valid tool")
    );
    assert!(outcome.steps[0].observation.contains("search_web"));
}

#[tokio::test]
async fn malformed_output_is_recoverable() {
    let provider = ScriptedProvider::new(vec![
        "I think the answer might be around four-ish.",
        "Final Answer: 4",
    ]);
    let agent = agent_with(provider, 10);

    let outcome = agent.run("2+2").await.expect("agent succeeds");

    assert_eq!(outcome.answer, "4");
    assert_eq!(outcome.steps.len(), 1);
    assert!(matches!(
        outcome.steps[0].directive,
        Directive::Malformed { .. }
    ));
    assert!(outcome.steps[0].observation.contains("Invalid format"));
}

#[tokio::test]
async fn tool_failure_folds_into_observation() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FlakyTool)).expect("register flaky");
    let provider = ScriptedProvider::new(vec![
        "Action: flaky\nAction Input: anything",
        "Final Answer: the tool is down",
    ]);
    let agent = Agent::new(provider, registry, PromptTemplate::default(), 10);

    let outcome = agent.run("try the tool").await.expect("agent succeeds");

    assert!(outcome.concluded);
    assert_eq!(outcome.steps.len(), 1);
    assert!(outcome.steps[0].observation.contains("Tool execution failed"));
    assert!(outcome.steps[0].observation.contains("backend unreachable"));
}

#[tokio::test]
async fn budget_exhaustion_returns_placeholder() {
    let provider = ScriptedProvider::new(vec![
        "Action: search_web\nAction Input: first",
        "Action: search_web\nAction Input: second",
    ]);
    let agent = agent_with(provider, 2);

    let outcome = agent.run("endless question").await.expect("agent succeeds");

    assert_eq!(outcome.answer, NO_OUTPUT_PLACEHOLDER);
    assert!(!outcome.concluded);
    assert_eq!(outcome.steps.len(), 2);
}

#[tokio::test]
async fn trace_never_exceeds_iteration_budget() {
    for budget in [1, 3, 5] {
        let responses = vec!["Action: search_web\nAction Input: more"; budget + 2];
        let provider = ScriptedProvider::new(responses);
        let agent = agent_with(provider, budget);

        let outcome = agent.run("q").await.expect("agent succeeds");
        assert!(
            outcome.steps.len() <= budget,
            "budget {budget} produced {} steps",
            outcome.steps.len()
        );
    }
}

#[tokio::test]
async fn completion_failure_fails_the_run() {
    let agent = Agent::new(
        FailingProvider,
        default_registry().expect("builtin registry"),
        PromptTemplate::default(),
        10,
    );

    let error = agent.run("anything").await.unwrap_err();
    assert!(matches!(
        error,
        AgentError::Completion(CompletionError::MissingCredentials)
    ));
}
