use crate::application::agent::{Agent, load_prompt_template};
use crate::application::tooling::{ToolRegistryError, default_registry};
use crate::config::AppConfig;
use crate::infrastructure::model::CompletionProvider;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

#[derive(Debug, Error)]
pub enum AgentInitError {
    #[error("failed to assemble tool registry: {0}")]
    Registry(#[from] ToolRegistryError),
}

impl AgentInitError {
    pub fn user_message(&self) -> String {
        "The agent executor could not be initialized.".to_string()
    }
}

/// Shared gateway state. The agent is built lazily on first use and reused
/// for every request afterwards; it is read-only once constructed.
pub struct ServerState<P: CompletionProvider> {
    config: AppConfig,
    provider: P,
    agent: OnceCell<Arc<Agent<P>>>,
}

impl<P: CompletionProvider + Clone> ServerState<P> {
    pub fn new(config: AppConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            agent: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the process-wide agent, constructing it on first use.
    ///
    /// Concurrent first callers coordinate through the cell: one construction
    /// wins, everyone else awaits and reuses it. Missing completion
    /// credentials do not fail construction; the provider reports them on
    /// first actual use.
    pub async fn agent(&self) -> Result<Arc<Agent<P>>, AgentInitError> {
        self.agent
            .get_or_try_init(|| async {
                info!("Initializing agent executor");
                let registry = default_registry()?;
                let template =
                    load_prompt_template(self.config.prompt_template_path.as_deref());
                let agent = Agent::new(
                    self.provider.clone(),
                    registry,
                    template,
                    self.config.max_iterations,
                );
                info!(
                    max_iterations = self.config.max_iterations,
                    "Agent initialized successfully"
                );
                Ok(Arc::new(agent))
            })
            .await
            .cloned()
    }
}
