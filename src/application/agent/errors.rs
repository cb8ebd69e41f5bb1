use crate::infrastructure::model::CompletionError;
use thiserror::Error;

/// Run-level agent failure. Tool failures and malformed outputs are folded
/// into observations inside the loop; only capability failures reach here.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Completion(err) => err.user_message(),
        }
    }
}
