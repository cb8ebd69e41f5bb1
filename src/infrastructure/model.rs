use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// One reasoning step's context, rendered as a single prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub stop: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion credentials are not configured")]
    MissingCredentials,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion provider returned invalid response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::MissingCredentials => {
                "The completion service credential is not configured. Set OPENAI_API_KEY."
                    .to_string()
            }
            CompletionError::Network(err) => {
                if err.is_connect() {
                    "Could not connect to the completion service. Check that it is reachable."
                        .to_string()
                } else if err.is_timeout() {
                    "The request to the completion service timed out. Try again shortly."
                        .to_string()
                } else if let Some(status) = err.status() {
                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            "The completion service rejected the configured credentials."
                                .to_string()
                        }
                        StatusCode::NOT_FOUND => {
                            "The completion endpoint was not found (404). Check OPENAI_BASE_URL."
                                .to_string()
                        }
                        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                            "The completion service is currently unavailable. Try again later."
                                .to_string()
                        }
                        _ => format!(
                            "The completion request failed with status {}.",
                            status.as_u16()
                        ),
                    }
                } else {
                    "A network error occurred while contacting the completion service."
                        .to_string()
                }
            }
            CompletionError::InvalidResponse(_) => {
                "The completion service returned a response that could not be processed."
                    .to_string()
            }
        }
    }
}

/// Black-box text-completion capability queried once per loop iteration.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat-completions client. Temperature is fixed at zero;
/// the reasoning loop depends on deterministic directive shapes.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self::with_client(base_url, model, api_key, Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        client: Client,
    ) -> Self {
        Self {
            http: client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{trimmed}/{path}")
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        // Missing credentials fail here, on first use, not at construction.
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CompletionError::MissingCredentials);
        };

        let url = self.endpoint("/chat/completions");
        let payload = ChatCompletionRequest::single_turn(&self.model, request);
        info!(model = %self.model, url = %url, "Sending completion request");

        let response: ChatCompletionResponse = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Received completion response");

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("empty choices array".into()))?;
        Ok(choice.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

impl ChatCompletionRequest {
    fn single_turn(model: &str, request: CompletionRequest) -> Self {
        Self {
            model: model.to_string(),
            temperature: 0.0,
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: request.prompt,
            }],
            stop: request.stop,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_paths_correctly() {
        let client = OpenAiClient::new("https://api.openai.com/v1/", "gpt-4o-mini", None);
        assert_eq!(
            client.endpoint("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn payload_pins_temperature_to_zero() {
        let payload = ChatCompletionRequest::single_turn(
            "gpt-4o-mini",
            CompletionRequest {
                prompt: "Question: hi".into(),
                stop: vec!["\nObservation:".into()],
            },
        );
        let value = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Question: hi");
        assert_eq!(value["stop"][0], "\nObservation:");
    }

    #[test]
    fn empty_stop_is_omitted_from_payload() {
        let payload = ChatCompletionRequest::single_turn(
            "gpt-4o-mini",
            CompletionRequest {
                prompt: "hi".into(),
                stop: Vec::new(),
            },
        );
        let value = serde_json::to_value(&payload).expect("serializes");
        assert!(value.get("stop").is_none());
    }

    #[tokio::test]
    async fn missing_credentials_fail_on_first_use() {
        let client = OpenAiClient::new("https://api.openai.com/v1", "gpt-4o-mini", None);
        let error = client
            .complete(CompletionRequest {
                prompt: "hi".into(),
                stop: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(error, CompletionError::MissingCredentials));
    }

    #[test]
    fn response_parses_choice_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Final Answer: 4"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).expect("parses");
        assert_eq!(response.choices[0].message.content, "Final Answer: 4");
    }
}
