use super::super::dto::{ErrorBody, InvokeRequest, InvokeResponse};
use super::super::state::ServerState;
use crate::infrastructure::model::CompletionProvider;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The single tool identifier accepted by this gateway.
pub const AGENT_TOOL_NAME: &str = "agent_executor";

const QUERY_LOG_LIMIT: usize = 100;

/// Gateway rejections. Each maps onto one of the two structured response
/// shapes; callers never see anything else.
#[derive(Debug)]
pub enum InvokeRejection {
    Unauthorized,
    UnknownTool(String),
    MissingArgument,
    Execution(String),
}

impl IntoResponse for InvokeRejection {
    fn into_response(self) -> Response {
        match self {
            InvokeRejection::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    error: "Unauthorized - invalid or missing API key".to_string(),
                    code: None,
                }),
            )
                .into_response(),
            InvokeRejection::UnknownTool(tool) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: format!("Unknown tool: {tool}"),
                    code: Some("UNKNOWN_TOOL"),
                }),
            )
                .into_response(),
            InvokeRejection::MissingArgument => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Missing required argument: 'query'".to_string(),
                    code: Some("MISSING_ARGUMENT"),
                }),
            )
                .into_response(),
            InvokeRejection::Execution(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InvokeResponse::failure(format!(
                    "Agent execution failed: {message}"
                ))),
            )
                .into_response(),
        }
    }
}

pub async fn invoke_handler<P>(
    State(state): State<Arc<ServerState<P>>>,
    headers: HeaderMap,
    Json(payload): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, InvokeRejection>
where
    P: CompletionProvider + Clone + 'static,
{
    info!(tool = %payload.tool, "POST /mcp/invoke");

    // Bearer check first: no agent work for unauthenticated callers.
    if let Some(secret) = state.config().invoke_secret.as_deref() {
        let expected = format!("Bearer {secret}");
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!("Unauthorized request - invalid or missing API key");
            return Err(InvokeRejection::Unauthorized);
        }
    }

    if payload.tool != AGENT_TOOL_NAME {
        warn!(tool = %payload.tool, "Unknown tool requested");
        return Err(InvokeRejection::UnknownTool(payload.tool));
    }

    let query = payload
        .arguments
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|query| !query.is_empty());
    let Some(query) = query else {
        warn!("Missing 'query' in arguments");
        return Err(InvokeRejection::MissingArgument);
    };

    // Response bodies are never logged; the query is truncated.
    info!(query = %truncate(query, QUERY_LOG_LIMIT), "Executing agent");

    let agent = state.agent().await.map_err(|err| {
        error!(%err, "Agent initialization failed");
        InvokeRejection::Execution(err.user_message())
    })?;

    match agent.run(query).await {
        Ok(outcome) => {
            info!(
                steps = outcome.steps.len(),
                concluded = outcome.concluded,
                "Agent execution completed"
            );
            Ok(Json(InvokeResponse::success(outcome.answer)))
        }
        Err(err) => {
            error!(%err, "Agent execution failed");
            Err(InvokeRejection::Execution(err.user_message()))
        }
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
