use super::super::dto::{EndpointIndex, ErrorBody, HealthResponse, RootResponse};
use super::super::state::ServerState;
use crate::infrastructure::manifest::load_manifest;
use crate::infrastructure::model::CompletionProvider;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const SERVER_NAME: &str = "Agent Executor MCP Server";

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        name: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: EndpointIndex {
            manifest: "/mcp/manifest",
            invoke: "/mcp/invoke",
        },
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub async fn manifest_handler<P>(
    State(state): State<Arc<ServerState<P>>>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)>
where
    P: CompletionProvider + Clone + 'static,
{
    info!("GET /mcp/manifest - returning manifest");
    match load_manifest(&state.config().manifest_path) {
        Ok(manifest) => Ok(Json(manifest)),
        Err(error) => {
            error!(%error, "Failed to load MCP manifest");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: error.to_string(),
                    code: None,
                }),
            ))
        }
    }
}
