mod dto;
mod error;
mod routes;
mod state;

pub use dto::{ContentBlock, ErrorBody, InvokeRequest, InvokeResponse};
pub use error::ServerError;
pub use state::{AgentInitError, ServerState};

use crate::infrastructure::model::CompletionProvider;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

/// Builds the MCP gateway router; exposed separately so tests can drive it
/// without binding a listener.
pub fn router<P>(state: Arc<ServerState<P>>) -> Router
where
    P: CompletionProvider + Clone + 'static,
{
    let cors = cors_layer(&state.config().cors_origins);

    Router::new()
        .route("/", get(routes::meta::root_handler))
        .route("/health", get(routes::meta::health_handler))
        .route("/mcp/manifest", get(routes::meta::manifest_handler::<P>))
        .route("/mcp/invoke", post(routes::invoke::invoke_handler::<P>))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<P>(state: Arc<ServerState<P>>, addr: SocketAddr) -> Result<(), ServerError>
where
    P: CompletionProvider + Clone + 'static,
{
    let app = router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "MCP server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    if origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(Any)
    }
}
