//! Axum integration: ready-made HTTP routes for A2A servers.
//!
//! Provides an [`a2a_router`] function that creates an axum `Router` with:
//! - `POST /a2a`: JSON-RPC 2.0 dispatch through [`A2AServer::handle_message`]
//! - `GET /.well-known/agent.json`: agent card discovery
//!
//! Protocol errors are returned as JSON-RPC error envelopes with HTTP 200.
//!
//! # Example
//!
//! ```rust,ignore
//! use agentforge_a2a::server::{a2a_router, A2AServer};
//! use agentforge_a2a::types::AgentCard;
//! use std::sync::Arc;
//!
//! let server = Arc::new(A2AServer::new(AgentCard::new("echo", "Echo")));
//! let app = a2a_router(server);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::A2AError;
use crate::types::{A2AMessage, A2AResponse, JsonRpcId};
use crate::utils::{AGENT_CARD_WELL_KNOWN_PATH, DEFAULT_RPC_PATH, JSONRPC_VERSION};

use super::a2a_server::A2AServer;

/// Create an axum Router serving `server`.
///
/// Permissive CORS is layered on when the server's config enables it.
pub fn a2a_router(server: Arc<A2AServer>) -> Router {
    let cors = server.config().enable_cors;
    let router = Router::new()
        .route(AGENT_CARD_WELL_KNOWN_PATH, get(handle_agent_card))
        .route(DEFAULT_RPC_PATH, post(handle_jsonrpc))
        .with_state(server);

    if cors {
        use tower_http::cors::CorsLayer;
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Serve the agent card at the well-known endpoint.
async fn handle_agent_card(State(server): State<Arc<A2AServer>>) -> impl IntoResponse {
    Json(server.card().clone()).into_response()
}

/// Main JSON-RPC dispatch handler.
///
/// The body is parsed by hand so malformed JSON and malformed envelopes
/// still get a JSON-RPC error envelope instead of an axum rejection.
async fn handle_jsonrpc(State(server): State<Arc<A2AServer>>, body: Bytes) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Rejected unparsable request body");
            return envelope(A2AResponse::failure(
                None,
                A2AError::parse_error(e.to_string()),
            ));
        }
    };

    // Echo the id back even when the rest of the envelope is unusable.
    let id = raw
        .get("id")
        .and_then(|v| serde_json::from_value::<JsonRpcId>(v.clone()).ok());

    let message: A2AMessage = match serde_json::from_value(raw) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Rejected malformed envelope");
            return envelope(A2AResponse::failure(
                id,
                A2AError::invalid_request(e.to_string()),
            ));
        }
    };

    if message.jsonrpc != JSONRPC_VERSION {
        warn!(jsonrpc = %message.jsonrpc, "Rejected envelope with wrong protocol version");
        return envelope(A2AResponse::failure(
            message.id,
            A2AError::invalid_request("Invalid JSON-RPC version, must be \"2.0\""),
        ));
    }

    envelope(server.handle_message(message).await)
}

fn envelope(response: A2AResponse) -> Response {
    Json(response).into_response()
}
