//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agentforge_a2a::builders::AgentCardBuilder;
use agentforge_a2a::client::Transport;
use agentforge_a2a::error::{A2AError, A2AResult};
use agentforge_a2a::server::{a2a_router, A2AServer};
use agentforge_a2a::types::{A2AMessage, A2AResponse, AgentCard, Task};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Build a default agent card for testing.
pub fn test_agent_card() -> AgentCard {
    AgentCardBuilder::new("test-agent", "Test Agent")
        .with_description("An agent for testing")
        .with_simple_capability("echo", "Echoes the input back")
        .with_endpoint("tasks", "/a2a")
        .build()
}

/// A server with `echo` (async), `fail` (async, always errors) and
/// `double` (blocking) registered.
pub fn test_server() -> A2AServer {
    let server = A2AServer::new(test_agent_card());
    server.register_fn("echo", |input| async move { Ok(Value::Object(input)) });
    server.register_fn("fail", |_input| async move {
        Err(A2AError::Other("Handler exploded".to_string()))
    });
    server.register_blocking_fn("double", |input| {
        let n = input.get("n").and_then(Value::as_i64).unwrap_or(0);
        Ok(serde_json::json!(n * 2))
    });
    server
}

/// Start a test server on a random port. Returns the base URL and a handle to shut it down.
pub async fn start_test_server(server: Arc<A2AServer>) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let app = a2a_router(server);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, handle)
}

/// Start an arbitrary axum app on a random port.
pub async fn start_raw_server(app: axum::Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://{}", addr), handle)
}

/// Helper to build a JSON-RPC request body.
pub fn jsonrpc_request(id: Value, method: &str, params: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Helper to build a request envelope.
pub fn message(method: &str, params: Value) -> A2AMessage {
    A2AMessage::new(method, obj(params)).with_id(1i64)
}

/// Convert a `json!` object into a map.
pub fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A transport answering from a script, recording every request.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<A2AResult<A2AResponse>>>,
    pub sent: Arc<Mutex<Vec<A2AMessage>>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<A2AResult<A2AResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A script returning each task in turn as a `tasks/get` result.
    pub fn tasks(tasks: Vec<Task>) -> Self {
        Self::new(
            tasks
                .into_iter()
                .map(|t| Ok(A2AResponse::success(None, serde_json::to_value(t).unwrap())))
                .collect(),
        )
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, message: &A2AMessage) -> A2AResult<A2AResponse> {
        self.sent.lock().unwrap().push(message.clone());
        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(A2AError::Transport("script exhausted".to_string())),
            // The last response repeats forever.
            1 => responses.front().cloned().unwrap(),
            _ => responses.pop_front().unwrap(),
        }
    }
}
