//! High-level A2A client for interacting with a remote agent.
//!
//! Wraps a [`Transport`] with typed methods for every built-in envelope
//! method, card discovery, and a cooperative polling loop.

use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::debug;

use crate::error::{A2AError, A2AResult};
use crate::types::{A2AMessage, A2AResponse, AgentCard, Task, TaskList, TaskStatus};
use crate::utils::{
    DEFAULT_RPC_PATH, METHOD_AGENT_CARD, METHOD_TASKS_CANCEL, METHOD_TASKS_GET,
    METHOD_TASKS_LIST, METHOD_TASKS_SEND,
};

use super::card_resolver::CardResolver;
use super::transport::{JsonRpcTransport, Transport, TransportConfig};

/// Client for one remote A2A agent.
///
/// Every operation returns either the decoded result or an [`A2AError`]:
/// a JSON-RPC error from the agent becomes [`A2AError::JsonRpc`] with the
/// remote code; connection, HTTP and decode failures keep their own variants.
///
/// # Construction
///
/// ```no_run
/// use agentforge_a2a::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = A2AClient::new("http://localhost:8000/");
/// assert_eq!(client.base_url(), "http://localhost:8000");
///
/// let card = client.discover().await?;
/// println!("{} offers {} capabilities", card.name, card.capabilities.len());
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    base_url: String,
    transport: Box<dyn Transport>,
    resolver: CardResolver,
    agent_card: Option<AgentCard>,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("base_url", &self.base_url)
            .field("agent_card", &self.agent_card)
            .finish_non_exhaustive()
    }
}

impl A2AClient {
    /// Create a client for the agent at `base_url`, with default transport
    /// settings. Trailing slashes are stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, TransportConfig::default())
    }

    /// Create a client with custom transport configuration.
    pub fn with_config(base_url: impl Into<String>, config: TransportConfig) -> Self {
        Self::with_endpoint(base_url, DEFAULT_RPC_PATH, config)
    }

    /// Create a client posting envelopes to `{base_url}{rpc_path}`.
    pub fn with_endpoint(
        base_url: impl Into<String>,
        rpc_path: &str,
        config: TransportConfig,
    ) -> Self {
        let base_url = normalize_base_url(base_url.into());
        let http = config.build_client();
        let transport = JsonRpcTransport::with_client(format!("{base_url}{rpc_path}"), http.clone());
        Self {
            base_url,
            transport: Box::new(transport),
            resolver: CardResolver::with_client(http),
            agent_card: None,
        }
    }

    /// Create a client with a custom transport.
    ///
    /// `base_url` is still used for card discovery.
    pub fn with_transport(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            transport,
            resolver: CardResolver::new(),
            agent_card: None,
        }
    }

    /// Seed the cached agent card.
    pub fn with_agent_card(mut self, card: AgentCard) -> Self {
        self.agent_card = Some(card);
        self
    }

    /// The agent's base URL, without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cached agent card, if one was discovered or supplied.
    pub fn agent_card(&self) -> Option<&AgentCard> {
        self.agent_card.as_ref()
    }

    // ──────────────────────────────────────────────────
    // Discovery
    // ──────────────────────────────────────────────────

    /// Fetch the card from the well-known path and cache it.
    pub async fn discover(&mut self) -> A2AResult<AgentCard> {
        let card = self.resolver.resolve(&self.base_url).await?;
        self.agent_card = Some(card.clone());
        Ok(card)
    }

    /// Fetch the card through the `agent/card` envelope method.
    pub async fn get_card(&self) -> A2AResult<AgentCard> {
        self.request(METHOD_AGENT_CARD, Map::new()).await
    }

    // ──────────────────────────────────────────────────
    // Tasks
    // ──────────────────────────────────────────────────

    /// Run `capability` on `input` (`tasks/send`). Returns the finished task;
    /// a failing handler shows up as a task with status `failed`.
    pub async fn send_task(&self, capability: &str, input: Map<String, Value>) -> A2AResult<Task> {
        let mut params = Map::new();
        params.insert("capability".into(), Value::String(capability.to_string()));
        params.insert("input".into(), Value::Object(input));
        self.request(METHOD_TASKS_SEND, params).await
    }

    /// Fetch a task (`tasks/get`).
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.request(METHOD_TASKS_GET, task_id_params(task_id)).await
    }

    /// Cancel a task (`tasks/cancel`). Tasks that are not working come back
    /// unchanged.
    pub async fn cancel_task(&self, task_id: &str) -> A2AResult<Task> {
        self.request(METHOD_TASKS_CANCEL, task_id_params(task_id))
            .await
    }

    /// List tasks (`tasks/list`).
    pub async fn list_tasks(&self, status: Option<TaskStatus>, limit: usize) -> A2AResult<TaskList> {
        let mut params = Map::new();
        if let Some(status) = status {
            params.insert("status".into(), Value::String(status.to_string()));
        }
        params.insert("limit".into(), Value::from(limit as u64));
        self.request(METHOD_TASKS_LIST, params).await
    }

    /// Poll `task_id` every `interval` until it reaches a terminal status.
    ///
    /// Issues one `tasks/get` per interval and never sleeps past
    /// `max_wait`. Fails with [`A2AError::PollTimeout`] once `max_wait` has
    /// elapsed without a terminal status. Dropping the future abandons the
    /// loop.
    pub async fn poll_until_complete(
        &self,
        task_id: &str,
        interval: Duration,
        max_wait: Duration,
    ) -> A2AResult<Task> {
        let started = Instant::now();
        loop {
            let task = self.get_task(task_id).await?;
            if task.status.is_terminal() {
                return Ok(task);
            }

            let elapsed = started.elapsed();
            if elapsed >= max_wait {
                debug!(task_id = %task_id, status = %task.status, "Polling gave up");
                return Err(A2AError::PollTimeout {
                    task_id: task_id.to_string(),
                    waited: max_wait,
                });
            }
            tokio::time::sleep(interval.min(max_wait - elapsed)).await;
        }
    }

    /// Send an arbitrary envelope method and return the raw result.
    pub async fn call(&self, method: &str, params: Map<String, Value>) -> A2AResult<Value> {
        let response = self.transport.send(&build_request(method, params)).await?;
        response.into_result()
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Map<String, Value>,
    ) -> A2AResult<T> {
        let response = self.transport.send(&build_request(method, params)).await?;
        parse_result(response)
    }
}

// ──────────────────────────────────────────────────
// Internal helpers
// ──────────────────────────────────────────────────

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn task_id_params(task_id: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("task_id".into(), Value::String(task_id.to_string()));
    params
}

/// Build a request envelope with a random UUID id.
fn build_request(method: &str, params: Map<String, Value>) -> A2AMessage {
    A2AMessage::new(method, params).with_id(uuid::Uuid::new_v4().to_string())
}

/// Decode the `result` field of a response into the expected type.
fn parse_result<T: serde::de::DeserializeOwned>(response: A2AResponse) -> A2AResult<T> {
    let result = response.into_result()?;
    serde_json::from_value(result)
        .map_err(|e| A2AError::InvalidJson(format!("Failed to decode response result: {e}")))
}
