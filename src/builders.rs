//! Builder patterns for ergonomic construction of A2A types.

use crate::types::*;
use serde_json::Value;
#[cfg(feature = "client")]
use std::collections::HashMap;

/// Builder for constructing [`AgentCard`] with sensible defaults.
///
/// # Example
///
/// ```
/// use agentforge_a2a::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("weather", "Weather Agent")
///     .with_description("Forecasts")
///     .with_simple_capability("get_forecast", "Forecast for a city")
///     .with_endpoint("tasks", "/a2a")
///     .build();
/// assert_eq!(card.version, "1.0.0");
/// assert!(card.has_capability("get_forecast"));
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    card: AgentCard,
}

impl AgentCardBuilder {
    /// Create a new builder with the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            card: AgentCard::new(id, name),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.card.description = description.into();
        self
    }

    /// Set the card version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.card.version = version.into();
        self
    }

    /// Add a capability. A capability with the same name is replaced.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.card.upsert_capability(capability);
        self
    }

    /// Add a capability with empty schemas.
    pub fn with_simple_capability(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.with_capability(Capability::new(name, description))
    }

    /// Add an endpoint entry, e.g. `"tasks" → "/a2a"`.
    pub fn with_endpoint(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.card.endpoints.insert(name.into(), path.into());
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.card.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the [`AgentCard`].
    pub fn build(self) -> AgentCard {
        self.card
    }
}

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for constructing an [`A2AClient`](crate::client::A2AClient).
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use agentforge_a2a::builders::ClientBuilder;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("http://localhost:8000")
///     .with_timeout(Duration::from_secs(30))
///     .connect()
///     .await?;
/// assert!(client.agent_card().is_some());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: Option<std::time::Duration>,
    headers: HashMap<String, String>,
    rpc_path: String,
}

#[cfg(feature = "client")]
impl ClientBuilder {
    /// Create a new client builder for the given base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: HashMap::new(),
            rpc_path: crate::utils::DEFAULT_RPC_PATH.to_string(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add an Authorization header with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.into()),
        );
        self
    }

    /// Post envelopes to a path other than `/a2a`.
    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.rpc_path = path.into();
        self
    }

    fn transport_config(&self) -> crate::client::TransportConfig {
        let mut config = crate::client::TransportConfig::default();
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config.headers = self.headers.clone();
        config
    }

    /// Build the client without contacting the agent.
    pub fn build(self) -> crate::client::A2AClient {
        let config = self.transport_config();
        crate::client::A2AClient::with_endpoint(self.url, &self.rpc_path, config)
    }

    /// Build the client and discover the agent card.
    pub async fn connect(self) -> crate::A2AResult<crate::client::A2AClient> {
        let mut client = self.build();
        client.discover().await?;
        Ok(client)
    }
}

// ============================================================================
// ServerBuilder
// ============================================================================

/// Builder for constructing an [`A2AServer`](crate::server::A2AServer) and
/// its router.
///
/// # Example
///
/// ```rust,ignore
/// use agentforge_a2a::builders::ServerBuilder;
/// use serde_json::json;
///
/// let server = ServerBuilder::new()
///     .with_agent_card(|builder| builder.with_simple_capability("echo", "Echo input"))
///     .with_max_blocking_workers(4)
///     .with_cors(true)
///     .build();
/// server.register_fn("echo", |input| async move { Ok(json!(input)) });
///
/// let app = agentforge_a2a::server::a2a_router(std::sync::Arc::new(server));
/// ```
#[cfg(feature = "server")]
pub struct ServerBuilder {
    task_store: Option<std::sync::Arc<dyn crate::server::TaskStore>>,
    agent_card: Option<AgentCard>,
    config: crate::server::ServerConfig,
}

#[cfg(feature = "server")]
impl ServerBuilder {
    /// Create a new server builder.
    pub fn new() -> Self {
        Self {
            task_store: None,
            agent_card: None,
            config: crate::server::ServerConfig::default(),
        }
    }

    /// Set the task store implementation.
    pub fn with_task_store(mut self, store: std::sync::Arc<dyn crate::server::TaskStore>) -> Self {
        self.task_store = Some(store);
        self
    }

    /// Configure the agent card using a builder callback.
    pub fn with_agent_card<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AgentCardBuilder) -> AgentCardBuilder,
    {
        let builder = AgentCardBuilder::new("agent", "A2A Agent");
        self.agent_card = Some(f(builder).build());
        self
    }

    /// Set the agent card directly.
    pub fn with_agent_card_direct(mut self, card: AgentCard) -> Self {
        self.agent_card = Some(card);
        self
    }

    /// Cap the number of blocking handlers running at once.
    pub fn with_max_blocking_workers(mut self, workers: usize) -> Self {
        self.config.max_blocking_workers = workers;
        self
    }

    /// Enable or disable CORS middleware.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.config.enable_cors = enabled;
        self
    }

    /// Build the server.
    pub fn build(self) -> crate::server::A2AServer {
        use crate::server::{A2AServer, InMemoryTaskStore};
        use std::sync::Arc;

        let store = self
            .task_store
            .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()));
        let card = self
            .agent_card
            .unwrap_or_else(|| AgentCardBuilder::new("agent", "A2A Agent").build());
        A2AServer::with_config(card, store, self.config)
    }

    /// Build the server and wrap it in an axum router.
    pub fn router(self) -> axum::Router {
        crate::server::a2a_router(std::sync::Arc::new(self.build()))
    }
}

#[cfg(feature = "server")]
impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
