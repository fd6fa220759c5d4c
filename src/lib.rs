//! # agentforge-a2a: Agent-to-Agent (A2A) protocol core
//!
//! Lets independently running agents discover each other, delegate units of
//! work ("tasks") and track those tasks to completion over JSON-RPC 2.0.
//!
//! ## Overview
//!
//! - **Protocol model** ([`types`]): agent cards, capabilities, tasks and
//!   the request/response envelope
//! - **Server** ([`server::A2AServer`]): hosts one agent's capabilities,
//!   owns the task store and enforces the task state machine
//! - **Client** ([`client::A2AClient`]): discovery, task submission,
//!   queries, cancellation and polling against one remote agent
//! - **Bridge** ([`bridge`]): turns a local agent into a card and a
//!   server, and calls remote agents on its behalf
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | HTTP client for calling A2A agents (reqwest) |
//! | `server` | yes     | Server core, in-memory task store, axum routes |
//! | `full`   | no      | Enable all features |
//!
//! The bridge needs both `client` and `server`.
//!
//! ## Quick Start: Server
//!
//! ```rust,ignore
//! use agentforge_a2a::server::{a2a_router, A2AServer};
//! use agentforge_a2a::AgentCardBuilder;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let card = AgentCardBuilder::new("echo", "Echo Agent")
//!         .with_simple_capability("echo", "Echo the input back")
//!         .build();
//!
//!     let server = Arc::new(A2AServer::new(card));
//!     server.register_fn("echo", |input| async move { Ok(json!({ "echo": input })) });
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, a2a_router(server)).await?;
//!     Ok(())
//! }
//! ```
//!
//! The router provides:
//! - `POST /a2a`: JSON-RPC 2.0 endpoint for all A2A methods
//! - `GET /.well-known/agent.json`: Agent card discovery
//!
//! ## Quick Start: Client
//!
//! ```no_run
//! use agentforge_a2a::client::A2AClient;
//! use serde_json::Map;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = A2AClient::new("http://localhost:8000");
//!     let card = client.discover().await?;
//!     println!("{} v{}", card.name, card.version);
//!
//!     let task = client.send_task("echo", Map::new()).await?;
//!     println!("{} -> {}", task.id, task.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Supported methods
//!
//! - `tasks/send`: run a capability, returns the finished task
//! - `tasks/get`: retrieve a task by ID
//! - `tasks/cancel`: cancel a working task
//! - `tasks/list`: list tasks with an optional status filter
//! - `agent/card`: return the agent card

pub mod builders;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

#[cfg(all(feature = "client", feature = "server"))]
pub mod bridge;

/// Prelude module that re-exports commonly used types and traits.
///
/// # Example
///
/// ```
/// use agentforge_a2a::prelude::*;
///
/// let card = AgentCardBuilder::new("a", "Agent").build();
/// let task = Task::new(card.id.clone(), Default::default());
/// assert_eq!(task.status, TaskStatus::Submitted);
/// ```
pub mod prelude {
    // Core types
    pub use crate::types::{
        A2AMessage, A2AResponse, AgentCard, Capability, JsonRpcError, JsonRpcId, Task, TaskList,
        TaskStatus, TaskUpdate,
    };

    // Error types
    pub use crate::error::{A2AError, A2AResult};

    // Builders
    pub use crate::builders::AgentCardBuilder;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::A2AClient;

    #[cfg(feature = "server")]
    pub use crate::builders::ServerBuilder;

    #[cfg(feature = "server")]
    pub use crate::server::{
        a2a_router, handler_fn, A2AServer, CapabilityHandler, InMemoryTaskStore, ServerConfig,
        TaskStore,
    };

    #[cfg(all(feature = "client", feature = "server"))]
    pub use crate::bridge::{AgentInput, AgentOutput, LocalAgent, ToolDescriptor};
}

// Re-export core types at crate root for convenience.
pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;

#[cfg(feature = "client")]
pub use builders::ClientBuilder;

#[cfg(feature = "server")]
pub use builders::ServerBuilder;
