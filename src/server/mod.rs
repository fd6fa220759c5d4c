//! A2A server: capability handlers, task storage and HTTP routes.
//!
//! - [`A2AServer`]: owns the agent card, the task store and the handler
//!   table; dispatches envelopes
//! - [`CapabilityHandler`] trait, [`handler_fn`] and [`BlockingHandler`]:
//!   plug agent logic in
//! - [`WorkerPool`]: bounded blocking threads for synchronous handlers
//! - [`TaskStore`] trait + [`InMemoryTaskStore`]: task persistence
//! - [`a2a_router`]: ready-made axum routes
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agentforge_a2a::server::{a2a_router, A2AServer};
//! use agentforge_a2a::types::AgentCard;
//! use serde_json::json;
//!
//! let server = Arc::new(A2AServer::new(AgentCard::new("echo", "Echo")));
//! server.register_fn("echo", |input| async move { Ok(json!({"echo": input})) });
//!
//! let app = a2a_router(server);
//! ```

pub mod a2a_server;
pub mod axum_integration;
pub mod handler;
pub mod task_store;

pub use a2a_server::{A2AServer, ServerConfig};
pub use axum_integration::a2a_router;
pub use handler::{
    handler_fn, BlockingHandler, CapabilityHandler, FnHandler, WorkerPool,
    DEFAULT_MAX_BLOCKING_WORKERS,
};
pub use task_store::{InMemoryTaskStore, TaskListParams, TaskMutation, TaskPredicate, TaskStore};
