//! The A2A server: hosts one agent's capabilities and dispatches envelopes.
//!
//! An [`A2AServer`] owns one [`AgentCard`], one [`TaskStore`], the capability
//! handler table and the [`WorkerPool`] used by blocking handlers. The
//! transport layer hands it parsed [`A2AMessage`]s via
//! [`A2AServer::handle_message`] and sends back the [`A2AResponse`].
//!
//! # Built-in methods
//!
//! | Method | Params | Result |
//! |--------|--------|--------|
//! | `tasks/send` | `capability`, `input?`, `metadata?` | the finished Task |
//! | `tasks/get` | `task_id` | the Task |
//! | `tasks/cancel` | `task_id` | the Task, cancelled if it was working |
//! | `tasks/list` | `status?`, `limit?` | `{tasks, total}` |
//! | `agent/card` | none | the AgentCard |
//!
//! Handler failures are recorded on the task; they never become protocol
//! errors once the capability has been validated.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use futures::FutureExt;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::error::{A2AError, A2AResult};
use crate::types::{A2AMessage, A2AResponse, AgentCard, Task, TaskList, TaskStatus, TaskUpdate};
use crate::utils::{
    is_reserved_method, METHOD_AGENT_CARD, METHOD_TASKS_CANCEL, METHOD_TASKS_GET,
    METHOD_TASKS_LIST, METHOD_TASKS_SEND,
};

use super::handler::{
    handler_fn, panic_message, BlockingHandler, CapabilityHandler, WorkerPool,
    DEFAULT_MAX_BLOCKING_WORKERS,
};
use super::task_store::{InMemoryTaskStore, TaskListParams, TaskMutation, TaskStore};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum number of blocking handlers running at once.
    pub max_blocking_workers: usize,

    /// Layer permissive CORS onto the HTTP router.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_blocking_workers: DEFAULT_MAX_BLOCKING_WORKERS,
            enable_cors: false,
        }
    }
}

/// Hosts one agent's capabilities.
pub struct A2AServer {
    card: AgentCard,
    store: Arc<dyn TaskStore>,
    handlers: DashMap<String, Arc<dyn CapabilityHandler>>,
    methods: DashMap<String, Arc<dyn CapabilityHandler>>,
    pool: WorkerPool,
    config: ServerConfig,
}

impl std::fmt::Debug for A2AServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AServer")
            .field("agent_id", &self.card.id)
            .field("capabilities", &self.capability_names())
            .field("config", &self.config)
            .finish()
    }
}

impl A2AServer {
    /// Create a server with an in-memory store and default configuration.
    pub fn new(card: AgentCard) -> Self {
        Self::with_config(
            card,
            Arc::new(InMemoryTaskStore::new()),
            ServerConfig::default(),
        )
    }

    /// Create a server on a caller-supplied store.
    pub fn with_store(card: AgentCard, store: Arc<dyn TaskStore>) -> Self {
        Self::with_config(card, store, ServerConfig::default())
    }

    /// Create a server with explicit configuration.
    pub fn with_config(card: AgentCard, store: Arc<dyn TaskStore>, config: ServerConfig) -> Self {
        Self {
            card,
            store,
            handlers: DashMap::new(),
            methods: DashMap::new(),
            pool: WorkerPool::new(config.max_blocking_workers),
            config,
        }
    }

    /// The hosted agent's card.
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// The task store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The pool blocking handlers run on.
    pub fn worker_pool(&self) -> &WorkerPool {
        &self.pool
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register (or replace) the handler for `name`.
    pub fn register_capability(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn CapabilityHandler>,
    ) {
        let name = name.into();
        debug!(capability = %name, "Capability handler registered");
        self.handlers.insert(name, handler);
    }

    /// Register an async closure for `name`. It runs inline on the request.
    pub fn register_fn<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = A2AResult<Value>> + Send + 'static,
    {
        self.register_capability(name, Arc::new(handler_fn(f)));
    }

    /// Register a synchronous closure for `name`. It runs on the worker pool.
    pub fn register_blocking_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Map<String, Value>) -> A2AResult<Value> + Send + Sync + 'static,
    {
        let handler = BlockingHandler::new(f, self.pool.clone());
        self.register_capability(name, Arc::new(handler));
    }

    /// Remove the handler for `name`. Returns `true` if one was registered.
    pub fn unregister_capability(&self, name: &str) -> bool {
        let removed = self.handlers.remove(name).is_some();
        debug!(capability = %name, removed = removed, "Capability handler unregistered");
        removed
    }

    /// Returns `true` if a handler is registered for `name`.
    pub fn has_capability(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Names of all registered capabilities, sorted.
    pub fn capability_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Register an extra envelope method. The built-in method names are
    /// refused.
    pub fn register_method(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn CapabilityHandler>,
    ) -> A2AResult<()> {
        let name = name.into();
        if is_reserved_method(&name) {
            return Err(A2AError::invalid_params(format!(
                "Method name is reserved: {}",
                name
            )));
        }
        debug!(method = %name, "Method handler registered");
        self.methods.insert(name, handler);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Dispatch one envelope and build its response.
    pub async fn handle_message(&self, message: A2AMessage) -> A2AResponse {
        let A2AMessage {
            method, params, id, ..
        } = message;
        debug!(method = %method, "A2A request received");

        let outcome = match method.as_str() {
            METHOD_TASKS_SEND => self.on_send(params).await.and_then(|t| to_result(&t)),
            METHOD_TASKS_GET => self.on_get(&params).await.and_then(|t| to_result(&t)),
            METHOD_TASKS_CANCEL => self.on_cancel(&params).await.and_then(|t| to_result(&t)),
            METHOD_TASKS_LIST => self.on_list(&params).await.and_then(|l| to_result(&l)),
            METHOD_AGENT_CARD => to_result(&self.card),
            other => self.on_extension(other, params).await,
        };

        match outcome {
            Ok(result) => A2AResponse::success(id, result),
            Err(err) => {
                debug!(method = %method, code = err.code(), error = %err, "A2A request failed");
                A2AResponse::failure(id, err)
            }
        }
    }

    async fn on_send(&self, params: Map<String, Value>) -> A2AResult<Task> {
        let capability = params
            .get("capability")
            .and_then(Value::as_str)
            .ok_or_else(|| A2AError::invalid_params("Missing required parameter: capability"))?
            .to_string();

        let handler = self
            .handlers
            .get(&capability)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                A2AError::invalid_params(format!("Unknown capability: {}", capability))
            })?;

        let input = object_param(&params, "input")?;
        let mut metadata = object_param(&params, "metadata")?;
        metadata.insert("capability".to_string(), Value::String(capability.clone()));

        let mut task = Task::new(self.card.id.clone(), input.clone()).with_metadata(metadata);
        task.start();
        let task_id = task.id.clone();
        self.store.save(task).await?;
        debug!(task_id = %task_id, capability = %capability, "Task created");

        let outcome = match AssertUnwindSafe(handler.invoke(input)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload);
                warn!(task_id = %task_id, capability = %capability, panic = %message, "Capability handler panicked");
                Err(A2AError::task_execution_failed(message))
            }
        };
        let apply: TaskMutation = match outcome {
            Ok(value) => {
                let output = into_output(value);
                Box::new(move |task: &mut Task| {
                    task.complete(output);
                })
            }
            Err(err) => {
                let message = err.message();
                warn!(task_id = %task_id, capability = %capability, error = %message, "Capability handler failed");
                Box::new(move |task: &mut Task| {
                    task.fail(message);
                })
            }
        };

        let task = self.store.modify(&task_id, apply).await?.ok_or_else(|| {
            A2AError::internal_error(format!("Task disappeared during execution: {}", task_id))
        })?;
        debug!(task_id = %task.id, status = %task.status, "Task finished");
        Ok(task)
    }

    async fn on_get(&self, params: &Map<String, Value>) -> A2AResult<Task> {
        let task_id = task_id_param(params)?;
        self.store
            .get(task_id)
            .await?
            .ok_or_else(|| A2AError::task_not_found(task_id))
    }

    async fn on_cancel(&self, params: &Map<String, Value>) -> A2AResult<Task> {
        let task_id = task_id_param(params)?;
        let task = self
            .store
            .modify(
                task_id,
                Box::new(|task: &mut Task| {
                    task.cancel();
                }),
            )
            .await?
            .ok_or_else(|| A2AError::task_not_found(task_id))?;

        if task.status == TaskStatus::Cancelled {
            debug!(task_id = %task_id, "Task cancelled");
        } else {
            debug!(task_id = %task_id, status = %task.status, "Cancel ignored");
        }
        Ok(task)
    }

    async fn on_list(&self, params: &Map<String, Value>) -> A2AResult<TaskList> {
        let status = match params.get("status") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.parse::<TaskStatus>()?),
            Some(_) => return Err(A2AError::invalid_params("status must be a string")),
        };
        let limit = match params.get("limit") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_u64().map(|n| n as usize).ok_or_else(|| {
                A2AError::invalid_params("limit must be a non-negative integer")
            })?),
        };
        self.store.list(&TaskListParams { status, limit }).await
    }

    async fn on_extension(&self, method: &str, params: Map<String, Value>) -> A2AResult<Value> {
        let Some(handler) = self.methods.get(method).map(|e| Arc::clone(e.value())) else {
            warn!(method = %method, "Unknown A2A method");
            return Err(A2AError::method_not_found(method));
        };
        handler.invoke(params).await.map_err(|err| match err {
            A2AError::Other(message) => A2AError::internal_error(message),
            other => other,
        })
    }

    // -----------------------------------------------------------------------
    // Direct accessors
    // -----------------------------------------------------------------------

    /// Fetch a task without going through an envelope.
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Option<Task>> {
        self.store.get(task_id).await
    }

    /// List tasks without going through an envelope.
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        limit: Option<usize>,
    ) -> A2AResult<TaskList> {
        self.store.list(&TaskListParams { status, limit }).await
    }

    /// Store a task created outside `tasks/send`.
    pub async fn insert_task(&self, task: Task) -> A2AResult<()> {
        debug!(task_id = %task.id, status = %task.status, "Task inserted");
        self.store.save(task).await
    }

    /// Apply a partial update to a stored task.
    ///
    /// Fails with `TaskNotFound` for unknown ids and `InvalidParams` when the
    /// requested status change is not allowed.
    pub async fn update_task(&self, update: TaskUpdate) -> A2AResult<Task> {
        let task_id = update.task_id.clone();
        let applied = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&applied);

        let task = self
            .store
            .modify(
                &task_id,
                Box::new(move |task: &mut Task| {
                    flag.store(task.apply_update(update), Ordering::SeqCst);
                }),
            )
            .await?
            .ok_or_else(|| A2AError::task_not_found(task_id.as_str()))?;

        if !applied.load(Ordering::SeqCst) {
            warn!(task_id = %task_id, status = %task.status, "Task update rejected");
            return Err(A2AError::invalid_params(format!(
                "Task {} cannot be updated from status {}",
                task_id, task.status
            )));
        }
        Ok(task)
    }

    /// The body served at the well-known discovery path.
    pub fn well_known_response(&self) -> A2AResult<String> {
        serde_json::to_string(&self.card).map_err(|e| {
            error!(error = %e, "Failed to serialize agent card");
            A2AError::internal_error(e.to_string())
        })
    }

    /// Remove terminal tasks whose `updated_at` is older than `max_age`, or
    /// cannot be parsed. Returns how many were removed.
    pub async fn clear_completed(&self, max_age: Duration) -> A2AResult<usize> {
        let cutoff = TimeDelta::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let removed = self
            .store
            .remove_where(&|task: &Task| {
                task.status.is_terminal()
                    && task.updated_at_utc().map_or(true, |at| at < cutoff)
            })
            .await?;
        debug!(removed = removed, max_age_secs = max_age.as_secs(), "Cleared completed tasks");
        Ok(removed)
    }
}

fn to_result<T: Serialize>(value: &T) -> A2AResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        error!(error = %e, "Failed to serialize result");
        A2AError::internal_error(e.to_string())
    })
}

fn into_output(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("result".to_string(), other);
            wrapped
        }
    }
}

fn object_param(params: &Map<String, Value>, key: &str) -> A2AResult<Map<String, Value>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(A2AError::invalid_params(format!(
            "{} must be an object",
            key
        ))),
    }
}

fn task_id_param(params: &Map<String, Value>) -> A2AResult<&str> {
    params
        .get("task_id")
        .and_then(Value::as_str)
        .ok_or_else(|| A2AError::invalid_params("Missing required parameter: task_id"))
}
