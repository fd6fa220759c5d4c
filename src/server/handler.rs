//! Capability handlers: the integration point for agent logic.
//!
//! A server maps each capability name to one [`CapabilityHandler`]. Handlers
//! come in two flavours:
//!
//! - async handlers ([`handler_fn`] or a manual trait impl) run inline on the
//!   request's task;
//! - synchronous handlers ([`BlockingHandler`]) run on a [`WorkerPool`], a
//!   bounded set of blocking threads, so they never stall the async runtime.
//!
//! A handler returns the task output or an error. The error's message is
//! recorded on the task; it never becomes a protocol error.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use tracing::warn;

use crate::error::{A2AError, A2AResult};

/// Default number of blocking handlers allowed to run at once.
pub const DEFAULT_MAX_BLOCKING_WORKERS: usize = 8;

// ---------------------------------------------------------------------------
// CapabilityHandler trait
// ---------------------------------------------------------------------------

/// Executes one capability.
///
/// # Examples
///
/// ```rust,ignore
/// use agentforge_a2a::server::CapabilityHandler;
/// use agentforge_a2a::A2AResult;
/// use async_trait::async_trait;
/// use serde_json::{json, Map, Value};
///
/// struct Echo;
///
/// #[async_trait]
/// impl CapabilityHandler for Echo {
///     async fn invoke(&self, input: Map<String, Value>) -> A2AResult<Value> {
///         Ok(json!({ "echo": input.get("text").cloned().unwrap_or(Value::Null) }))
///     }
/// }
/// ```
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Run the capability on `input`.
    ///
    /// A JSON object result becomes the task output as-is; any other value
    /// is wrapped as `{"result": value}` by the server.
    async fn invoke(&self, input: Map<String, Value>) -> A2AResult<Value>;
}

// ---------------------------------------------------------------------------
// Async closures
// ---------------------------------------------------------------------------

/// A [`CapabilityHandler`] wrapping an async closure. Built by [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Adapt an async closure into a [`CapabilityHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A2AResult<Value>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> CapabilityHandler for FnHandler<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A2AResult<Value>> + Send + 'static,
{
    async fn invoke(&self, input: Map<String, Value>) -> A2AResult<Value> {
        (self.f)(input).await
    }
}

// ---------------------------------------------------------------------------
// WorkerPool
// ---------------------------------------------------------------------------

/// A bounded pool of blocking threads.
///
/// Jobs run through [`tokio::task::spawn_blocking`]; a semaphore caps how many
/// run at once. Callers beyond the cap wait for a permit.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool running at most `size` jobs at once (minimum 1).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Maximum number of concurrent jobs.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of jobs that could start right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on a blocking thread and wait for its result.
    ///
    /// A panic inside `job` is returned as [`A2AError::TaskExecutionFailed`].
    pub async fn run<F, T>(&self, job: F) -> A2AResult<T>
    where
        F: FnOnce() -> A2AResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| A2AError::agent_unavailable("Worker pool is closed"))?;

        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await;

        match outcome {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let message = panic_message(join_err.into_panic());
                warn!(panic = %message, "Blocking handler panicked");
                Err(A2AError::task_execution_failed(message))
            }
            Err(join_err) => Err(A2AError::internal_error(format!(
                "Blocking handler did not finish: {}",
                join_err
            ))),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BLOCKING_WORKERS)
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// Blocking closures
// ---------------------------------------------------------------------------

/// A [`CapabilityHandler`] wrapping a synchronous closure, run on a
/// [`WorkerPool`].
pub struct BlockingHandler<F> {
    f: Arc<F>,
    pool: WorkerPool,
}

impl<F> BlockingHandler<F>
where
    F: Fn(Map<String, Value>) -> A2AResult<Value> + Send + Sync + 'static,
{
    /// Wrap `f`, running it on `pool`.
    pub fn new(f: F, pool: WorkerPool) -> Self {
        Self {
            f: Arc::new(f),
            pool,
        }
    }
}

#[async_trait]
impl<F> CapabilityHandler for BlockingHandler<F>
where
    F: Fn(Map<String, Value>) -> A2AResult<Value> + Send + Sync + 'static,
{
    async fn invoke(&self, input: Map<String, Value>) -> A2AResult<Value> {
        let f = Arc::clone(&self.f);
        self.pool.run(move || f(input)).await
    }
}
