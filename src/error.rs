//! A2A error types: JSON-RPC error codes + A2A-specific errors.
//!
//! Three families share one enum:
//! - Protocol errors (-32700 through -32603, -32001 through -32004), which the
//!   server puts on a response's `error` field.
//! - Client-side failures (transport, HTTP status, undecodable bodies, remote
//!   JSON-RPC errors), which the client always raises.
//! - The polling timeout, kept apart from request timeouts.
//!
//! Task execution failures are not errors at this level: they are recorded on
//! the task itself (`status = failed`, `error = message`).

use std::time::Duration;

use crate::types::JsonRpcError;

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i64 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

// ---------------------------------------------------------------------------
// A2A-specific error codes
// ---------------------------------------------------------------------------

/// The requested task was not found.
pub const TASK_NOT_FOUND: i64 = -32001;

/// The requested capability is not offered by the agent.
pub const CAPABILITY_NOT_FOUND: i64 = -32002;

/// The task could not be executed.
pub const TASK_EXECUTION_FAILED: i64 = -32003;

/// The agent is not able to accept work right now.
pub const AGENT_UNAVAILABLE: i64 = -32004;

// ---------------------------------------------------------------------------
// A2AError enum
// ---------------------------------------------------------------------------

/// Unified error type for all A2A and JSON-RPC errors.
///
/// Protocol variants carry a human-readable message and an optional
/// structured `data` payload. Client variants describe how a remote call
/// failed; callers get a single error path per client operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    /// Invalid JSON payload (code -32700).
    #[error("Parse error: {message}")]
    ParseError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Request payload is not a valid envelope (code -32600).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Method not found (code -32601).
    #[error("Method not found: {message}")]
    MethodNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Invalid parameters (code -32602).
    #[error("Invalid params: {message}")]
    InvalidParams {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Internal error (code -32603).
    #[error("Internal error: {message}")]
    InternalError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Task not found (code -32001).
    #[error("Task not found: {message}")]
    TaskNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Capability not found (code -32002).
    #[error("Capability not found: {message}")]
    CapabilityNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Task execution failed (code -32003).
    #[error("Task execution failed: {message}")]
    TaskExecutionFailed {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Agent unavailable (code -32004).
    #[error("Agent unavailable: {message}")]
    AgentUnavailable {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Client/transport-side errors (not A2A error codes) --
    /// Transport-level error (connection failed, request failed, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A single request timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error with status code and response body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid JSON received from remote (parse or deserialization failure).
    #[error("{0}")]
    InvalidJson(String),

    /// A JSON-RPC error response was received from the remote agent.
    #[error("{message}")]
    JsonRpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// A task did not reach a terminal status within the polling budget.
    #[error("Task {task_id} did not complete within {waited:?}")]
    PollTimeout {
        /// The task being polled.
        task_id: String,
        /// How long the caller was willing to wait.
        waited: Duration,
    },

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for A2A operations.
pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    // -- Convenience constructors (message-only, no data) --

    /// Create a `ParseError` with a message and no data.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InvalidRequest` with a message and no data.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `MethodNotFound` with a message and no data.
    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::MethodNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InvalidParams` with a message and no data.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InternalError` with a message and no data.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `TaskNotFound` with a message and no data.
    pub fn task_not_found(message: impl Into<String>) -> Self {
        Self::TaskNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `CapabilityNotFound` with a message and no data.
    pub fn capability_not_found(message: impl Into<String>) -> Self {
        Self::CapabilityNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `TaskExecutionFailed` with a message and no data.
    pub fn task_execution_failed(message: impl Into<String>) -> Self {
        Self::TaskExecutionFailed {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `AgentUnavailable` with a message and no data.
    pub fn agent_unavailable(message: impl Into<String>) -> Self {
        Self::AgentUnavailable {
            message: message.into(),
            data: None,
        }
    }

    /// Returns the JSON-RPC error code for this error variant.
    ///
    /// Client-side errors that don't map to an A2A code report -32603
    /// (internal error); a received JSON-RPC error keeps the remote code.
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError { .. } => PARSE_ERROR,
            A2AError::InvalidRequest { .. } => INVALID_REQUEST,
            A2AError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            A2AError::InvalidParams { .. } => INVALID_PARAMS,
            A2AError::InternalError { .. } => INTERNAL_ERROR,
            A2AError::TaskNotFound { .. } => TASK_NOT_FOUND,
            A2AError::CapabilityNotFound { .. } => CAPABILITY_NOT_FOUND,
            A2AError::TaskExecutionFailed { .. } => TASK_EXECUTION_FAILED,
            A2AError::AgentUnavailable { .. } => AGENT_UNAVAILABLE,
            A2AError::Transport(_)
            | A2AError::Timeout(_)
            | A2AError::Http { .. }
            | A2AError::InvalidJson(_)
            | A2AError::PollTimeout { .. }
            | A2AError::Other(_) => INTERNAL_ERROR,
            A2AError::JsonRpc { code, .. } => *code,
        }
    }

    /// The code a caller can act on, when the failure carried one.
    ///
    /// Protocol variants report their taxonomy code, remote JSON-RPC errors
    /// the remote code, and HTTP failures the status. Connection failures,
    /// timeouts and decode failures have no origin code.
    pub fn origin_code(&self) -> Option<i64> {
        match self {
            A2AError::Http { status, .. } => Some(i64::from(*status)),
            A2AError::Transport(_)
            | A2AError::Timeout(_)
            | A2AError::InvalidJson(_)
            | A2AError::PollTimeout { .. }
            | A2AError::Other(_) => None,
            _ => Some(self.code()),
        }
    }

    /// Human-readable message without the variant prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            A2AError::ParseError { message, .. }
            | A2AError::InvalidRequest { message, .. }
            | A2AError::MethodNotFound { message, .. }
            | A2AError::InvalidParams { message, .. }
            | A2AError::InternalError { message, .. }
            | A2AError::TaskNotFound { message, .. }
            | A2AError::CapabilityNotFound { message, .. }
            | A2AError::TaskExecutionFailed { message, .. }
            | A2AError::AgentUnavailable { message, .. }
            | A2AError::JsonRpc { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True for the polling timeout and per-request timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, A2AError::Timeout(_) | A2AError::PollTimeout { .. })
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        let code = err.code();
        let message = err.to_string();
        let data = match &err {
            A2AError::ParseError { data, .. }
            | A2AError::InvalidRequest { data, .. }
            | A2AError::MethodNotFound { data, .. }
            | A2AError::InvalidParams { data, .. }
            | A2AError::InternalError { data, .. }
            | A2AError::TaskNotFound { data, .. }
            | A2AError::CapabilityNotFound { data, .. }
            | A2AError::TaskExecutionFailed { data, .. }
            | A2AError::AgentUnavailable { data, .. }
            | A2AError::JsonRpc { data, .. } => data.clone(),
            _ => None,
        };
        JsonRpcError {
            code,
            message,
            data,
        }
    }
}

impl From<JsonRpcError> for A2AError {
    fn from(err: JsonRpcError) -> Self {
        A2AError::JsonRpc {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::ParseError {
            message: err.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_taxonomy() {
        assert_eq!(PARSE_ERROR, -32700);
        assert_eq!(INVALID_REQUEST, -32600);
        assert_eq!(METHOD_NOT_FOUND, -32601);
        assert_eq!(INVALID_PARAMS, -32602);
        assert_eq!(INTERNAL_ERROR, -32603);
        assert_eq!(TASK_NOT_FOUND, -32001);
        assert_eq!(CAPABILITY_NOT_FOUND, -32002);
        assert_eq!(TASK_EXECUTION_FAILED, -32003);
        assert_eq!(AGENT_UNAVAILABLE, -32004);
    }

    #[test]
    fn a2a_error_to_json_rpc_error() {
        let err = A2AError::task_not_found("task-123");
        let rpc_err: JsonRpcError = err.into();
        assert_eq!(rpc_err.code, -32001);
        assert!(rpc_err.message.contains("task-123"));
        assert!(rpc_err.data.is_none());
    }

    #[test]
    fn transport_error_maps_to_internal() {
        let err = A2AError::Transport("connection refused".to_string());
        assert_eq!(err.code(), INTERNAL_ERROR);
        assert_eq!(err.origin_code(), None);
    }

    #[test]
    fn json_rpc_error_preserves_remote_code() {
        let err = A2AError::JsonRpc {
            code: -32002,
            message: "Capability not found".to_string(),
            data: None,
        };
        assert_eq!(err.code(), -32002);
        assert_eq!(err.origin_code(), Some(-32002));
        assert_eq!(err.to_string(), "Capability not found");
    }

    #[test]
    fn http_error_origin_code_is_status() {
        let err = A2AError::Http {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.origin_code(), Some(502));
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn poll_timeout_is_distinct_from_protocol_errors() {
        let err = A2AError::PollTimeout {
            task_id: "t-1".to_string(),
            waited: Duration::from_millis(50),
        };
        assert!(err.is_timeout());
        assert_eq!(err.origin_code(), None);
        assert!(err.to_string().contains("did not complete"));
    }

    #[test]
    fn protocol_error_data_propagates_to_json_rpc() {
        let validation_data = serde_json::json!({"missing": ["capability"]});
        let err = A2AError::InvalidParams {
            message: "Invalid parameters".to_string(),
            data: Some(validation_data.clone()),
        };
        let rpc_err: JsonRpcError = err.into();
        assert_eq!(rpc_err.code, INVALID_PARAMS);
        assert_eq!(rpc_err.data, Some(validation_data));
    }

    #[test]
    fn json_rpc_error_round_trips_into_a2a_error() {
        let rpc_err = JsonRpcError {
            code: TASK_NOT_FOUND,
            message: "Task not found: abc".to_string(),
            data: None,
        };
        let err: A2AError = rpc_err.into();
        assert_eq!(err.code(), TASK_NOT_FOUND);
        assert_eq!(err.message(), "Task not found: abc");
    }
}
