//! A2A protocol types: agent cards, tasks and the JSON-RPC envelope.
//!
//! Every type here is plain data with serde derives. Field names are
//! snake_case on the wire, timestamps are RFC 3339 strings, and maps that
//! may be absent on input default to empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{A2AError, A2AResult};
use crate::utils::{self, DEFAULT_CARD_VERSION, JSONRPC_VERSION};

// ============================================================================
// Enums
// ============================================================================

/// The lifecycle state of a task.
///
/// `submitted → working → {completed | failed | cancelled}`. The three
/// terminal states never change once reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has been received but not yet started.
    #[default]
    Submitted,
    /// Task is actively being processed.
    Working,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
    /// Task was cancelled.
    Cancelled,
}

impl TaskStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Submitted,
        TaskStatus::Working,
        TaskStatus::Completed,
        TaskStatus::Failed,
        TaskStatus::Cancelled,
    ];

    /// The wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Submitted => "submitted",
            TaskStatus::Working => "working",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// `true` for completed, failed and cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Whether a task in this status may move to `next`.
    ///
    /// Staying in the same non-terminal status is allowed. Cancellation is
    /// only reachable from `working`.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (TaskStatus::Submitted, TaskStatus::Cancelled) => false,
            (TaskStatus::Working, TaskStatus::Submitted) => false,
            _ => true,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = A2AError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| A2AError::invalid_params(format!("Invalid task status: {}", s)))
    }
}

// ============================================================================
// Agent card
// ============================================================================

fn default_version() -> String {
    DEFAULT_CARD_VERSION.to_string()
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

fn empty_schema() -> Value {
    Value::Object(Map::new())
}

/// A named operation an agent offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Unique name within the agent.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// JSON Schema of the accepted input.
    #[serde(default = "empty_schema")]
    pub input_schema: Value,

    /// JSON Schema of the produced output.
    #[serde(default = "empty_schema")]
    pub output_schema: Value,
}

impl Capability {
    /// Create a capability with empty schemas.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Capability {
            name: name.into(),
            description: description.into(),
            input_schema: empty_schema(),
            output_schema: empty_schema(),
        }
    }

    /// Set the input schema.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set the output schema.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = schema;
        self
    }
}

/// The advertised description of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    /// Agent identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Card version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Offered capabilities. Names are unique within a card.
    #[serde(default)]
    pub capabilities: Vec<Capability>,

    /// Endpoint names mapped to paths, e.g. `"tasks" → "/a2a"`.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// When the card was created.
    #[serde(default = "utils::now_timestamp")]
    pub created_at: String,
}

impl AgentCard {
    /// Create a card with default version and no capabilities.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        AgentCard {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: default_version(),
            capabilities: Vec::new(),
            endpoints: HashMap::new(),
            metadata: Map::new(),
            created_at: utils::now_timestamp(),
        }
    }

    /// Look up a capability by name.
    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the card advertises `name`.
    pub fn has_capability(&self, name: &str) -> bool {
        self.capability(name).is_some()
    }

    /// Add a capability, replacing any existing one with the same name.
    pub fn upsert_capability(&mut self, capability: Capability) {
        match self
            .capabilities
            .iter_mut()
            .find(|c| c.name == capability.name)
        {
            Some(existing) => *existing = capability,
            None => self.capabilities.push(capability),
        }
    }

    /// Remove a capability by name. Returns `true` if one was removed.
    pub fn remove_capability(&mut self, name: &str) -> bool {
        let before = self.capabilities.len();
        self.capabilities.retain(|c| c.name != name);
        self.capabilities.len() != before
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// A unit of work requested of an agent.
///
/// `output` is only present on `completed` tasks and `error` only on
/// `failed` ones. All mutations go through the state-machine methods below,
/// which refuse to move a terminal task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v4).
    pub id: String,

    /// The agent that owns the task.
    #[serde(default)]
    pub agent_id: String,

    /// Current lifecycle status.
    #[serde(default)]
    pub status: TaskStatus,

    /// Input supplied by the requester.
    #[serde(default)]
    pub input: Map<String, Value>,

    /// Output produced by the capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,

    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation time.
    #[serde(default = "utils::now_timestamp")]
    pub created_at: String,

    /// Last modification time. Never earlier than `created_at`.
    #[serde(default = "utils::now_timestamp")]
    pub updated_at: String,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Task {
    /// Create a submitted task with a fresh id.
    pub fn new(agent_id: impl Into<String>, input: Map<String, Value>) -> Self {
        let now = utils::now_timestamp();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.into(),
            status: TaskStatus::Submitted,
            input,
            output: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
            metadata: Map::new(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Refresh `updated_at`. The timestamp never moves backwards.
    pub fn touch(&mut self) {
        let now = Utc::now();
        match self.updated_at_utc() {
            Some(previous) if previous > now => {}
            _ => self.updated_at = utils::format_timestamp(now),
        }
    }

    /// `updated_at` as an instant, if it parses.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        utils::parse_timestamp(&self.updated_at)
    }

    /// `created_at` as an instant, if it parses.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        utils::parse_timestamp(&self.created_at)
    }

    /// `submitted → working`. Returns `false` if the task was not submitted.
    pub fn start(&mut self) -> bool {
        if self.status != TaskStatus::Submitted {
            return false;
        }
        self.status = TaskStatus::Working;
        self.touch();
        true
    }

    /// Record a successful result. Returns `false` for terminal tasks.
    pub fn complete(&mut self, output: Map<String, Value>) -> bool {
        if !self.status.can_transition_to(TaskStatus::Completed) {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.output = Some(output);
        self.error = None;
        self.touch();
        true
    }

    /// Record a failure. Returns `false` for terminal tasks.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if !self.status.can_transition_to(TaskStatus::Failed) {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.output = None;
        self.touch();
        true
    }

    /// `working → cancelled`. Any other status is left alone and `false`
    /// is returned.
    pub fn cancel(&mut self) -> bool {
        if self.status != TaskStatus::Working {
            return false;
        }
        self.status = TaskStatus::Cancelled;
        self.touch();
        true
    }

    /// Apply a partial update.
    ///
    /// Metadata is merged key by key. A status change goes through the same
    /// transitions as the methods above; `output` is only taken with
    /// `completed` and `error` only with `failed`. Returns `false` and leaves
    /// the task untouched when the status change is not allowed.
    pub fn apply_update(&mut self, update: TaskUpdate) -> bool {
        if let Some(next) = update.status {
            if next != self.status && !self.status.can_transition_to(next) {
                return false;
            }
            if next == self.status && self.status.is_terminal() {
                return false;
            }
        }

        if let Some(metadata) = update.metadata {
            self.metadata.extend(metadata);
        }

        match update.status {
            Some(TaskStatus::Working) => {
                if !self.start() {
                    self.touch();
                }
            }
            Some(TaskStatus::Completed) => {
                self.complete(update.output.unwrap_or_default());
            }
            Some(TaskStatus::Failed) => {
                let message = update.error.unwrap_or_else(|| "Task failed".to_string());
                self.fail(message);
            }
            Some(TaskStatus::Cancelled) => {
                self.cancel();
            }
            Some(TaskStatus::Submitted) | None => self.touch(),
        }
        true
    }
}

/// A partial modification of a stored task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// Task to modify.
    pub task_id: String,

    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Output to record with `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,

    /// Message to record with `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Metadata entries to merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TaskUpdate {
    /// An update touching nothing but the timestamp.
    pub fn new(task_id: impl Into<String>) -> Self {
        TaskUpdate {
            task_id: task_id.into(),
            ..Default::default()
        }
    }

    /// Set the target status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the output (used with `completed`).
    pub fn with_output(mut self, output: Map<String, Value>) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the failure message (used with `failed`).
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set metadata entries to merge.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// The `tasks/list` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// Matching tasks, at most `limit` of them.
    pub tasks: Vec<Task>,

    /// Number of tasks in the store, before filtering.
    pub total: usize,
}

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// A JSON-RPC 2.0 request id: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(i64),
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{}", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

impl From<i32> for JsonRpcId {
    fn from(n: i32) -> Self {
        JsonRpcId::Number(n as i64)
    }
}

/// A request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2AMessage {
    /// Protocol version, always "2.0".
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,

    /// Method name.
    pub method: String,

    /// Method parameters.
    #[serde(default)]
    pub params: Map<String, Value>,

    /// Correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,
}

impl A2AMessage {
    /// Create an envelope with no id.
    pub fn new(method: impl Into<String>, params: Map<String, Value>) -> Self {
        A2AMessage {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Set the correlation id.
    pub fn with_id(mut self, id: impl Into<JsonRpcId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Fetch a string parameter.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// A response envelope. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2AResponse {
    /// Protocol version, always "2.0".
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,

    /// Successful result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Id of the request this answers; `null` when it had none.
    #[serde(default)]
    pub id: Option<JsonRpcId>,
}

impl A2AResponse {
    /// Create a successful response.
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        A2AResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response.
    pub fn failure(id: Option<JsonRpcId>, error: impl Into<JsonRpcError>) -> Self {
        A2AResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error.into()),
            id,
        }
    }

    /// `true` if the response carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Turn the envelope into a `Result`. An error becomes
    /// [`A2AError::JsonRpc`] carrying the remote code.
    pub fn into_result(self) -> A2AResult<Value> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        self.result
            .ok_or_else(|| A2AError::InvalidJson("Response has neither result nor error".into()))
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional structured error data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn task_status_wire_strings() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, Value::String(status.to_string()));
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert_eq!(TaskStatus::Cancelled.to_string(), "cancelled");
        assert!("canceled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!TaskStatus::Submitted.is_terminal());
        assert!(!TaskStatus::Working.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }

    #[test]
    fn card_defaults() {
        let card = AgentCard::new("a1", "Agent One");
        assert_eq!(card.description, "");
        assert_eq!(card.version, "1.0.0");
        assert!(card.capabilities.is_empty());
        assert!(card.endpoints.is_empty());
        assert!(card.metadata.is_empty());
        assert!(utils::parse_timestamp(&card.created_at).is_some());
    }

    #[test]
    fn card_deserializes_with_missing_fields() {
        let card: AgentCard = serde_json::from_value(json!({"id": "a", "name": "A"})).unwrap();
        assert_eq!(card.version, "1.0.0");
        assert!(card.capabilities.is_empty());
    }

    #[test]
    fn capability_schemas_default_to_empty_object() {
        let cap = Capability::new("search", "Search things");
        assert_eq!(cap.input_schema, json!({}));
        assert_eq!(cap.output_schema, json!({}));

        let parsed: Capability = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.input_schema, json!({}));
    }

    #[test]
    fn upsert_capability_replaces_by_name() {
        let mut card = AgentCard::new("a", "A");
        card.upsert_capability(Capability::new("echo", "v1"));
        card.upsert_capability(Capability::new("echo", "v2"));
        assert_eq!(card.capabilities.len(), 1);
        assert_eq!(card.capability("echo").unwrap().description, "v2");
        assert!(card.remove_capability("echo"));
        assert!(!card.remove_capability("echo"));
    }

    #[test]
    fn task_defaults() {
        let task = Task::new("", Map::new());
        assert_eq!(task.agent_id, "");
        assert_eq!(task.status, TaskStatus::Submitted);
        assert!(task.input.is_empty());
        assert!(task.metadata.is_empty());
        assert!(task.output.is_none());
        assert!(task.error.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn task_ids_are_unique() {
        let a = Task::new("agent", Map::new());
        let b = Task::new("agent", Map::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut task = Task::new("agent", Map::new());
        let before = task.updated_at_utc().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        task.touch();
        assert!(task.updated_at_utc().unwrap() > before);
        assert!(task.updated_at_utc().unwrap() >= task.created_at_utc().unwrap());
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut task = Task::new("agent", Map::new());
        task.updated_at = "2999-01-01T00:00:00Z".to_string();
        task.touch();
        assert_eq!(task.updated_at, "2999-01-01T00:00:00Z");
    }

    #[test]
    fn lifecycle_complete() {
        let mut task = Task::new("agent", input(json!({"text": "hi"})));
        assert!(task.start());
        assert!(!task.start());
        assert!(task.complete(input(json!({"echo": "hi"}))));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.output.as_ref().unwrap()["echo"], "hi");
        assert!(task.error.is_none());
    }

    #[test]
    fn terminal_tasks_do_not_move() {
        let mut task = Task::new("agent", Map::new());
        task.start();
        task.fail("boom");
        assert!(!task.complete(Map::new()));
        assert!(!task.cancel());
        assert!(!task.fail("again"));
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("boom"));
        assert!(task.output.is_none());
    }

    #[test]
    fn cancel_only_from_working() {
        let mut submitted = Task::new("agent", Map::new());
        assert!(!submitted.cancel());
        assert_eq!(submitted.status, TaskStatus::Submitted);

        let mut working = Task::new("agent", Map::new());
        working.start();
        assert!(working.cancel());
        assert_eq!(working.status, TaskStatus::Cancelled);
        assert!(working.output.is_none());
        assert!(working.error.is_none());
    }

    #[test]
    fn update_cannot_revive_terminal_task() {
        let mut task = Task::new("agent", Map::new());
        task.start();
        task.complete(Map::new());
        let snapshot = task.clone();

        let revived = task.apply_update(TaskUpdate::new(&task.id).with_status(TaskStatus::Working));
        assert!(!revived);
        assert_eq!(task, snapshot);

        let recompleted =
            task.apply_update(TaskUpdate::new(&task.id).with_status(TaskStatus::Completed));
        assert!(!recompleted);
    }

    #[test]
    fn update_merges_metadata_and_completes() {
        let mut task = Task::new("agent", Map::new()).with_metadata(input(json!({"a": 1})));
        task.start();
        let update = TaskUpdate::new(&task.id)
            .with_status(TaskStatus::Completed)
            .with_output(input(json!({"answer": 42})))
            .with_metadata(input(json!({"b": 2})));
        assert!(task.apply_update(update));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.output.as_ref().unwrap()["answer"], 42);
        assert_eq!(task.metadata["a"], 1);
        assert_eq!(task.metadata["b"], 2);
    }

    #[test]
    fn update_without_status_ignores_output() {
        let mut task = Task::new("agent", Map::new());
        task.start();
        let update = TaskUpdate::new(&task.id).with_output(input(json!({"x": 1})));
        assert!(task.apply_update(update));
        assert_eq!(task.status, TaskStatus::Working);
        assert!(task.output.is_none());
    }

    #[test]
    fn task_round_trip() {
        let mut task = Task::new("agent", input(json!({"q": "x"})));
        task.start();
        task.complete(input(json!({"r": [1, 2, 3]})));
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn message_defaults() {
        let msg = A2AMessage::new("tasks/get", Map::new());
        assert_eq!(msg.jsonrpc, "2.0");
        assert!(msg.params.is_empty());
        assert!(msg.id.is_none());

        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("id").is_none());
    }

    #[test]
    fn missing_envelope_fields_take_defaults() {
        let message: A2AMessage =
            serde_json::from_value(json!({"method": "agent/card"})).unwrap();
        assert_eq!(message.jsonrpc, "2.0");
        assert!(message.id.is_none());

        let response: A2AResponse =
            serde_json::from_value(json!({"result": {}, "id": null})).unwrap();
        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.into_result().unwrap(), json!({}));

        let task: Task = serde_json::from_value(json!({"id": "t1", "status": "working"})).unwrap();
        assert_eq!(task.status, TaskStatus::Working);
        assert!(task.created_at_utc().is_some());
        assert!(task.updated_at_utc().is_some());

        let parsed: A2AMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "agent/card", "id": 7}))
                .unwrap();
        assert_eq!(parsed.id, Some(JsonRpcId::Number(7)));
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn response_success_and_failure() {
        let ok = A2AResponse::success(Some("1".into()), json!({"id": "t1"}));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], "1");
        assert!(json.get("error").is_none());
        assert_eq!(ok.into_result().unwrap()["id"], "t1");

        let err = A2AResponse::failure(None, A2AError::task_not_found("nope"));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"]["code"], -32001);
        assert!(json["id"].is_null());
        assert!(json.get("result").is_none());
        let back = err.into_result().unwrap_err();
        assert_eq!(back.code(), -32001);
    }

    #[test]
    fn empty_response_is_invalid() {
        let response: A2AResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(A2AError::InvalidJson(_))
        ));
    }

    #[test]
    fn json_rpc_id_variants() {
        let id_str: JsonRpcId = "abc".into();
        assert_eq!(serde_json::to_string(&id_str).unwrap(), "\"abc\"");

        let id_num: JsonRpcId = 42i64.into();
        assert_eq!(serde_json::to_string(&id_num).unwrap(), "42");
        assert_eq!(id_num.to_string(), "42");
    }
}
