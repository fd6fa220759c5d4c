//! Bridge between local agents and the A2A protocol.
//!
//! A [`LocalAgent`] is anything that can run a prompt-like input and produce
//! structured output. The bridge derives an [`AgentCard`] from it, hosts it
//! behind an [`A2AServer`], and calls remote agents on its behalf.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client::{A2AClient, TransportConfig};
use crate::error::A2AResult;
use crate::server::{A2AServer, CapabilityHandler};
use crate::types::{AgentCard, Capability};
use crate::utils::{AGENT_CARD_WELL_KNOWN_PATH, DEFAULT_RPC_PATH};

/// Framework tag written into card metadata.
pub const FRAMEWORK_NAME: &str = "agentforge";

/// Name of the capability created for agents without tools.
pub const DEFAULT_CAPABILITY: &str = "execute";

// ---------------------------------------------------------------------------
// Local agent surface
// ---------------------------------------------------------------------------

/// Static configuration of a local agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl AgentConfig {
    /// Create a config.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A tool a local agent exposes. Each becomes one capability.
///
/// Every field is optional. Name and description fall back to `identifier`
/// and `doc`; the input schema is the first of `parameters_schema`,
/// `input_schema` and `args_schema` that is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Explicit tool name.
    pub name: Option<String>,
    /// Explicit description.
    pub description: Option<String>,
    /// JSON Schema of the tool's parameters.
    pub parameters_schema: Option<Value>,
    /// Alternative schema slot.
    pub input_schema: Option<Value>,
    /// Alternative schema slot.
    pub args_schema: Option<Value>,
    /// Fallback name, e.g. the implementing function's identifier.
    pub identifier: Option<String>,
    /// Fallback description, e.g. the implementing function's doc text.
    pub doc: Option<String>,
}

impl ToolDescriptor {
    /// A tool with an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// A tool known only by identifier and doc text.
    pub fn from_identifier(identifier: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            doc: Some(doc.into()),
            ..Default::default()
        }
    }

    /// Set the explicit description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the parameters schema.
    pub fn with_parameters_schema(mut self, schema: Value) -> Self {
        self.parameters_schema = Some(schema);
        self
    }

    /// Set the input schema slot.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Set the args schema slot.
    pub fn with_args_schema(mut self, schema: Value) -> Self {
        self.args_schema = Some(schema);
        self
    }

    /// The capability this tool maps to.
    pub fn to_capability(&self) -> Capability {
        let name = self
            .name
            .clone()
            .or_else(|| self.identifier.clone())
            .unwrap_or_else(|| "tool".to_string());
        let description = self
            .description
            .clone()
            .or_else(|| self.doc.clone())
            .unwrap_or_default();
        let schema = self
            .parameters_schema
            .clone()
            .or_else(|| self.input_schema.clone())
            .or_else(|| self.args_schema.clone())
            .unwrap_or_else(|| Value::Object(Map::new()));
        Capability::new(name, description).with_input_schema(schema)
    }
}

/// What a local agent receives for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInput {
    /// The capability being invoked.
    pub capability: String,
    /// The prompt text.
    pub message: String,
    /// The task's full input.
    pub context: Map<String, Value>,
}

impl AgentInput {
    /// Build the agent input for `capability` from a task's input map.
    ///
    /// The message is the first string among `message`, `query` and
    /// `prompt`; otherwise it is the JSON text of the whole input.
    pub fn from_task_input(capability: impl Into<String>, input: Map<String, Value>) -> Self {
        let message = ["message", "query", "prompt"]
            .iter()
            .find_map(|key| input.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(input.clone()).to_string());
        Self {
            capability: capability.into(),
            message,
            context: input,
        }
    }
}

/// What a local agent produces for one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Main response text.
    #[serde(default)]
    pub content: String,
    /// Error reported by the agent, if any.
    #[serde(default)]
    pub error: Option<String>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Follow-up actions the agent requests.
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl AgentOutput {
    /// An output carrying only content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Flatten into the task output map:
    /// `{"content", "error", "metadata", "actions"}`.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("content".into(), Value::String(self.content));
        map.insert(
            "error".into(),
            self.error.map(Value::String).unwrap_or(Value::Null),
        );
        map.insert("metadata".into(), Value::Object(self.metadata));
        map.insert("actions".into(), Value::Array(self.actions));
        map
    }
}

/// A local agent the bridge can expose.
#[async_trait]
pub trait LocalAgent: Send + Sync {
    /// The agent's identifier, if it has one.
    fn agent_id(&self) -> Option<String>;

    /// Static configuration.
    fn config(&self) -> Option<AgentConfig> {
        None
    }

    /// System instructions.
    fn instructions(&self) -> Option<String> {
        None
    }

    /// Tools the agent exposes.
    fn tools(&self) -> Vec<ToolDescriptor> {
        Vec::new()
    }

    /// Run the agent once.
    async fn execute(&self, input: AgentInput) -> A2AResult<AgentOutput>;
}

// ---------------------------------------------------------------------------
// Bridge operations
// ---------------------------------------------------------------------------

/// Derive an agent card from a local agent.
///
/// One capability per tool; an agent without tools gets a single
/// `execute` capability described by its instructions.
pub fn agent_to_card(agent: &dyn LocalAgent, base_url: &str) -> AgentCard {
    let config = agent.config();
    let agent_id = agent.agent_id().filter(|id| !id.is_empty());

    let id = agent_id
        .clone()
        .or_else(|| config.as_ref().map(|c| c.name.clone()))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "agent".to_string());
    let name = config
        .as_ref()
        .map(|c| c.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| id.clone());
    let description = config.map(|c| c.description).unwrap_or_default();

    let tools = agent.tools();
    let capabilities = if tools.is_empty() {
        let description = agent
            .instructions()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| format!("Execute {}", name));
        vec![Capability::new(DEFAULT_CAPABILITY, description)]
    } else {
        tools.iter().map(ToolDescriptor::to_capability).collect()
    };

    let mut card = AgentCard::new(id, name);
    card.description = description;
    card.capabilities = capabilities;
    card.endpoints
        .insert("tasks".to_string(), DEFAULT_RPC_PATH.to_string());
    card.endpoints
        .insert("card".to_string(), AGENT_CARD_WELL_KNOWN_PATH.to_string());
    card.metadata
        .insert("framework".to_string(), Value::String(FRAMEWORK_NAME.into()));
    card.metadata
        .insert("base_url".to_string(), Value::String(base_url.to_string()));
    card
}

/// Runs one capability by invoking a local agent.
pub struct AgentCapabilityHandler {
    agent: Arc<dyn LocalAgent>,
    capability: String,
}

impl AgentCapabilityHandler {
    /// Handle `capability` with `agent`.
    pub fn new(agent: Arc<dyn LocalAgent>, capability: impl Into<String>) -> Self {
        Self {
            agent,
            capability: capability.into(),
        }
    }
}

#[async_trait]
impl CapabilityHandler for AgentCapabilityHandler {
    async fn invoke(&self, input: Map<String, Value>) -> A2AResult<Value> {
        let agent_input = AgentInput::from_task_input(self.capability.clone(), input);
        debug!(capability = %self.capability, "Invoking local agent");
        let output = self.agent.execute(agent_input).await?;
        Ok(Value::Object(output.into_map()))
    }
}

/// Host a local agent behind a new [`A2AServer`].
///
/// Uses `card` when given, otherwise derives one with [`agent_to_card`].
/// Every capability on the card is routed to the agent.
pub fn create_server(
    agent: Arc<dyn LocalAgent>,
    base_url: &str,
    card: Option<AgentCard>,
) -> A2AServer {
    let card = card.unwrap_or_else(|| agent_to_card(agent.as_ref(), base_url));
    let names: Vec<String> = card.capabilities.iter().map(|c| c.name.clone()).collect();
    let server = A2AServer::new(card);
    for name in names {
        let handler = AgentCapabilityHandler::new(Arc::clone(&agent), name.clone());
        server.register_capability(name, Arc::new(handler));
    }
    info!(agent_id = %server.card().id, capabilities = server.capability_names().len(), "Bridge server created");
    server
}

/// Create a client for a remote agent.
pub fn create_client(base_url: &str) -> A2AClient {
    A2AClient::new(base_url)
}

/// Call `capability` on the agent at `base_url` and reduce the task to a
/// single map: its output, else `{"error": …}`, else `{"status": …}`.
pub async fn call_remote_agent(
    base_url: &str,
    capability: &str,
    input: Map<String, Value>,
    timeout: Duration,
) -> A2AResult<Map<String, Value>> {
    let config = TransportConfig {
        timeout,
        ..Default::default()
    };
    let client = A2AClient::with_config(base_url, config);
    call_agent(&client, capability, input).await
}

/// Like [`call_remote_agent`], on an existing client.
pub async fn call_agent(
    client: &A2AClient,
    capability: &str,
    input: Map<String, Value>,
) -> A2AResult<Map<String, Value>> {
    let task = client.send_task(capability, input).await?;
    debug!(task_id = %task.id, status = %task.status, "Remote call returned");

    if let Some(output) = task.output {
        return Ok(output);
    }
    let mut reduced = Map::new();
    match task.error {
        Some(error) => {
            reduced.insert("error".into(), Value::String(error));
        }
        None => {
            reduced.insert("status".into(), Value::String(task.status.to_string()));
        }
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_fallbacks() {
        let bare = ToolDescriptor::default().to_capability();
        assert_eq!(bare.name, "tool");
        assert_eq!(bare.description, "");
        assert_eq!(bare.input_schema, json!({}));

        let documented = ToolDescriptor::from_identifier("analyze", "Analyze data deeply");
        let cap = documented.to_capability();
        assert_eq!(cap.name, "analyze");
        assert_eq!(cap.description, "Analyze data deeply");
    }

    #[test]
    fn schema_slots_in_priority_order() {
        let tool = ToolDescriptor::named("compute")
            .with_args_schema(json!({"slot": "args"}))
            .with_input_schema(json!({"slot": "input"}));
        assert_eq!(tool.to_capability().input_schema["slot"], "input");

        let tool = tool.with_parameters_schema(json!({"slot": "parameters"}));
        assert_eq!(tool.to_capability().input_schema["slot"], "parameters");
    }

    #[test]
    fn agent_input_message_extraction() {
        let input = json!({"query": "weather?", "prompt": "ignored"});
        let agent_input =
            AgentInput::from_task_input("execute", input.as_object().cloned().unwrap());
        assert_eq!(agent_input.message, "weather?");

        let input = json!({"numbers": [1, 2]});
        let agent_input =
            AgentInput::from_task_input("execute", input.as_object().cloned().unwrap());
        assert_eq!(agent_input.message, r#"{"numbers":[1,2]}"#);
        assert_eq!(agent_input.context["numbers"], json!([1, 2]));
    }

    #[test]
    fn output_flattening() {
        let mut output = AgentOutput::text("done");
        output.actions.push(json!({"type": "notify"}));
        let map = output.into_map();
        assert_eq!(map["content"], "done");
        assert!(map["error"].is_null());
        assert_eq!(map["metadata"], json!({}));
        assert_eq!(map["actions"][0]["type"], "notify");
    }
}
