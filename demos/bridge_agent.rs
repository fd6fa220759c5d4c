//! Expose a local agent over A2A and call it through the client.
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example bridge_agent
//! ```

use std::sync::Arc;
use std::time::Duration;

use agentforge_a2a::bridge::{
    call_remote_agent, create_client, create_server, AgentConfig, AgentInput, AgentOutput,
    LocalAgent, ToolDescriptor,
};
use agentforge_a2a::server::a2a_router;
use agentforge_a2a::A2AResult;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Counts words and characters of whatever it is given.
struct TextStatsAgent;

#[async_trait]
impl LocalAgent for TextStatsAgent {
    fn agent_id(&self) -> Option<String> {
        Some("text-stats".to_string())
    }

    fn config(&self) -> Option<AgentConfig> {
        Some(AgentConfig::new(
            "Text Stats",
            "Computes simple statistics over text",
        ))
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::named("word_count")
                .with_description("Count the words in a message")
                .with_parameters_schema(json!({
                    "type": "object",
                    "properties": {"message": {"type": "string"}}
                })),
            ToolDescriptor::named("char_count").with_description("Count the characters"),
        ]
    }

    async fn execute(&self, input: AgentInput) -> A2AResult<AgentOutput> {
        let count = match input.capability.as_str() {
            "char_count" => input.message.chars().count(),
            _ => input.message.split_whitespace().count(),
        };
        let mut output = AgentOutput::text(count.to_string());
        output
            .metadata
            .insert("capability".into(), Value::String(input.capability));
        Ok(output)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let server = Arc::new(create_server(Arc::new(TextStatsAgent), &base_url, None));
    info!(url = %base_url, capabilities = ?server.capability_names(), "Serving bridge agent");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, a2a_router(server)).await {
            tracing::error!(error = %e, "Server stopped");
        }
    });

    let mut client = create_client(&base_url);
    let card = client.discover().await?;
    info!(agent = %card.name, version = %card.version, "Discovered agent");

    let mut input = Map::new();
    input.insert(
        "message".into(),
        json!("the quick brown fox jumps over the lazy dog"),
    );

    for capability in ["word_count", "char_count"] {
        let task = client.send_task(capability, input.clone()).await?;
        let content = task
            .output
            .as_ref()
            .and_then(|o| o.get("content"))
            .cloned()
            .unwrap_or(Value::Null);
        println!("{capability}: {content} ({})", task.status);
    }

    let reduced =
        call_remote_agent(&base_url, "word_count", input, Duration::from_secs(10)).await?;
    println!("call_remote_agent -> {}", Value::Object(reduced));

    let listed = client.list_tasks(None, 10).await?;
    println!("{} task(s) on the server", listed.total);
    Ok(())
}
