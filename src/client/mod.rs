//! A2A client: call remote A2A agents.
//!
//! - [`A2AClient`]: typed methods for the built-in envelope methods, card
//!   discovery and polling
//! - [`CardResolver`]: fetch agent cards from the well-known path
//! - [`Transport`] / [`JsonRpcTransport`]: pluggable transport layer
//!
//! # Quick Start
//!
//! ```no_run
//! use agentforge_a2a::client::A2AClient;
//! use serde_json::{json, Map};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = A2AClient::new("http://localhost:8000");
//!
//! let mut input = Map::new();
//! input.insert("text".into(), json!("hello"));
//! let task = client.send_task("echo", input).await?;
//!
//! let done = client
//!     .poll_until_complete(&task.id, Duration::from_millis(500), Duration::from_secs(30))
//!     .await?;
//! println!("Task {} finished as {}", done.id, done.status);
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod card_resolver;
mod transport;

pub use a2a_client::A2AClient;
pub use card_resolver::CardResolver;
pub use transport::{JsonRpcTransport, Transport, TransportConfig};
