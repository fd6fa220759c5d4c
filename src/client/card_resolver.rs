//! Agent card discovery.
//!
//! Fetches the card an agent publishes at its well-known path.

use tracing::debug;

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;
use crate::utils::AGENT_CARD_WELL_KNOWN_PATH;

use super::transport::map_send_error;

/// Resolves [`AgentCard`]s from agent base URLs.
///
/// Fetches `{base_url}/.well-known/agent.json` (or an overridden path) and
/// deserializes it into an [`AgentCard`].
///
/// # Example
///
/// ```no_run
/// use agentforge_a2a::client::CardResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = CardResolver::new();
/// let card = resolver.resolve("http://localhost:8000").await?;
/// println!("Agent: {} v{}", card.name, card.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
    card_path: String,
}

impl CardResolver {
    /// Create a new resolver with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new resolver with an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            card_path: AGENT_CARD_WELL_KNOWN_PATH.to_string(),
        }
    }

    /// Override the card path.
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.card_path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// The path cards are fetched from.
    pub fn card_path(&self) -> &str {
        &self.card_path
    }

    /// Fetch and parse the agent card from the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Transport`] on connection failures,
    /// [`A2AError::Timeout`] when the request times out, [`A2AError::Http`]
    /// on non-2xx responses, and [`A2AError::InvalidJson`] when the body is
    /// not a card.
    pub async fn resolve(&self, base_url: &str) -> A2AResult<AgentCard> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), self.card_path);
        debug!(url = %url, "Resolving agent card");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_send_error(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::Transport(format!("Failed to read agent card response: {e}")))?;

        let card: AgentCard = serde_json::from_slice(&bytes)
            .map_err(|e| A2AError::InvalidJson(format!("Invalid agent card JSON: {e}")))?;

        debug!(agent_id = %card.id, version = %card.version, "Resolved agent card");
        Ok(card)
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}
