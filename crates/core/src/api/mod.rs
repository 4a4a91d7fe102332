//! Backend API client (chat, agent listing, voice tokens).
//!
//! Every call is fire-and-forget with a single success/error branch: no
//! retries, no timeouts beyond the HTTP client's own, no cancellation.

pub mod client;
pub mod error;

use async_trait::async_trait;
use omni_protocol::{AgentSummary, Message, VoiceTokenResponse};

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};

/// The backend chat transport.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the full message history with a routing key; returns the single
    /// assistant reply.
    async fn send_chat(&self, messages: &[Message], agent_slug: &str) -> ApiResult<String>;

    /// Fetch the agent summaries for the chat selector.
    async fn list_agents(&self) -> ApiResult<Vec<AgentSummary>>;

    /// Request a short-lived voice token and room endpoint for an agent.
    async fn voice_token(&self, agent_slug: &str) -> ApiResult<VoiceTokenResponse>;
}
