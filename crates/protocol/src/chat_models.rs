//! Chat wire formats for the backend `/api/chat` endpoint.
//!
//! Messages are ephemeral: they live only in the chat page's in-memory
//! session list and are never persisted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Routing sentinel meaning "let the backend pick the agent".
pub const AUTO_ROUTE_SLUG: &str = "auto";

/// Who authored a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /api/chat`.
///
/// Carries the full message history plus a routing key: either a specific
/// agent's slug or [`AUTO_ROUTE_SLUG`].
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub agent_slug: String,
}

/// Response body for `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body carried by non-2xx backend responses.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct ApiErrorBody {
    pub detail: String,
}
