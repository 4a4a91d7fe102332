//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between the TUI (user interface) and the Core (client logic).
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from TUI to Core
//! - `Event`: Results and status updates sent from Core to TUI
//!
//! Communication is asynchronous and channel-based: the core performs one
//! network call per op and replies with exactly one terminal event, so the
//! UI stays responsive while requests are in flight. A live voice session
//! additionally streams state and audio-level events until torn down.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::agent_models::{AgentConfig, AgentSummary};
use crate::chat_models::Message;
use crate::voice_models::VoiceSessionState;

/// Operations sent from the UI (TUI) to the Core logic.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "sendChat",
///   "payload": {
///     "messages": [],
///     "agent_slug": "general"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Fetch the agent summaries that populate the chat selector.
    FetchAgents,

    /// Send the full chat history plus a routing key to the backend.
    ///
    /// The routing key is either a specific agent's slug or the `auto`
    /// sentinel meaning "let the backend choose".
    SendChat {
        messages: Vec<Message>,
        agent_slug: String,
    },

    /// Fetch all agent configuration records, oldest first.
    FetchAgentConfigs,

    /// Upsert an agent configuration record.
    ///
    /// The core derives the slug from the name when the slug is empty.
    SaveAgentConfig { config: AgentConfig },

    /// Delete an agent configuration record by id.
    DeleteAgentConfig {
        #[ts(type = "string")]
        id: Uuid,
    },

    /// Request a voice token and connect to the realtime audio room.
    StartVoice { agent_slug: String },

    /// Tear down the live voice session. User-initiated only.
    EndVoice,

    /// Shut down the core loop.
    Shutdown,
}

/// Events sent from the Core logic to the UI (TUI).
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "chatCompleted",
///   "payload": { "content": "Hello!" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// Agent summaries arrived for the chat selector.
    AgentsLoaded { agents: Vec<AgentSummary> },

    /// The agent listing request failed. Non-fatal; the selector stays empty.
    AgentsLoadFailed { error: String },

    /// The backend answered a chat request with one assistant message.
    ChatCompleted { content: String },

    /// A chat request failed.
    ///
    /// The chat page renders this in-band as a synthetic assistant message,
    /// never as a crash.
    ChatFailed { error: String },

    /// All agent configuration records arrived, oldest first.
    AgentConfigsLoaded { configs: Vec<AgentConfig> },

    /// The record listing failed.
    AgentConfigsLoadFailed { error: String },

    /// An upsert succeeded; the payload is the stored record (with its
    /// server-assigned id and creation time).
    AgentConfigSaved { config: AgentConfig },

    /// A delete succeeded.
    AgentConfigDeleted {
        #[ts(type = "string")]
        id: Uuid,
    },

    /// A save or delete failed. The builder surfaces a blocking alert and
    /// leaves local state untouched.
    StoreFailed { error: String },

    /// The voice token request failed. The overlay shows a dismissible
    /// error panel; there is no retry.
    VoiceTokenFailed { error: String },

    /// The room client reported a connection-state change.
    VoiceStateChanged { state: VoiceSessionState },

    /// The room client reported an audio level sample (0.0..=1.0).
    VoiceAudioLevel { level: f32 },
}
