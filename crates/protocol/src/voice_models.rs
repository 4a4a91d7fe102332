//! Voice session wire formats and room state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Response body for `GET /api/voice/token`.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct VoiceTokenResponse {
    /// Short-lived access token for the realtime audio room.
    pub token: String,

    /// Room endpoint to connect to.
    #[serde(rename = "serverUrl")]
    pub server_url: String,
}

/// Connection state of a live voice session.
///
/// States are sourced from the realtime room client, not owned by this
/// code; the overlay only renders them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSessionState {
    Connecting,
    Listening,
    Thinking,
    Speaking,
}

impl VoiceSessionState {
    /// Label rendered next to the status dot.
    pub fn label(self) -> &'static str {
        match self {
            VoiceSessionState::Connecting => "Connecting",
            VoiceSessionState::Listening => "Listening",
            VoiceSessionState::Thinking => "Thinking",
            VoiceSessionState::Speaking => "Speaking",
        }
    }
}
