//! HTTP client for the backend API.

use crate::api::error::{ApiError, ApiResult};
use crate::api::ChatBackend;
use crate::config::AppConfig;
use async_trait::async_trait;
use omni_protocol::{
    AgentSummary, ApiErrorBody, ChatRequest, ChatResponse, Message, VoiceTokenResponse,
};

/// Client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let trimmed = config.backend_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::BaseUrlMissing);
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn chat_path() -> &'static str {
        "/api/chat"
    }

    #[must_use]
    pub fn agents_path() -> &'static str {
        "/api/agents"
    }

    #[must_use]
    pub fn voice_token_path(agent_slug: &str) -> String {
        format!("/api/voice/token?agent_slug={}", agent_slug.trim())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_chat(&self, messages: &[Message], agent_slug: &str) -> ApiResult<String> {
        let request = ChatRequest {
            messages: messages.to_vec(),
            agent_slug: agent_slug.to_string(),
        };

        let response = self
            .http
            .post(self.endpoint(Self::chat_path()))
            .json(&request)
            .send()
            .await
            .map_err(|error| ApiError::Request {
                message: error.to_string(),
            })?;

        let body: ChatResponse = decode_json(response).await?;
        Ok(body.response)
    }

    async fn list_agents(&self) -> ApiResult<Vec<AgentSummary>> {
        let response = self
            .http
            .get(self.endpoint(Self::agents_path()))
            .send()
            .await
            .map_err(|error| ApiError::Request {
                message: error.to_string(),
            })?;

        decode_json(response).await
    }

    async fn voice_token(&self, agent_slug: &str) -> ApiResult<VoiceTokenResponse> {
        let response = self
            .http
            .get(self.endpoint(&Self::voice_token_path(agent_slug)))
            .send()
            .await
            .map_err(|error| ApiError::Request {
                message: error.to_string(),
            })?;

        decode_json(response).await
    }
}

/// Decodes a success body, mapping non-2xx responses to [`ApiError`].
///
/// Non-success responses carry `{detail}` when the backend produced the
/// error itself; anything else (proxy errors, plain text) falls back to the
/// raw body.
async fn decode_json<T>(response: reqwest::Response) -> ApiResult<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let status = response.status();
    let bytes = response.bytes().await.map_err(|error| ApiError::Request {
        message: error.to_string(),
    })?;

    if !status.is_success() {
        if let Ok(body) = serde_json::from_slice::<ApiErrorBody>(&bytes) {
            return Err(ApiError::Backend {
                detail: body.detail,
            });
        }
        return Err(ApiError::Http {
            status,
            body: String::from_utf8_lossy(&bytes).trim().to_string(),
        });
    }

    serde_json::from_slice(&bytes).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers_are_deterministic() {
        assert_eq!(ApiClient::chat_path(), "/api/chat");
        assert_eq!(ApiClient::agents_path(), "/api/agents");
        assert_eq!(
            ApiClient::voice_token_path("pirate-bot"),
            "/api/voice/token?agent_slug=pirate-bot"
        );
        assert_eq!(
            ApiClient::voice_token_path(" general "),
            "/api/voice/token?agent_slug=general"
        );
    }

    #[test]
    fn endpoint_builder_strips_trailing_slash() {
        let config = AppConfig {
            backend_url: "https://api.localhost/".to_string(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("/api/chat"),
            "https://api.localhost/api/chat"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config = AppConfig {
            backend_url: String::new(),
            ..AppConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::BaseUrlMissing)
        ));
    }

    #[test]
    fn backend_error_display_is_the_detail_text() {
        let error = ApiError::Backend {
            detail: "No API key configured".to_string(),
        };
        assert_eq!(error.to_string(), "No API key configured");
    }
}
