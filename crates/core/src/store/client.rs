//! HTTP client for the hosted record store.

use crate::config::AppConfig;
use crate::store::error::{StoreError, StoreResult};
use crate::store::AgentConfigStore;
use async_trait::async_trait;
use omni_protocol::AgentConfig;
use uuid::Uuid;

const TABLE: &str = "agent_configs";

/// Client for the record store's PostgREST surface.
///
/// Constructed explicitly and passed down; there is no module-level
/// singleton.
#[derive(Debug, Clone)]
pub struct RecordStore {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl RecordStore {
    pub fn new(config: &AppConfig) -> StoreResult<Self> {
        let trimmed = config.store_url.trim();
        if trimmed.is_empty() {
            return Err(StoreError::BaseUrlMissing);
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            api_key: config.store_key.clone(),
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn list_path() -> String {
        format!("/rest/v1/{TABLE}?select=*&order=created_at.asc")
    }

    #[must_use]
    pub fn upsert_path() -> String {
        format!("/rest/v1/{TABLE}")
    }

    #[must_use]
    pub fn delete_path(id: Uuid) -> String {
        format!("/rest/v1/{TABLE}?id=eq.{id}")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl AgentConfigStore for RecordStore {
    async fn list(&self) -> StoreResult<Vec<AgentConfig>> {
        let response = self
            .authed(self.http.get(self.endpoint(&Self::list_path())))
            .send()
            .await
            .map_err(|error| StoreError::Request {
                message: error.to_string(),
            })?;

        decode_json(response).await
    }

    async fn upsert(&self, config: &AgentConfig) -> StoreResult<AgentConfig> {
        let response = self
            .authed(self.http.post(self.endpoint(&Self::upsert_path())))
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .json(config)
            .send()
            .await
            .map_err(|error| StoreError::Request {
                message: error.to_string(),
            })?;

        // PostgREST returns the stored rows as an array
        let mut rows: Vec<AgentConfig> = decode_json(response).await?;
        match rows.pop() {
            Some(stored) => Ok(stored),
            None => Err(StoreError::EmptyReply),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let response = self
            .authed(self.http.delete(self.endpoint(&Self::delete_path(id))))
            .send()
            .await
            .map_err(|error| StoreError::Request {
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Http { status, body });
        }
        Ok(())
    }
}

async fn decode_json<T>(response: reqwest::Response) -> StoreResult<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let status = response.status();
    let bytes = response.bytes().await.map_err(|error| StoreError::Request {
        message: error.to_string(),
    })?;

    if !status.is_success() {
        return Err(StoreError::Http {
            status,
            body: String::from_utf8_lossy(&bytes).trim().to_string(),
        });
    }

    serde_json::from_slice(&bytes).map_err(|error| StoreError::Decode {
        message: error.to_string(),
    })
}
