//! Record store client for agent configuration records.
//!
//! The hosted relational database exposes a PostgREST-style HTTP surface;
//! this module wraps the three operations the builder needs (list, upsert,
//! delete) behind the [`AgentConfigStore`] trait so the session router can
//! be tested against a scripted store.

pub mod client;
pub mod error;

use async_trait::async_trait;
use omni_protocol::AgentConfig;
use uuid::Uuid;

pub use client::RecordStore;
pub use error::{StoreError, StoreResult};

/// Store operations over agent configuration records.
///
/// All operations are all-or-nothing: there is no partial failure, no
/// retry, and no optimistic locking (last write wins).
#[async_trait]
pub trait AgentConfigStore: Send + Sync {
    /// Fetch all records ordered by creation time ascending.
    async fn list(&self) -> StoreResult<Vec<AgentConfig>>;

    /// Insert or update one record, returning the stored representation
    /// (with its server-assigned id and creation time).
    async fn upsert(&self, config: &AgentConfig) -> StoreResult<AgentConfig>;

    /// Delete one record by id.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
