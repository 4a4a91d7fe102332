//! Error types for record store operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The configured store base URL is empty.
    #[error("record store base URL is missing")]
    BaseUrlMissing,

    /// The request never produced a response.
    #[error("record store request failed: {message}")]
    Request { message: String },

    /// The store answered with a non-success status.
    #[error("record store returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode record store response: {message}")]
    Decode { message: String },

    /// An upsert with `return=representation` came back empty.
    #[error("record store returned no record for upsert")]
    EmptyReply,
}

/// Type alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
