//! Error types for backend API calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the backend API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The configured backend base URL is empty.
    #[error("backend base URL is missing")]
    BaseUrlMissing,

    /// The request never produced a response.
    #[error("request failed: {message}")]
    Request { message: String },

    /// The backend rejected the call with a structured `{detail}` body.
    ///
    /// The detail text is what surfaces to the user (e.g. inside a chat
    /// error bubble), so it is the whole display form.
    #[error("{detail}")]
    Backend { detail: String },

    /// Non-success status without a structured error body.
    #[error("backend returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode backend response: {message}")]
    Decode { message: String },
}

/// Type alias for Result with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
