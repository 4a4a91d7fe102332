//! Configuration models for the client endpoints.

/// Endpoint configuration for all remote services.
///
/// Resolution order: built-in local-development defaults, then `omni.toml`
/// values, then `OMNI_*` environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the backend API (chat, agent listing, voice tokens).
    pub backend_url: String,

    /// Base URL of the hosted record store.
    pub store_url: String,

    /// API key sent with every record-store request.
    pub store_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://api.localhost".to_string(),
            store_url: "http://localhost:8000".to_string(),
            store_key: String::new(),
        }
    }
}
