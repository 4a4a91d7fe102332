//! Agent configuration models for the `agent_configs` record store table.
//!
//! This module defines the structure of agent configuration records and the
//! custom webhook tools attached to them. The durable shape of a tool's
//! arguments is an ordered map (insertion order preserved) from argument
//! name to a JSON-schema fragment; the editor widget projects it into a row
//! list while editing.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Built-in tool identifiers an agent may enable, with display labels.
pub const BUILTIN_TOOLS: &[(&str, &str)] = &[
    ("web_search", "Web Search (SearXNG)"),
    ("web_scraper", "Web Scraper (Smart Scrape)"),
];

/// Model provider backing an agent.
///
/// Each provider constrains the set of model names offered by the builder
/// form; the record store persists the lowercase identifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ModelProvider {
    /// All providers, in the order the builder form cycles through them.
    pub const ALL: &'static [ModelProvider] = &[
        ModelProvider::OpenAi,
        ModelProvider::Anthropic,
        ModelProvider::Ollama,
    ];

    /// Model names offered for this provider.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            ModelProvider::OpenAi => &["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"],
            ModelProvider::Anthropic => &[
                "claude-3-5-sonnet-20240620",
                "claude-3-opus-20240229",
                "claude-3-haiku-20240307",
            ],
            ModelProvider::Ollama => &["llama3", "mistral", "gemma"],
        }
    }

    /// Display label for the builder form.
    pub fn label(self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "OpenAI",
            ModelProvider::Anthropic => "Anthropic",
            ModelProvider::Ollama => "Ollama",
        }
    }
}

/// JSON-schema primitive type of a tool argument.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    #[default]
    String,
    Integer,
    Boolean,
}

impl ArgumentType {
    /// All types, in the order the editor cycles through them.
    pub const ALL: &'static [ArgumentType] = &[
        ArgumentType::String,
        ArgumentType::Integer,
        ArgumentType::Boolean,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArgumentType::String => "string",
            ArgumentType::Integer => "integer",
            ArgumentType::Boolean => "boolean",
        }
    }
}

/// Schema fragment stored per argument in a tool's arguments map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
pub struct ArgumentSchema {
    /// Primitive type; missing values default to `string`.
    #[serde(rename = "type", default)]
    pub arg_type: ArgumentType,

    /// Human-readable description; missing values default to empty.
    #[serde(default)]
    pub description: String,
}

/// View-only row projection of one arguments-map entry.
///
/// Never persisted. Rows exist only because the editor needs positional
/// identity and ordered editing; names may be temporarily blank or
/// duplicated while the user types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArgument {
    pub name: String,
    pub arg_type: ArgumentType,
    pub description: String,
}

impl ToolArgument {
    /// A fresh blank row as produced by the editor's "add argument" action.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            arg_type: ArgumentType::String,
            description: String::new(),
        }
    }
}

/// A custom webhook tool attached to an agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
pub struct CustomTool {
    /// Identifier the model invokes the tool by (intended snake_case).
    pub name: String,

    /// What the tool does, surfaced to the model.
    pub description: String,

    /// Webhook endpoint invoked when the tool is called.
    pub webhook_url: String,

    /// Optional auth header sent with webhook calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header_value: Option<String>,

    /// Argument schema, keyed by argument name. Insertion order is the
    /// display order; this map is the single durable representation.
    #[serde(default)]
    pub arguments: IndexMap<String, ArgumentSchema>,
}

impl CustomTool {
    /// New-tool template as created by the builder's "add tool" action.
    pub fn template() -> Self {
        Self {
            auth_header_name: Some("x-n8n-secret".to_string()),
            auth_header_value: Some(String::new()),
            ..Self::default()
        }
    }
}

/// An agent configuration record.
///
/// Created empty in memory, persisted via upsert, deleted by id. There is
/// no versioning: concurrent editors of the same record silently overwrite
/// each other (last write wins).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct AgentConfig {
    /// Record identity; `None` until first persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub id: Option<Uuid>,

    /// Display name.
    pub name: String,

    /// URL-safe identifier; derived from the name on save when empty.
    pub slug: String,

    /// Free-text system prompt.
    pub system_prompt: String,

    pub model_provider: ModelProvider,

    /// Model name, constrained by the provider.
    pub model_name: String,

    /// Sampling temperature.
    pub temperature: f32,

    pub is_active: bool,

    /// Enabled built-in tool identifiers.
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub custom_tools: Vec<CustomTool>,

    /// Server-assigned creation time; drives list ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for AgentConfig {
    /// The "new agent" template shown before a record is selected.
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            system_prompt: "You are a helpful AI assistant.".to_string(),
            model_provider: ModelProvider::OpenAi,
            model_name: "gpt-4o".to_string(),
            temperature: 0.7,
            is_active: true,
            tools: Vec::new(),
            custom_tools: Vec::new(),
            created_at: None,
        }
    }
}

/// Summary projection used to populate the chat page's agent selector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct AgentSummary {
    #[ts(type = "string")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Derives a slug from a display name: lowercase, each whitespace run
/// collapsed to a single hyphen.
///
/// Known quirk kept for compatibility with stored records: leading and
/// trailing whitespace also becomes a hyphen (`"  a   b "` -> `"-a-b-"`),
/// and punctuation passes through untouched.
pub fn slug_from_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            slug.extend(c.to_lowercase());
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slug_from_name("My Bot"), "my-bot");
        assert_eq!(slug_from_name("Pirate Bot"), "pirate-bot");
    }

    #[test]
    fn slug_collapses_whitespace_runs() {
        assert_eq!(slug_from_name("a   b"), "a-b");
        assert_eq!(slug_from_name("a\t \nb"), "a-b");
    }

    #[test]
    fn slug_does_not_trim() {
        // Documented quirk, not a guaranteed contract.
        assert_eq!(slug_from_name("  a   b "), "-a-b-");
    }

    #[test]
    fn slug_of_empty_name_is_empty() {
        assert_eq!(slug_from_name(""), "");
    }

    #[test]
    fn provider_models_are_non_empty() {
        for provider in ModelProvider::ALL {
            assert!(!provider.models().is_empty());
        }
    }

    #[test]
    fn tool_template_carries_default_auth_header() {
        let tool = CustomTool::template();
        assert_eq!(tool.auth_header_name.as_deref(), Some("x-n8n-secret"));
        assert_eq!(tool.auth_header_value.as_deref(), Some(""));
        assert!(tool.arguments.is_empty());
    }

    #[test]
    fn default_config_matches_new_agent_template() {
        let config = AgentConfig::default();
        assert!(config.id.is_none());
        assert_eq!(config.model_provider, ModelProvider::OpenAi);
        assert_eq!(config.model_name, "gpt-4o");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.is_active);
    }
}
