//! Catalog entry types.

use serde::{Deserialize, Serialize};

use crate::llm::LlmProvider;

/// One tool the generated project may import from `crewai_tools`.
///
/// Example YAML:
/// ```yaml
/// name: SerperDevTool
/// description: Web search using Serper
/// requires_auth: true
/// env_vars: [SERPER_API_KEY]
/// auth_note: Get an API key at https://serper.dev
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    /// Class name exported by `crewai_tools`.
    pub name: String,
    /// One-line description shown in listings and stubs.
    pub description: String,
    /// Whether the tool needs credentials.
    #[serde(default)]
    pub requires_auth: bool,
    /// Environment variables required when the tool is used, in order.
    #[serde(default)]
    pub env_vars: Vec<String>,
    /// Extra setup instructions for credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_note: Option<String>,
}

/// A named group of tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCategory {
    pub name: String,
    #[serde(default)]
    pub tools: Vec<ToolEntry>,
}

/// Maps an LLM provider to the model-name substrings that identify it and
/// the credentials it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRule {
    pub provider: LlmProvider,
    /// Substrings of the `llm` identifier that select this provider.
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub env_vars: Vec<String>,
    /// Suggested model identifiers.
    #[serde(default)]
    pub models: Vec<String>,
}

/// crewAI releases the generated output has been checked against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrewaiVersions {
    #[serde(default)]
    pub tested_versions: Vec<String>,
    #[serde(default)]
    pub latest_tested: String,
}
