//! LLM provider tags for agent configurations.
//!
//! An agent may carry an explicit [`LlmProvider`] chosen when it was
//! configured. When it does not, the provider is inferred from the free-text
//! model identifier using the ordered pattern table of the tool catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ProviderRule;

/// LLM provider families the generated project may need credentials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[serde(alias = "OpenAI")]
    Openai,
    #[serde(alias = "Anthropic")]
    Anthropic,
    #[serde(alias = "Google")]
    Google,
    #[serde(alias = "Azure", alias = "Azure OpenAI")]
    Azure,
    #[serde(alias = "Ollama", alias = "Ollama (Local)")]
    Ollama,
    #[serde(alias = "Other")]
    Other,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::Openai => "OpenAI",
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::Google => "Google",
            LlmProvider::Azure => "Azure OpenAI",
            LlmProvider::Ollama => "Ollama",
            LlmProvider::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Infer a provider from a model identifier.
///
/// Rules are tried in order and the first rule with a matching substring
/// wins, so `"gpt-on-azure"` resolves to OpenAI when the OpenAI rule comes
/// first. Matching is case-sensitive.
pub fn infer_provider(llm: &str, rules: &[ProviderRule]) -> Option<LlmProvider> {
    if llm.is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| llm.contains(p.as_str())))
        .map(|rule| rule.provider)
}

/// Resolve the provider for an agent: the explicit tag first, then inference.
pub fn resolve_provider(
    explicit: Option<LlmProvider>,
    llm: Option<&str>,
    rules: &[ProviderRule],
) -> Option<LlmProvider> {
    explicit.or_else(|| llm.and_then(|model| infer_provider(model, rules)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;

    #[test]
    fn test_infer_provider_first_match_wins() {
        let catalog = ToolCatalog::builtin().unwrap();
        let rules = catalog.llm_providers();
        assert_eq!(infer_provider("gpt-4", rules), Some(LlmProvider::Openai));
        assert_eq!(
            infer_provider("claude-3-haiku-20240307", rules),
            Some(LlmProvider::Anthropic)
        );
        assert_eq!(infer_provider("gemini-pro", rules), Some(LlmProvider::Google));
        // "azure/gpt-4" contains "gpt", so the OpenAI rule matches first.
        assert_eq!(infer_provider("azure/gpt-4", rules), Some(LlmProvider::Openai));
        assert_eq!(
            infer_provider("azure/my-deployment", rules),
            Some(LlmProvider::Azure)
        );
    }

    #[test]
    fn test_infer_provider_is_case_sensitive() {
        let catalog = ToolCatalog::builtin().unwrap();
        assert_eq!(infer_provider("GPT-4", catalog.llm_providers()), None);
        assert_eq!(infer_provider("llama2", catalog.llm_providers()), None);
        assert_eq!(infer_provider("", catalog.llm_providers()), None);
    }

    #[test]
    fn test_explicit_tag_takes_precedence() {
        let catalog = ToolCatalog::builtin().unwrap();
        let provider = resolve_provider(
            Some(LlmProvider::Azure),
            Some("gpt-4"),
            catalog.llm_providers(),
        );
        assert_eq!(provider, Some(LlmProvider::Azure));
    }

    #[test]
    fn test_deserialize_display_aliases() {
        let provider: LlmProvider = serde_json::from_str("\"OpenAI\"").unwrap();
        assert_eq!(provider, LlmProvider::Openai);
        let provider: LlmProvider = serde_json::from_str("\"Azure OpenAI\"").unwrap();
        assert_eq!(provider, LlmProvider::Azure);
        let provider: LlmProvider = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(provider, LlmProvider::Ollama);
    }
}
