//! Environment variable requirements of a generated project.

use std::collections::BTreeSet;

use crate::agent::AgentConfig;
use crate::catalog::ToolCatalog;
use crate::llm::resolve_provider;

/// Compute the variable names the generated project needs, sorted and
/// deduplicated.
///
/// Each agent contributes its provider's credentials (explicit tag, else
/// inferred from `llm`), each known tool contributes its catalog variables,
/// and tracing adds the catalog's tracing variables. Unknown tools and
/// unrecognised models contribute nothing.
pub fn check_required_env_vars<I, S>(
    agents: &[AgentConfig],
    selected_tools: I,
    enable_tracing: bool,
    catalog: &ToolCatalog,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut required: BTreeSet<String> = BTreeSet::new();

    for agent in agents {
        let provider = resolve_provider(
            agent.llm_provider,
            agent.llm.as_deref(),
            catalog.llm_providers(),
        );
        if let Some(provider) = provider {
            required.extend(catalog.provider_env_vars(provider).iter().cloned());
        }
    }

    for tool in selected_tools {
        required.extend(catalog.tool_env_vars(tool.as_ref()).iter().cloned());
    }

    if enable_tracing {
        required.extend(catalog.tracing_env_vars().iter().cloned());
    }

    required.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;

    fn catalog() -> ToolCatalog {
        ToolCatalog::builtin().unwrap()
    }

    #[test]
    fn test_openai_and_serper() {
        let agents = vec![AgentConfig::new("Researcher", "g", "b").with_llm("gpt-4")];
        let vars = check_required_env_vars(&agents, ["SerperDevTool"], false, &catalog());
        assert_eq!(vars, ["OPENAI_API_KEY", "SERPER_API_KEY"]);
    }

    #[test]
    fn test_only_first_provider_pattern_applies() {
        let agents = vec![AgentConfig::new("A", "g", "b").with_llm("azure-gpt-4")];
        let vars = check_required_env_vars(&agents, Vec::<String>::new(), false, &catalog());
        assert_eq!(vars, ["OPENAI_API_KEY"]);
    }

    #[test]
    fn test_azure_adds_two_variables() {
        let agents = vec![AgentConfig::new("A", "g", "b").with_llm("azure/my-deployment")];
        let vars = check_required_env_vars(&agents, Vec::<String>::new(), false, &catalog());
        assert_eq!(vars, ["AZURE_OPENAI_API_KEY", "AZURE_OPENAI_ENDPOINT"]);
    }

    #[test]
    fn test_explicit_provider_overrides_model_name() {
        let mut agent = AgentConfig::new("A", "g", "b").with_llm("my-finetune");
        agent.llm_provider = Some(LlmProvider::Anthropic);
        let vars = check_required_env_vars(&[agent], Vec::<String>::new(), false, &catalog());
        assert_eq!(vars, ["ANTHROPIC_API_KEY"]);
    }

    #[test]
    fn test_dedup_sort_and_tracing() {
        let agents = vec![
            AgentConfig::new("A", "g", "b").with_llm("gpt-4"),
            AgentConfig::new("B", "g", "b").with_llm("gpt-3.5-turbo"),
            AgentConfig::new("C", "g", "b").with_llm("llama2"),
            AgentConfig::new("D", "g", "b"),
        ];
        let vars = check_required_env_vars(
            &agents,
            ["TavilySearchTool", "FileReadTool", "NoSuchTool", "TavilySearchTool"],
            true,
            &catalog(),
        );
        assert_eq!(
            vars,
            [
                "LANGCHAIN_API_KEY",
                "LANGCHAIN_PROJECT",
                "OPENAI_API_KEY",
                "TAVILY_API_KEY"
            ]
        );
    }

    #[test]
    fn test_nothing_required() {
        let vars = check_required_env_vars(&[], Vec::<String>::new(), false, &catalog());
        assert!(vars.is_empty());
    }
}
