//! Boilerplate for complete projects: README, `pyproject.toml`, `.gitignore`,
//! `.env`, and the static files of the `tools/` and `knowledge/` directories.

use std::collections::BTreeMap;

use tera::Context;

use super::render;
use crate::utilities::errors::GenerationError;
use crate::utilities::string_utils::capitalize;

/// `.gitignore` for a Python crewAI project.
pub const GITIGNORE: &str = include_str!("../templates/static/gitignore");

/// Generic `tools/custom_tool.py` example.
pub const CUSTOM_TOOL_PY: &str = include_str!("../templates/static/custom_tool.py");

/// `tools/__init__.py`.
pub const TOOLS_INIT_PY: &str = "\"\"\"\nCustom tools for the crew.\n\"\"\"\n";

/// `knowledge/README.md`.
pub const KNOWLEDGE_README: &str = include_str!("../templates/static/knowledge_README.md");

/// LangSmith project name used when none is given.
pub const DEFAULT_TRACING_PROJECT: &str = "my-crew-project";

/// Variables owned by the LangSmith block of `.env`.
const LANGSMITH_VARS: [&str; 4] = [
    "LANGCHAIN_API_KEY",
    "LANGCHAIN_PROJECT",
    "LANGCHAIN_ENDPOINT",
    "LANGCHAIN_TRACING_V2",
];

/// Render `README.md`. `tracing` adds the LangSmith setup section.
pub fn generate_readme(
    project_name: &str,
    description: &str,
    tracing: bool,
) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("project_name", project_name);
    context.insert("description", description);
    context.insert("tracing", &tracing);
    context.insert("version", crate::VERSION);
    render("README.md", &context)
}

/// Render the poetry `pyproject.toml`. `tracing` adds the `langsmith` dependency.
pub fn generate_pyproject_toml(
    project_name: &str,
    python_version: &str,
    tracing: bool,
) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("project_name", project_name);
    context.insert("python_version", python_version);
    context.insert("tracing", &tracing);
    render("pyproject.toml", &context)
}

pub fn generate_gitignore() -> &'static str {
    GITIGNORE
}

/// Render `.env`.
///
/// Variables are grouped by the prefix before their first `_`, one
/// `# <Prefix> Configuration` block per prefix in order of first appearance.
/// With `tracing_project` set, a LangSmith block follows and the `LANGCHAIN_*`
/// variables it writes are kept out of the groups, so each appears once. A
/// user-supplied `LANGCHAIN_API_KEY` or `LANGCHAIN_ENDPOINT` replaces the
/// block's default.
pub fn generate_env_file(
    env_vars: &BTreeMap<String, String>,
    tracing_project: Option<&str>,
) -> String {
    let mut lines: Vec<String> = vec![
        "# Environment Variables for CrewAI Project".to_string(),
        "# Replace the placeholder values with your actual API keys".to_string(),
        String::new(),
    ];

    let mut groups: Vec<(&str, Vec<(&str, &str)>)> = Vec::new();
    let grouped = env_vars.iter().filter(|(name, _)| {
        tracing_project.is_none() || !LANGSMITH_VARS.contains(&name.as_str())
    });
    for (name, value) in grouped {
        let prefix = name.split('_').next().unwrap_or_default();
        match groups.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, vars)) => vars.push((name.as_str(), value.as_str())),
            None => groups.push((prefix, vec![(name.as_str(), value.as_str())])),
        }
    }

    for (prefix, vars) in groups {
        lines.push(format!("# {} Configuration", capitalize(prefix)));
        lines.extend(vars.into_iter().map(|(name, value)| format!("{}={}", name, value)));
        lines.push(String::new());
    }

    if let Some(project) = tracing_project {
        let user_value = |name: &str, default: &'static str| {
            env_vars
                .get(name)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        lines.extend([
            "# LangSmith Configuration (Observability)".to_string(),
            "# Get your free API key at: https://smith.langchain.com".to_string(),
            format!(
                "LANGCHAIN_API_KEY={}",
                user_value("LANGCHAIN_API_KEY", "your_langsmith_api_key_here")
            ),
            format!("LANGCHAIN_PROJECT={}", project),
            format!(
                "LANGCHAIN_ENDPOINT={}",
                user_value("LANGCHAIN_ENDPOINT", "https://api.smith.langchain.com")
            ),
            "LANGCHAIN_TRACING_V2=true".to_string(),
            String::new(),
        ]);
    }

    lines.join("\n")
}
