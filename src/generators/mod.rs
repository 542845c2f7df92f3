//! Text emitters for the generated project.
//!
//! - [`yaml`]: `config/agents.yaml` and `config/tasks.yaml`
//! - [`python`]: `crew.py`, `main.py`, the package `__init__.py` and tool files
//! - [`scaffold`]: README, manifest, ignore file, `.env` and static placeholders
//!
//! Source and boilerplate files are rendered from Tera templates compiled
//! into the binary and registered once on first use.

pub mod python;
pub mod scaffold;
pub mod yaml;

use once_cell::sync::OnceCell;
use tera::{Context, Tera};

use crate::utilities::errors::GenerationError;

pub use python::{
    generate_crew_py, generate_custom_tool, generate_init_py, generate_main_py,
    generate_tool_stubs,
};
pub use scaffold::{
    generate_env_file, generate_gitignore, generate_readme, generate_pyproject_toml,
    CUSTOM_TOOL_PY, KNOWLEDGE_README, TOOLS_INIT_PY,
};
pub use yaml::{generate_agents_yaml, generate_tasks_yaml};

const TEMPLATE_SOURCES: [(&str, &str); 7] = [
    ("crew.py", include_str!("../templates/crew.py.tera")),
    ("main.py", include_str!("../templates/main.py.tera")),
    ("__init__.py", include_str!("../templates/init.py.tera")),
    ("custom_tool.py", include_str!("../templates/custom_tool.py.tera")),
    ("tool_stub.py", include_str!("../templates/tool_stub.py.tera")),
    ("README.md", include_str!("../templates/README.md.tera")),
    ("pyproject.toml", include_str!("../templates/pyproject.toml.tera")),
];

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

/// The shared template set, parsed on first call.
fn templates() -> Result<&'static Tera, GenerationError> {
    TEMPLATES.get_or_try_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATE_SOURCES)?;
        // Outputs are Python, TOML and Markdown.
        tera.autoescape_on(vec![]);
        log::debug!("registered {} generator templates", TEMPLATE_SOURCES.len());
        Ok(tera)
    })
}

/// Render one registered template. Output always ends with a newline.
pub(crate) fn render(name: &str, context: &Context) -> Result<String, GenerationError> {
    let mut out = templates()?.render(name, context)?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_register() {
        let tera = templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        for (name, _) in TEMPLATE_SOURCES {
            assert!(names.contains(&name), "missing template {}", name);
        }
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let err = render("nope.py", &Context::new()).unwrap_err();
        assert!(matches!(err, GenerationError::Template(_)));
    }
}
