//! Project assembly.
//!
//! A [`ProjectRequest`] carries everything the form collects. The assembler
//! runs the emitters over it and returns a [`GeneratedFileSet`]: relative
//! path → file content, in a fixed order.
//!
//! Two modes exist. `core_files` produces only the four files that define
//! the crew (for dropping into an existing project); `complete_project`
//! adds the surrounding package, manifest and boilerplate.

pub mod archive;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::catalog::ToolCatalog;
use crate::crew::CrewConfig;
use crate::generators::{self, scaffold};
use crate::task::TaskConfig;
use crate::utilities::errors::GenerationError;
use crate::utilities::string_utils::{capitalize, scan_placeholders, truncate_chars};
use crate::validation::check_required_env_vars;

pub use archive::{archive_file_name, create_zip_file, save_project_to_disk};

/// Value written to `.env` for detected variables the user left unset.
pub const ENV_PLACEHOLDER: &str = "your_api_key_here";

/// Default minimum Python version for the generated manifest.
pub const DEFAULT_PYTHON_VERSION: &str = "3.10";

// ---------------------------------------------------------------------------
// Generation mode
// ---------------------------------------------------------------------------

/// Which files a generation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Only `crew.py`, `main.py` and the two YAML configs.
    CoreFiles,
    /// The full project tree.
    #[default]
    CompleteProject,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::CoreFiles => "core_files",
            GenerationMode::CompleteProject => "complete_project",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core_files" | "core" => Ok(GenerationMode::CoreFiles),
            "complete_project" | "complete" => Ok(GenerationMode::CompleteProject),
            other => Err(format!(
                "unknown generation mode '{}' (expected core_files or complete_project)",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Everything needed to validate and generate one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRequest {
    pub project_name: String,
    pub description: String,
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<TaskConfig>,
    pub crew: CrewConfig,
    /// Tools per agent, keyed by role as typed.
    pub tools_by_agent: BTreeMap<String, Vec<String>>,
    /// Tools chosen for the project as a whole.
    pub selected_tools: Vec<String>,
    /// Values for `.env`, keyed by variable name.
    pub env_vars: BTreeMap<String, String>,
    pub python_version: String,
    pub generation_mode: GenerationMode,
    /// Add LangSmith tracing variables, dependency and docs.
    pub enable_tracing: bool,
    pub tracing_project: Option<String>,
    /// Write documentation stubs for the selected tools into `tools/`.
    pub include_tool_stubs: bool,
    /// Fill unset optional fields with crewAI defaults before use.
    pub fill_defaults: bool,
}

impl Default for ProjectRequest {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            description: String::new(),
            agents: Vec::new(),
            tasks: Vec::new(),
            crew: CrewConfig::default(),
            tools_by_agent: BTreeMap::new(),
            selected_tools: Vec::new(),
            env_vars: BTreeMap::new(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            generation_mode: GenerationMode::default(),
            enable_tracing: false,
            tracing_project: None,
            include_tool_stubs: false,
            fill_defaults: false,
        }
    }
}

impl ProjectRequest {
    /// Parse a request document. JSON is accepted too, being valid YAML.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply crewAI defaults to every record when `fill_defaults` is set.
    pub fn prepared(mut self) -> Self {
        if self.fill_defaults {
            self.agents.iter_mut().for_each(AgentConfig::fill_defaults);
            self.tasks.iter_mut().for_each(TaskConfig::fill_defaults);
            self.crew.fill_defaults();
        }
        self
    }

    /// Project-wide and per-agent tools, each once, in first-seen order.
    pub fn all_tools(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.selected_tools
            .iter()
            .chain(self.tools_by_agent.values().flatten())
            .map(String::as_str)
            .filter(|tool| seen.insert(*tool))
            .collect()
    }

    /// LangSmith project name, when tracing is enabled. Falls back to a
    /// `LANGCHAIN_PROJECT` entry in `env_vars`, then to the default.
    pub fn tracing_project(&self) -> Option<&str> {
        if !self.enable_tracing {
            return None;
        }
        Some(
            self.tracing_project
                .as_deref()
                .or_else(|| self.env_vars.get("LANGCHAIN_PROJECT").map(String::as_str))
                .filter(|p| !p.is_empty())
                .unwrap_or(scaffold::DEFAULT_TRACING_PROJECT),
        )
    }

    /// Variables the generated project needs, including tracing ones.
    pub fn required_env_vars(&self, catalog: &ToolCatalog) -> Vec<String> {
        check_required_env_vars(&self.agents, self.all_tools(), self.enable_tracing, catalog)
    }

    /// `.env` values: the user's entries plus a placeholder for every
    /// detected variable they did not set. Tracing variables are left to the
    /// LangSmith block.
    pub fn env_file_vars(&self, catalog: &ToolCatalog) -> BTreeMap<String, String> {
        let mut vars = self.env_vars.clone();
        for name in check_required_env_vars(&self.agents, self.all_tools(), false, catalog) {
            vars.entry(name).or_insert_with(|| ENV_PLACEHOLDER.to_string());
        }
        vars
    }
}

// ---------------------------------------------------------------------------
// Generated files
// ---------------------------------------------------------------------------

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the project root, `/`-separated.
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Ordered mapping from relative path to content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedFileSet {
    files: Vec<GeneratedFile>,
}

impl GeneratedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing the content of an existing path in place.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.content = content,
            None => self.files.push(GeneratedFile { path, content }),
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a GeneratedFileSet {
    type Item = &'a GeneratedFile;
    type IntoIter = std::slice::Iter<'a, GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl FromIterator<(String, String)> for GeneratedFileSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = GeneratedFileSet::new();
        for (path, content) in iter {
            set.insert(path, content);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Collect `{name}` placeholders from agent role/goal/backstory and task
/// description/expected_output, unique and sorted.
pub fn extract_input_variables(agents: &[AgentConfig], tasks: &[TaskConfig]) -> Vec<String> {
    let agent_texts = agents
        .iter()
        .flat_map(|a| [&a.role, &a.goal, &a.backstory]);
    let task_texts = tasks
        .iter()
        .flat_map(|t| [&t.description, &t.expected_output]);

    let variables: BTreeSet<String> = agent_texts
        .chain(task_texts)
        .filter_map(|text| text.as_deref())
        .flat_map(scan_placeholders)
        .collect();
    variables.into_iter().collect()
}

/// Generate the project's files.
///
/// Expects a validated request; a missing required field surfaces as
/// [`GenerationError::MissingField`].
pub fn generate_project_structure(
    request: &ProjectRequest,
    catalog: &ToolCatalog,
) -> Result<GeneratedFileSet, GenerationError> {
    let project = request.project_name.as_str();
    let src_dir = format!("src/{}", project);
    let input_vars = extract_input_variables(&request.agents, &request.tasks);

    let mut files = GeneratedFileSet::new();

    files.insert(
        format!("{}/crew.py", src_dir),
        generators::generate_crew_py(
            project,
            &request.agents,
            &request.tasks,
            &request.crew,
            &request.tools_by_agent,
        )?,
    );
    files.insert(
        format!("{}/main.py", src_dir),
        generators::generate_main_py(project, &input_vars)?,
    );
    files.insert(
        format!("{}/config/agents.yaml", src_dir),
        generators::generate_agents_yaml(&request.agents)?,
    );
    files.insert(
        format!("{}/config/tasks.yaml", src_dir),
        generators::generate_tasks_yaml(&request.tasks)?,
    );

    if request.generation_mode == GenerationMode::CompleteProject {
        let tracing = request.enable_tracing;

        files.insert(".gitignore", generators::generate_gitignore());
        files.insert(
            "README.md",
            generators::generate_readme(project, &request.description, tracing)?,
        );
        files.insert(
            "pyproject.toml",
            generators::generate_pyproject_toml(project, &request.python_version, tracing)?,
        );
        files.insert(
            ".env",
            generators::generate_env_file(
                &request.env_file_vars(catalog),
                request.tracing_project(),
            ),
        );

        files.insert(
            format!("{}/__init__.py", src_dir),
            generators::generate_init_py(project)?,
        );

        files.insert(format!("{}/tools/__init__.py", src_dir), scaffold::TOOLS_INIT_PY);
        if request.include_tool_stubs {
            for stub in generators::generate_tool_stubs(&request.all_tools(), catalog)? {
                files.insert(format!("{}/tools/{}", src_dir, stub.path), stub.content);
            }
        } else {
            files.insert(
                format!("{}/tools/custom_tool.py", src_dir),
                scaffold::CUSTOM_TOOL_PY,
            );
        }

        files.insert(format!("{}/knowledge/.gitkeep", src_dir), "");
        files.insert(
            format!("{}/knowledge/README.md", src_dir),
            scaffold::KNOWLEDGE_README,
        );
    }

    log::info!(
        "generated {} files for '{}' ({})",
        files.len(),
        project,
        request.generation_mode
    );
    Ok(files)
}

fn enabled(flag: Option<bool>) -> &'static str {
    if flag == Some(true) {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// Markdown overview of a configuration: counts, agents, tasks and crew flags.
///
/// Backstories and descriptions are cut to 100 characters.
pub fn generate_project_summary(
    project_name: &str,
    agents: &[AgentConfig],
    tasks: &[TaskConfig],
    crew: &CrewConfig,
) -> String {
    let process = capitalize(crew.process_name());
    let mut summary = format!(
        "# Project Summary: {}\n\n## Configuration Overview\n\n**Agents:** {}\n**Tasks:** {}\n**Process:** {}\n\n## Agents\n",
        project_name,
        agents.len(),
        tasks.len(),
        process
    );

    for (i, agent) in agents.iter().enumerate() {
        summary.push_str(&format!(
            "\n### {}. {}\n",
            i + 1,
            agent.role.as_deref().unwrap_or_default()
        ));
        summary.push_str(&format!(
            "- **Goal:** {}\n",
            agent.goal.as_deref().unwrap_or_default()
        ));
        summary.push_str(&format!(
            "- **Backstory:** {}...\n",
            truncate_chars(agent.backstory.as_deref().unwrap_or_default(), 100)
        ));
    }

    summary.push_str("\n## Tasks\n");

    for (i, task) in tasks.iter().enumerate() {
        summary.push_str(&format!("\n### {}. {}\n", i + 1, task.display_name(i)));
        summary.push_str(&format!(
            "- **Agent:** {}\n",
            task.agent.as_deref().unwrap_or_default()
        ));
        summary.push_str(&format!(
            "- **Description:** {}...\n",
            truncate_chars(task.description.as_deref().unwrap_or_default(), 100)
        ));
        if let Some(output) = task.output_file.as_deref().filter(|f| !f.is_empty()) {
            summary.push_str(&format!("- **Output File:** {}\n", output));
        }
    }

    summary.push_str("\n## Crew Configuration\n");
    summary.push_str(&format!("- **Process Type:** {}\n", process));
    summary.push_str(&format!("- **Memory:** {}\n", enabled(crew.memory)));
    summary.push_str(&format!("- **Planning:** {}\n", enabled(crew.planning)));
    summary.push_str(&format!("- **Verbose:** {}\n", enabled(crew.verbose)));

    summary
}
