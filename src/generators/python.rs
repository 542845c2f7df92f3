//! Python source emitter: `crew.py`, `main.py`, the package `__init__.py`
//! and tool files.
//!
//! Optional agent, task and crew settings become keyword arguments only when
//! they differ from crewAI's defaults; everything else is read from the YAML
//! config at runtime.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use tera::Context;

use super::render;
use super::scaffold::CUSTOM_TOOL_PY;
use crate::agent::{AgentConfig, DEFAULT_MAX_ITER};
use crate::catalog::ToolCatalog;
use crate::crew::CrewConfig;
use crate::project::GeneratedFile;
use crate::task::TaskConfig;
use crate::utilities::errors::GenerationError;
use crate::utilities::string_utils::{class_name, display_title, normalize_key, py_quote};

/// Per-agent view handed to the `crew.py` template.
#[derive(Serialize)]
struct AgentMethod<'a> {
    key: String,
    role: &'a str,
    tools: &'a [String],
    options: Vec<String>,
}

/// Per-task view handed to the `crew.py` template.
#[derive(Serialize)]
struct TaskMethod {
    key: String,
    name: String,
    options: Vec<String>,
}

fn agent_options(agent: &AgentConfig) -> Vec<String> {
    let mut options = Vec::new();
    if agent.verbose == Some(true) {
        options.push("verbose=True".to_string());
    }
    if agent.allow_delegation == Some(true) {
        options.push("allow_delegation=True".to_string());
    }
    if let Some(max_iter) = agent.max_iter.filter(|&n| n != DEFAULT_MAX_ITER) {
        options.push(format!("max_iter={}", max_iter));
    }
    if agent.cache == Some(false) {
        options.push("cache=False".to_string());
    }
    options
}

fn task_options(task: &TaskConfig) -> Vec<String> {
    task.output_file
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(|f| vec![format!("output_file={}", py_quote(f))])
        .unwrap_or_default()
}

fn crew_options(crew: &CrewConfig) -> Vec<String> {
    let mut options = Vec::new();
    if crew.verbose == Some(true) {
        options.push("verbose=True".to_string());
    }
    if crew.memory == Some(true) {
        options.push("memory=True".to_string());
    }
    if crew.planning == Some(true) {
        options.push("planning=True".to_string());
    }
    if let Some(max_rpm) = crew.max_rpm.filter(|&n| n != 0) {
        options.push(format!("max_rpm={}", max_rpm));
    }
    if let Some(llm) = crew.manager_llm.as_deref().filter(|l| !l.is_empty()) {
        options.push(format!("manager_llm={}", py_quote(llm)));
    }
    options
}

/// Render `crew.py`.
///
/// `tools_by_agent` is keyed by agent role as typed. Every tool assigned to
/// any role is imported once, in sorted order; each agent instantiates only
/// its own tools.
pub fn generate_crew_py(
    project_name: &str,
    agents: &[AgentConfig],
    tasks: &[TaskConfig],
    crew: &CrewConfig,
    tools_by_agent: &BTreeMap<String, Vec<String>>,
) -> Result<String, GenerationError> {
    let tool_imports: BTreeSet<&str> = tools_by_agent
        .values()
        .flatten()
        .map(String::as_str)
        .collect();

    let mut agent_methods = Vec::with_capacity(agents.len());
    for (i, agent) in agents.iter().enumerate() {
        let role = agent
            .role
            .as_deref()
            .ok_or_else(|| GenerationError::missing_agent_field(i + 1, "role"))?;
        agent_methods.push(AgentMethod {
            key: normalize_key(role),
            role,
            tools: tools_by_agent.get(role).map(Vec::as_slice).unwrap_or(&[]),
            options: agent_options(agent),
        });
    }

    let task_methods: Vec<TaskMethod> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskMethod {
            key: task.key(i),
            name: task.display_name(i),
            options: task_options(task),
        })
        .collect();

    let mut context = Context::new();
    context.insert("project_name", project_name);
    context.insert("title", &display_title(project_name));
    context.insert("class_name", &class_name(project_name));
    context.insert("tool_imports", &tool_imports);
    context.insert("agents", &agent_methods);
    context.insert("tasks", &task_methods);
    context.insert("process", crew.process_name());
    context.insert("crew_options", &crew_options(crew));

    log::debug!(
        "emitting crew.py for '{}': {} agents, {} tasks, {} tool imports",
        project_name,
        agent_methods.len(),
        task_methods.len(),
        tool_imports.len()
    );
    render("crew.py", &context)
}

/// Python dict literal with one placeholder value per input variable.
fn inputs_literal(input_variables: &[String]) -> String {
    let mut code = String::from("{\n");
    for var in input_variables {
        code.push_str(&format!("        '{}': 'your_{}_here',\n", var, var));
    }
    code.push_str("    }");
    code
}

/// Render `main.py` with `run`, `train`, `replay` and `test` commands.
pub fn generate_main_py(
    project_name: &str,
    input_variables: &[String],
) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("project_name", project_name);
    context.insert("title", &display_title(project_name));
    context.insert("class_name", &class_name(project_name));
    context.insert("inputs", &inputs_literal(input_variables));
    render("main.py", &context)
}

/// Render the package `__init__.py`, which re-exports the crew class.
pub fn generate_init_py(project_name: &str) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("project_name", project_name);
    context.insert("title", &display_title(project_name));
    context.insert("class_name", &class_name(project_name));
    render("__init__.py", &context)
}

fn py_double_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render a `BaseTool` subclass skeleton named after `tool_name`.
pub fn generate_custom_tool(tool_name: &str, description: &str) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("tool_name", tool_name);
    context.insert("tool_name_literal", &py_double_quoted(tool_name));
    context.insert("description_literal", &py_double_quoted(description));
    context.insert("class_name", &class_name(tool_name));
    render("custom_tool.py", &context)
}

/// File name for a catalog tool's stub: `SerperDevTool` → `serperdev_tool.py`.
pub fn tool_stub_file_name(tool_name: &str) -> String {
    let stem = tool_name.to_lowercase().replace("tool", "");
    format!("{}_tool.py", stem.trim_end_matches('_'))
}

/// Documentation stubs for the selected catalog tools, followed by the
/// generic `custom_tool.py`.
///
/// Paths are bare file names; the caller places them. Unknown tools are
/// skipped, as are repeated selections.
pub fn generate_tool_stubs<S: AsRef<str>>(
    selected_tools: &[S],
    catalog: &ToolCatalog,
) -> Result<Vec<GeneratedFile>, GenerationError> {
    let mut stubs = Vec::new();
    let mut seen = HashSet::new();

    for name in selected_tools.iter().map(|s| s.as_ref()) {
        let Some(tool) = catalog.tool(name) else {
            log::debug!("no catalog entry for '{}', skipping stub", name);
            continue;
        };
        if !seen.insert(name) {
            continue;
        }

        let mut context = Context::new();
        context.insert("name", &tool.name);
        context.insert("category", catalog.category_of(name).unwrap_or("Unknown"));
        context.insert("description", &tool.description);
        context.insert(
            "requires_auth",
            &(tool.requires_auth && !tool.env_vars.is_empty()),
        );
        context.insert("env_vars", &tool.env_vars);
        context.insert("auth_note", &tool.auth_note);

        stubs.push(GeneratedFile::new(
            tool_stub_file_name(name),
            render("tool_stub.py", &context)?,
        ));
    }

    stubs.push(GeneratedFile::new("custom_tool.py", CUSTOM_TOOL_PY));
    Ok(stubs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;
    use pretty_assertions::assert_eq;

    fn scenario() -> (Vec<AgentConfig>, Vec<TaskConfig>) {
        let agents = vec![
            AgentConfig::new("Research Agent", "Research {topic}", "Expert researcher"),
            AgentConfig::new("Analysis Agent", "Analyse findings", "Expert analyst"),
        ];
        let tasks = vec![
            TaskConfig::new("research_task", "Research {topic}", "Notes", "Research Agent"),
            TaskConfig::new("analysis_task", "Analyse", "Report", "Analysis Agent")
                .with_context(["research_task"]),
        ];
        (agents, tasks)
    }

    #[test]
    fn test_crew_py_without_tools() {
        let (agents, tasks) = scenario();
        let code = generate_crew_py(
            "research_crew",
            &agents,
            &tasks,
            &CrewConfig::default(),
            &BTreeMap::new(),
        )
        .unwrap();

        let expected = r#""""
Research Crew Crew
"""

from crewai import Agent, Crew, Process, Task
from crewai.project import CrewBase, agent, crew, task


@CrewBase
class ResearchCrewCrew:
    """
    Research Crew crew for orchestrating AI agents.
    """

    agents_config = 'config/agents.yaml'
    tasks_config = 'config/tasks.yaml'

    @agent
    def research_agent(self) -> Agent:
        """Create Research Agent agent."""
        return Agent(
            config=self.agents_config['research_agent'],
        )

    @agent
    def analysis_agent(self) -> Agent:
        """Create Analysis Agent agent."""
        return Agent(
            config=self.agents_config['analysis_agent'],
        )

    @task
    def research_task(self) -> Task:
        """Create research_task."""
        return Task(
            config=self.tasks_config['research_task'],
        )

    @task
    def analysis_task(self) -> Task:
        """Create analysis_task."""
        return Task(
            config=self.tasks_config['analysis_task'],
        )

    @crew
    def crew(self) -> Crew:
        """Create the research_crew crew."""
        return Crew(
            agents=self.agents,
            tasks=self.tasks,
            process=Process.sequential,
        )
"#;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_crew_py_tools_and_options() {
        let (mut agents, mut tasks) = scenario();
        agents[0].verbose = Some(true);
        agents[0].max_iter = Some(DEFAULT_MAX_ITER);
        agents[1].allow_delegation = Some(true);
        agents[1].max_iter = Some(5);
        agents[1].cache = Some(false);
        tasks[1].output_file = Some("report.md".into());

        let mut tools = BTreeMap::new();
        tools.insert(
            "Research Agent".to_string(),
            vec!["SerperDevTool".to_string(), "FileReadTool".to_string()],
        );
        tools.insert("Analysis Agent".to_string(), vec!["FileReadTool".to_string()]);

        let crew = CrewConfig {
            verbose: Some(true),
            memory: Some(true),
            max_rpm: Some(30),
            manager_llm: Some("gpt-4".into()),
            ..CrewConfig::with_process(Process::Hierarchical)
        };

        let code = generate_crew_py("demo", &agents, &tasks, &crew, &tools).unwrap();

        assert!(code.contains(
            "from crewai.project import CrewBase, agent, crew, task\nfrom crewai_tools import (\n    FileReadTool,\n    SerperDevTool,\n)\n\n\n@CrewBase\nclass DemoCrew:"
        ));
        assert!(code.contains(
            "            config=self.agents_config['research_agent'],\n            tools=[\n                SerperDevTool(),\n                FileReadTool(),\n            ],\n            verbose=True,\n        )"
        ));
        assert!(code.contains(
            "            config=self.agents_config['analysis_agent'],\n            tools=[\n                FileReadTool(),\n            ],\n            allow_delegation=True,\n            max_iter=5,\n            cache=False,\n        )"
        ));
        assert!(code.contains(
            "            config=self.tasks_config['analysis_task'],\n            output_file='report.md',\n        )"
        ));
        assert!(code.contains(
            "            process=Process.hierarchical,\n            verbose=True,\n            memory=True,\n            max_rpm=30,\n            manager_llm='gpt-4',\n        )\n"
        ));
        assert!(!code.contains("max_iter=25"));
    }

    #[test]
    fn test_crew_py_unnamed_task() {
        let agents = vec![AgentConfig::new("Writer", "g", "b")];
        let tasks = vec![TaskConfig {
            description: Some("d".into()),
            expected_output: Some("o".into()),
            agent: Some("Writer".into()),
            ..Default::default()
        }];
        let code =
            generate_crew_py("demo", &agents, &tasks, &CrewConfig::default(), &BTreeMap::new())
                .unwrap();
        assert!(code.contains("    def task_1(self) -> Task:\n        \"\"\"Create Task 1.\"\"\""));
    }

    #[test]
    fn test_crew_py_is_deterministic() {
        let (agents, tasks) = scenario();
        let crew = CrewConfig::default();
        let tools = BTreeMap::new();
        let first = generate_crew_py("demo", &agents, &tasks, &crew, &tools).unwrap();
        let second = generate_crew_py("demo", &agents, &tasks, &crew, &tools).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_crew_py_missing_role() {
        let agents = vec![AgentConfig::default()];
        let err = generate_crew_py("demo", &agents, &[], &CrewConfig::default(), &BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Agent 1: required field 'role' is missing");
    }

    #[test]
    fn test_main_py_inputs() {
        let code = generate_main_py("research_crew", &["topic".to_string()]).unwrap();
        assert!(code.starts_with("#!/usr/bin/env python\n\"\"\"\nMain entry point for the Research Crew crew.\n\"\"\""));
        assert!(code.contains("from research_crew.crew import ResearchCrewCrew\n"));
        assert!(code.contains("    inputs = {\n        'topic': 'your_topic_here',\n    }\n    ResearchCrewCrew().crew().kickoff(inputs=inputs)"));
        assert_eq!(code.matches("'topic': 'your_topic_here'").count(), 3);
        assert!(code.contains("print(f\"Unknown command: {command}\")"));
        assert!(code.contains("sys.exit(1)\n    else:\n        run()\n"));
    }

    #[test]
    fn test_main_py_without_inputs() {
        let code = generate_main_py("demo", &[]).unwrap();
        assert!(code.contains("    inputs = {\n    }\n"));
    }

    #[test]
    fn test_init_py() {
        let code = generate_init_py("research_crew").unwrap();
        assert_eq!(
            code,
            "\"\"\"\nResearch Crew Package\n\"\"\"\n\nfrom research_crew.crew import ResearchCrewCrew\n\n__all__ = ['ResearchCrewCrew']\n"
        );
    }

    #[test]
    fn test_custom_tool() {
        let code = generate_custom_tool("word_counter", "Counts \"words\"").unwrap();
        assert!(code.contains("class WordCounterInput(BaseModel):"));
        assert!(code.contains("class WordCounter(BaseTool):"));
        assert!(code.contains("    name: str = \"word_counter\"\n"));
        assert!(code.contains("    description: str = \"Counts \\\"words\\\"\"\n"));
    }

    #[test]
    fn test_tool_stub_file_name() {
        assert_eq!(tool_stub_file_name("SerperDevTool"), "serperdev_tool.py");
        assert_eq!(tool_stub_file_name("FileReadTool"), "fileread_tool.py");
        assert_eq!(tool_stub_file_name("Custom_Tool"), "custom_tool.py");
    }

    #[test]
    fn test_tool_stubs() {
        let catalog = ToolCatalog::builtin().unwrap();
        let stubs = generate_tool_stubs(
            &["SerperDevTool", "NoSuchTool", "FileReadTool", "SerperDevTool"],
            &catalog,
        )
        .unwrap();
        let names: Vec<&str> = stubs.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(names, ["serperdev_tool.py", "fileread_tool.py", "custom_tool.py"]);

        let serper = &stubs[0].content;
        assert!(serper.contains("## Authentication Required"));
        assert!(serper.contains("- SERPER_API_KEY\n"));
        assert!(serper.contains("# SERPER_API_KEY = \"your_serper_api_key_here\""));
        assert!(serper.contains("tool = SerperDevTool()"));

        let file_read = &stubs[1].content;
        assert!(!file_read.contains("Authentication Required"));
        assert!(file_read.contains("# Initialize the tool\n\ntool = FileReadTool()"));
    }

    #[test]
    fn test_tool_stubs_without_selection() {
        let catalog = ToolCatalog::builtin().unwrap();
        let stubs = generate_tool_stubs::<&str>(&[], &catalog).unwrap();
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].path, "custom_tool.py");
        assert_eq!(stubs[0].content, CUSTOM_TOOL_PY);
    }
}
