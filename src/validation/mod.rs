//! Configuration validation.
//!
//! Validators never fail: every problem becomes a message in a
//! [`ValidationReport`], grouped by category, and the caller decides whether
//! to go on and generate. Messages for agents and tasks carry the 1-based
//! position of the offending record (`"Agent 2: Agent goal is required"`).

pub mod env;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentConfig, CodeExecutionMode};
use crate::catalog::ToolCatalog;
use crate::crew::CrewConfig;
use crate::process::Process;
use crate::project::ProjectRequest;
use crate::task::TaskConfig;
use crate::utilities::string_utils::normalize_key;

pub use env::check_required_env_vars;

/// Maximum project name length, in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 100;

static PROJECT_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap());

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Group a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Project,
    Agents,
    Tasks,
    Crew,
    /// Duplicate keys and unresolved context references.
    Keys,
    /// Tool names missing from the catalog.
    Tools,
}

impl ErrorCategory {
    /// Categories every complete-configuration report carries, even when empty.
    pub const BASE: [ErrorCategory; 5] = [
        ErrorCategory::Project,
        ErrorCategory::Agents,
        ErrorCategory::Tasks,
        ErrorCategory::Crew,
        ErrorCategory::Keys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Project => "project",
            ErrorCategory::Agents => "agents",
            ErrorCategory::Tasks => "tasks",
            ErrorCategory::Crew => "crew",
            ErrorCategory::Keys => "keys",
            ErrorCategory::Tools => "tools",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation messages grouped by category.
///
/// Valid iff every category's list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<ErrorCategory, Vec<String>>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    /// An empty, valid report holding the base categories.
    pub fn new() -> Self {
        let errors = ErrorCategory::BASE
            .iter()
            .map(|&category| (category, Vec::new()))
            .collect();
        Self {
            is_valid: true,
            errors,
        }
    }

    /// Record one message.
    pub fn push(&mut self, category: ErrorCategory, message: impl Into<String>) {
        self.errors.entry(category).or_default().push(message.into());
        self.is_valid = false;
    }

    /// Record several messages, keeping the category present even when none are given.
    pub fn extend<I>(&mut self, category: ErrorCategory, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        let list = self.errors.entry(category).or_default();
        list.extend(messages);
        if !list.is_empty() {
            self.is_valid = false;
        }
    }

    /// Messages for one category; empty when the category is absent.
    pub fn category(&self, category: ErrorCategory) -> &[String] {
        self.errors
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of messages.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// `(category, message)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, &str)> {
        self.errors
            .iter()
            .flat_map(|(&category, list)| list.iter().map(move |m| (category, m.as_str())))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return writeln!(f, "configuration is valid");
        }
        for (category, list) in &self.errors {
            if list.is_empty() {
                continue;
            }
            writeln!(f, "{}:", category)?;
            for message in list {
                writeln!(f, "  - {}", message)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entity validators
// ---------------------------------------------------------------------------

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Check a project name. Only the first failing rule is reported.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Project name is required");
    }
    // Separators may appear anywhere, but something else has to remain.
    let stripped: String = name.chars().filter(|c| *c != '_' && *c != '-').collect();
    if stripped.is_empty() || !PROJECT_NAME_CHARS.is_match(name) {
        return Err("Project name can only contain letters, numbers, hyphens, and underscores");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err("Project name cannot start with a number");
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err("Project name must be 100 characters or less");
    }
    Ok(())
}

/// Check one agent's required fields and value ranges.
pub fn validate_agent_config(agent: &AgentConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&agent.role) {
        errors.push("Agent role is required".to_string());
    }
    if is_blank(&agent.goal) {
        errors.push("Agent goal is required".to_string());
    }
    if is_blank(&agent.backstory) {
        errors.push("Agent backstory is required".to_string());
    }

    if agent.max_iter.is_some_and(|v| v < 1) {
        errors.push("max_iter must be at least 1".to_string());
    }
    if agent.max_rpm.is_some_and(|v| v < 1) {
        errors.push("max_rpm must be at least 1".to_string());
    }
    if agent.max_retry_limit.is_some_and(|v| v < 0) {
        errors.push("max_retry_limit must be non-negative".to_string());
    }
    if agent.guardrail_max_retries.is_some_and(|v| v < 0) {
        errors.push("guardrail_max_retries must be non-negative".to_string());
    }

    match agent.code_execution_mode.as_deref().filter(|m| !m.is_empty()) {
        Some(mode) if CodeExecutionMode::parse(mode).is_none() => {
            errors.push("code_execution_mode must be 'safe' or 'unsafe'".to_string());
        }
        None if agent.allow_code_execution == Some(true) => {
            errors.push(
                "code_execution_mode is required when allow_code_execution is enabled".to_string(),
            );
        }
        _ => {}
    }

    errors
}

/// Check one task against the roles of the agents configured so far.
pub fn validate_task_config(task: &TaskConfig, available_agents: &[&str]) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&task.description) {
        errors.push("Task description is required".to_string());
    }
    if is_blank(&task.expected_output) {
        errors.push("Task expected_output is required".to_string());
    }
    match task.agent.as_deref().filter(|a| !a.is_empty()) {
        None => errors.push("Task must be assigned to an agent".to_string()),
        Some(agent) if !available_agents.contains(&agent) => {
            errors.push(format!("Task assigned to unknown agent: {}", agent));
        }
        Some(_) => {}
    }

    if let Some(context) = &task.context {
        for entry in context {
            if entry.as_name().is_none() {
                errors.push("Context task references must be task names (strings)".to_string());
            }
        }
    }

    if task.guardrail_max_retries.is_some_and(|v| v < 0) {
        errors.push("guardrail_max_retries must be non-negative".to_string());
    }

    errors
}

/// Check crew-level settings.
pub fn validate_crew_config(crew: &CrewConfig, has_agents: bool, has_tasks: bool) -> Vec<String> {
    let mut errors = Vec::new();

    if !has_agents {
        errors.push("Crew must have at least one agent".to_string());
    }
    if !has_tasks {
        errors.push("Crew must have at least one task".to_string());
    }

    match crew.process() {
        None => errors.push("Process must be 'sequential' or 'hierarchical'".to_string()),
        Some(Process::Hierarchical) => {
            if is_blank(&crew.manager_llm) && is_blank(&crew.manager_agent) {
                errors.push(
                    "Hierarchical process requires either manager_llm or manager_agent"
                        .to_string(),
                );
            }
        }
        Some(Process::Sequential) => {}
    }

    if crew.max_rpm.is_some_and(|v| v < 1) {
        errors.push("max_rpm must be at least 1".to_string());
    }

    errors
}

/// Check that agent keys and task keys are unique and that every context
/// entry names another task.
pub fn validate_keys(agents: &[AgentConfig], tasks: &[TaskConfig]) -> Vec<String> {
    let mut errors = Vec::new();

    let mut agent_keys: HashMap<String, usize> = HashMap::new();
    for (i, agent) in agents.iter().enumerate() {
        let Some(role) = agent.role_name() else {
            continue;
        };
        let key = normalize_key(role);
        if let Some(first) = agent_keys.get(&key) {
            errors.push(format!(
                "Agent {}: key '{}' duplicates Agent {}",
                i + 1,
                key,
                first + 1
            ));
        } else {
            agent_keys.insert(key, i);
        }
    }

    let mut task_keys: HashMap<String, usize> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        let key = task.key(i);
        if let Some(first) = task_keys.get(&key) {
            errors.push(format!(
                "Task {}: key '{}' duplicates Task {}",
                i + 1,
                key,
                first + 1
            ));
        } else {
            task_keys.insert(key, i);
        }
    }

    for (i, task) in tasks.iter().enumerate() {
        let own_key = task.key(i);
        let names = task.context.iter().flatten().filter_map(|e| e.as_name());
        for name in names {
            let key = normalize_key(name);
            if key == own_key {
                errors.push(format!(
                    "Task {}: context entry '{}' refers to the task itself",
                    i + 1,
                    name
                ));
            } else if !task_keys.contains_key(&key) {
                errors.push(format!(
                    "Task {}: context entry '{}' does not match any task",
                    i + 1,
                    name
                ));
            }
        }
    }

    errors
}

/// Report every selected tool the catalog does not know.
pub fn validate_tool_selection<I, S>(selected: I, catalog: &ToolCatalog) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    selected
        .into_iter()
        .filter(|tool| !catalog.contains(tool.as_ref()))
        .map(|tool| format!("Unknown tool: {}", tool.as_ref()))
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Validate the whole configuration.
///
/// Tasks are checked against the roles of agents that have one, in order.
pub fn validate_complete_configuration(
    project_name: &str,
    agents: &[AgentConfig],
    tasks: &[TaskConfig],
    crew: &CrewConfig,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Err(message) = validate_project_name(project_name) {
        report.push(ErrorCategory::Project, message);
    }

    let mut agent_roles: Vec<&str> = Vec::new();
    for (i, agent) in agents.iter().enumerate() {
        let errors = validate_agent_config(agent);
        report.extend(
            ErrorCategory::Agents,
            errors.into_iter().map(|e| format!("Agent {}: {}", i + 1, e)),
        );
        if let Some(role) = agent.role_name() {
            agent_roles.push(role);
        }
    }

    for (i, task) in tasks.iter().enumerate() {
        let errors = validate_task_config(task, &agent_roles);
        report.extend(
            ErrorCategory::Tasks,
            errors.into_iter().map(|e| format!("Task {}: {}", i + 1, e)),
        );
    }

    report.extend(
        ErrorCategory::Crew,
        validate_crew_config(crew, !agents.is_empty(), !tasks.is_empty()),
    );
    report.extend(ErrorCategory::Keys, validate_keys(agents, tasks));

    log::debug!(
        "validated '{}': {} agents, {} tasks, {} errors",
        project_name,
        agents.len(),
        tasks.len(),
        report.error_count()
    );
    report
}

/// Validate a full generation request: the configuration plus tool names
/// against the catalog and per-agent tool assignments against the agents.
pub fn validate_project(request: &ProjectRequest, catalog: &ToolCatalog) -> ValidationReport {
    let mut report = validate_complete_configuration(
        &request.project_name,
        &request.agents,
        &request.tasks,
        &request.crew,
    );

    let mut tool_errors = validate_tool_selection(request.all_tools(), catalog);

    let roles: HashSet<&str> = request
        .agents
        .iter()
        .filter_map(AgentConfig::role_name)
        .collect();
    for role in request.tools_by_agent.keys() {
        if !roles.contains(role.as_str()) {
            tool_errors.push(format!("Tools assigned to unknown agent: {}", role));
        }
    }
    report.extend(ErrorCategory::Tools, tool_errors);

    report
}
