//! Task configuration records.
//!
//! A [`TaskConfig`] is the form data for one crewAI task: what to do, what
//! to produce, which agent does it, and which earlier tasks feed it context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::string_utils::normalize_key;

/// One entry of a task's `context` list.
///
/// Entries should be task names. Anything else is kept so the validator can
/// report it instead of the document failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextEntry {
    /// Name of another task.
    Name(String),
    /// A non-string value.
    Other(Value),
}

impl ContextEntry {
    /// The task name, if this entry is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ContextEntry::Name(name) => Some(name),
            ContextEntry::Other(_) => None,
        }
    }
}

impl From<&str> for ContextEntry {
    fn from(name: &str) -> Self {
        ContextEntry::Name(name.to_string())
    }
}

/// Configuration for one task of the generated crew.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Task name; `task_{n}` (1-based position) is used when absent.
    pub name: Option<String>,
    /// What the agent must do. May contain `{input}` placeholders.
    pub description: Option<String>,
    /// What a finished task looks like.
    pub expected_output: Option<String>,
    /// Role of the responsible agent, as typed on the agent.
    pub agent: Option<String>,
    /// Names of tasks whose output this task receives.
    pub context: Option<Vec<ContextEntry>>,

    // ---- Execution ----
    pub async_execution: Option<bool>,
    pub human_input: Option<bool>,
    pub markdown: Option<bool>,
    pub guardrail_max_retries: Option<i64>,
    pub allow_crewai_trigger_context: Option<bool>,

    // ---- Output ----
    /// Path the task output is written to.
    pub output_file: Option<String>,
    pub create_directory: Option<bool>,
}

impl TaskConfig {
    /// Create a named task with its required fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            expected_output: Some(expected_output.into()),
            agent: Some(agent.into()),
            ..Default::default()
        }
    }

    /// Set the context task names.
    pub fn with_context<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = Some(
            names
                .into_iter()
                .map(|n| ContextEntry::Name(n.into()))
                .collect(),
        );
        self
    }

    /// Name if present and non-empty.
    pub fn task_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Key for this task at 0-based `index`: the normalized name, or
    /// `task_{index + 1}` when unnamed.
    pub fn key(&self, index: usize) -> String {
        match self.task_name() {
            Some(name) => normalize_key(name),
            None => format!("task_{}", index + 1),
        }
    }

    /// Name used in generated docstrings and summaries.
    pub fn display_name(&self, index: usize) -> String {
        match self.task_name() {
            Some(name) => name.to_string(),
            None => format!("Task {}", index + 1),
        }
    }

    /// Fill unset optional fields with crewAI's defaults.
    pub fn fill_defaults(&mut self) {
        self.async_execution.get_or_insert(false);
        self.human_input.get_or_insert(false);
        self.markdown.get_or_insert(false);
        self.create_directory.get_or_insert(true);
        self.guardrail_max_retries.get_or_insert(3);
        self.allow_crewai_trigger_context.get_or_insert(false);
    }
}
