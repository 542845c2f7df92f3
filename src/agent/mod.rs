//! Agent configuration records.
//!
//! An [`AgentConfig`] is the form data for one crewAI agent. Required fields
//! are optional at the type level so incomplete drafts can be validated and
//! reported on instead of failing to deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llm::LlmProvider;
use crate::utilities::string_utils::normalize_key;

/// crewAI's default iteration cap; the crew emitter omits `max_iter` at this value.
pub const DEFAULT_MAX_ITER: i64 = 25;

/// Where agent-generated code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeExecutionMode {
    /// Inside a Docker container.
    Safe,
    /// Directly on the host.
    Unsafe,
}

impl CodeExecutionMode {
    pub const NAMES: [&'static str; 2] = ["safe", "unsafe"];
    pub const ALL: [CodeExecutionMode; 2] = [CodeExecutionMode::Safe, CodeExecutionMode::Unsafe];

    /// Parse an exact mode name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "safe" => Some(CodeExecutionMode::Safe),
            "unsafe" => Some(CodeExecutionMode::Unsafe),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CodeExecutionMode::Safe => "Execute code in Docker container (recommended)",
            CodeExecutionMode::Unsafe => "Execute code directly on host system (use with caution)",
        }
    }
}

impl fmt::Display for CodeExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeExecutionMode::Safe => write!(f, "safe"),
            CodeExecutionMode::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Configuration for one agent of the generated crew.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // ---- Identity ----
    /// Role; its normalized form is the agent's key in YAML and source.
    pub role: Option<String>,
    /// Objective the agent pursues.
    pub goal: Option<String>,
    /// Background that shapes the agent's behaviour.
    pub backstory: Option<String>,

    // ---- Execution ----
    pub verbose: Option<bool>,
    pub allow_delegation: Option<bool>,
    pub max_iter: Option<i64>,
    pub max_rpm: Option<i64>,
    pub cache: Option<bool>,
    pub max_tokens: Option<i64>,
    /// Seconds.
    pub max_execution_time: Option<i64>,
    pub max_retry_limit: Option<i64>,
    pub respect_context_window: Option<bool>,
    pub guardrail_max_retries: Option<i64>,

    // ---- Model ----
    /// Model identifier, e.g. `gpt-4` or `claude-3-haiku-20240307`.
    pub llm: Option<String>,
    /// Explicit provider chosen with the model; overrides inference from `llm`.
    pub llm_provider: Option<LlmProvider>,
    pub function_calling_llm: Option<String>,

    // ---- Reasoning ----
    pub reasoning: Option<bool>,
    pub max_reasoning_attempts: Option<i64>,
    pub multimodal: Option<bool>,

    // ---- Code execution ----
    pub allow_code_execution: Option<bool>,
    /// `safe` or `unsafe`; kept as text so bad values reach the validator.
    pub code_execution_mode: Option<String>,

    // ---- Dates ----
    pub inject_date: Option<bool>,
    pub date_format: Option<String>,

    // ---- Prompt templates ----
    pub use_system_prompt: Option<bool>,
    pub system_template: Option<String>,
    pub prompt_template: Option<String>,
    pub response_template: Option<String>,
}

impl AgentConfig {
    /// Create an agent with the three required fields.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: Some(role.into()),
            goal: Some(goal.into()),
            backstory: Some(backstory.into()),
            ..Default::default()
        }
    }

    /// Set the model identifier.
    pub fn with_llm(mut self, llm: impl Into<String>) -> Self {
        self.llm = Some(llm.into());
        self
    }

    /// Normalized role, if a role is set.
    pub fn key(&self) -> Option<String> {
        self.role.as_deref().map(normalize_key)
    }

    /// Role if present and non-empty.
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_deref().filter(|r| !r.is_empty())
    }

    /// Typed view of `code_execution_mode`.
    pub fn code_execution_mode(&self) -> Option<CodeExecutionMode> {
        self.code_execution_mode
            .as_deref()
            .and_then(CodeExecutionMode::parse)
    }

    /// Fill unset optional fields with crewAI's defaults.
    pub fn fill_defaults(&mut self) {
        self.verbose.get_or_insert(false);
        self.cache.get_or_insert(true);
        self.max_iter.get_or_insert(DEFAULT_MAX_ITER);
        self.max_retry_limit.get_or_insert(2);
        self.respect_context_window.get_or_insert(true);
        self.allow_delegation.get_or_insert(false);
        self.reasoning.get_or_insert(false);
        self.multimodal.get_or_insert(false);
        self.allow_code_execution.get_or_insert(false);
        self.code_execution_mode
            .get_or_insert_with(|| CodeExecutionMode::Safe.to_string());
        self.inject_date.get_or_insert(false);
        self.date_format.get_or_insert_with(|| "%Y-%m-%d".to_string());
        self.use_system_prompt.get_or_insert(true);
        self.guardrail_max_retries.get_or_insert(3);
    }
}
