//! Crew configuration record.
//!
//! Crew-level settings that tie the agents and tasks together in the
//! generated `crew()` function.

use serde::{Deserialize, Serialize};

use crate::process::Process;

/// Configuration for the generated crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    /// Optional name for the crew.
    pub name: Option<String>,
    /// `sequential` or `hierarchical`; kept as text so bad values reach the validator.
    pub process: Option<String>,
    pub verbose: Option<bool>,
    pub cache: Option<bool>,
    pub memory: Option<bool>,
    pub planning: Option<bool>,
    /// Maximum requests per minute for the whole crew.
    pub max_rpm: Option<i64>,
    /// Model that runs the manager in a hierarchical crew.
    pub manager_llm: Option<String>,
    /// Role of a custom manager agent in a hierarchical crew.
    pub manager_agent: Option<String>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            name: None,
            process: Some(Process::Sequential.to_string()),
            verbose: None,
            cache: None,
            memory: None,
            planning: None,
            max_rpm: None,
            manager_llm: None,
            manager_agent: None,
        }
    }
}

impl CrewConfig {
    /// A crew running the given process.
    pub fn with_process(process: Process) -> Self {
        Self {
            process: Some(process.to_string()),
            ..Default::default()
        }
    }

    /// Typed view of `process`.
    pub fn process(&self) -> Option<Process> {
        self.process.as_deref().and_then(Process::parse)
    }

    /// Process name for the generated `Process.<name>` reference.
    pub fn process_name(&self) -> &str {
        self.process.as_deref().unwrap_or("sequential")
    }

    /// Fill unset optional fields with crewAI's defaults.
    pub fn fill_defaults(&mut self) {
        self.name.get_or_insert_with(|| "crew".to_string());
        self.process
            .get_or_insert_with(|| Process::Sequential.to_string());
        self.verbose.get_or_insert(false);
        self.cache.get_or_insert(true);
        self.memory.get_or_insert(false);
        self.planning.get_or_insert(false);
    }
}
