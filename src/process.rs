//! Crew process types.
//!
//! The crew configuration keeps `process` as free text so the validator can
//! report unknown values; [`Process::parse`] is the typed view of it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the generated crew schedules its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// Tasks are executed one after another in order.
    Sequential,
    /// A manager agent or LLM delegates tasks to other agents.
    Hierarchical,
}

impl Process {
    /// All accepted process names, in display order.
    pub const NAMES: [&'static str; 2] = ["sequential", "hierarchical"];

    /// Every process, in display order.
    pub const ALL: [Process; 2] = [Process::Sequential, Process::Hierarchical];

    /// Parse an exact process name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sequential" => Some(Process::Sequential),
            "hierarchical" => Some(Process::Hierarchical),
            _ => None,
        }
    }

    /// Short description shown next to the process choice.
    pub fn description(&self) -> &'static str {
        match self {
            Process::Sequential => "Tasks executed one after another in order",
            Process::Hierarchical => "Tasks managed by a manager agent (requires manager_llm)",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Process::Sequential => write!(f, "sequential"),
            Process::Hierarchical => write!(f, "hierarchical"),
        }
    }
}

impl Default for Process {
    fn default() -> Self {
        Process::Sequential
    }
}
