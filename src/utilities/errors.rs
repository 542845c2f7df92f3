//! Error types for the generation engine.
//!
//! Validation problems are not errors: they are collected into a
//! [`crate::validation::ValidationReport`]. The enums here cover contract
//! violations by callers and failures of the underlying crates.

use thiserror::Error;

/// Errors raised while emitting YAML or source text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required field was absent. Emitters assume validated input, so this
    /// signals that a caller skipped validation.
    #[error("{entity} {index}: required field '{field}' is missing")]
    MissingField {
        entity: &'static str,
        index: usize,
        field: &'static str,
    },

    /// A task context entry was not a task name.
    #[error("task '{task}': context entry {value} is not a task name")]
    InvalidContext { task: String, value: String },

    /// Template registration or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GenerationError {
    /// Shorthand for an absent agent field (`index` is 1-based).
    pub fn missing_agent_field(index: usize, field: &'static str) -> Self {
        Self::MissingField {
            entity: "Agent",
            index,
            field,
        }
    }

    /// Shorthand for an absent task field (`index` is 1-based).
    pub fn missing_task_field(index: usize, field: &'static str) -> Self {
        Self::MissingField {
            entity: "Task",
            index,
            field,
        }
    }
}

/// Errors raised while loading the tool catalog resource.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The catalog parsed but its content is unusable.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Errors raised while packing or writing a generated file set.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The zip writer failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
