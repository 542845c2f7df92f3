//! # crew-scaffold
//!
//! Validation and code generation engine for crewAI projects.
//!
//! A project is described as plain data: agents, tasks, a crew, selected
//! tools and environment values. This crate checks that description,
//! works out which credentials the project needs, and emits a runnable
//! Python project (`crew.py`, `main.py`, `config/agents.yaml`,
//! `config/tasks.yaml` plus optional boilerplate) as files on disk or a zip.
//!
//! ```no_run
//! use crew_scaffold::{generate_project_structure, validate_project, ProjectRequest, ToolCatalog};
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = ToolCatalog::builtin()?;
//! let request = ProjectRequest::from_yaml(&std::fs::read_to_string("project.yaml")?)?.prepared();
//! let report = validate_project(&request, &catalog);
//! if report.is_valid {
//!     let files = generate_project_structure(&request, &catalog)?;
//!     println!("{} files", files.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod catalog;
pub mod cli;
pub mod compat;
pub mod crew;
pub mod generators;
pub mod llm;
pub mod process;
pub mod project;
pub mod server;
pub mod task;
pub mod utilities;
pub mod validation;

pub use agent::AgentConfig;
pub use catalog::ToolCatalog;
pub use crew::CrewConfig;
pub use llm::LlmProvider;
pub use process::Process;
pub use project::{
    generate_project_structure, generate_project_summary, GeneratedFile, GeneratedFileSet,
    GenerationMode, ProjectRequest,
};
pub use task::TaskConfig;
pub use utilities::errors::{ArchiveError, CatalogError, GenerationError};
pub use validation::{validate_complete_configuration, validate_project, ValidationReport};

/// Crate version, written into generated READMEs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
