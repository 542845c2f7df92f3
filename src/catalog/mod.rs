//! Tool catalog and credential reference data.
//!
//! The catalog is external, versioned data: which `crewai_tools` classes
//! exist, which of them need credentials, which LLM model names map to which
//! provider credentials, and which crewAI releases the output was tested
//! against. It ships as an embedded YAML resource and can be swapped for a
//! fixture or a newer file at runtime.

pub mod registry;
pub mod tool;

pub use registry::{ToolCatalog, CATALOG_ENV_VAR, DEFAULT_CATALOG_YAML};
pub use tool::{CrewaiVersions, ProviderRule, ToolCategory, ToolEntry};
