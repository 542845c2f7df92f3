//! Tool catalog: the reference data the resolver and validators consult.
//!
//! The catalog is loaded from:
//! 1. The built-in YAML resource compiled into the binary
//! 2. A YAML file given on the command line or in `CREW_SCAFFOLD_CATALOG`
//!
//! Lookups are by exact tool name. A tool listed under several categories
//! resolves to its first listing.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tool::{CrewaiVersions, ProviderRule, ToolCategory, ToolEntry};
use crate::llm::LlmProvider;
use crate::utilities::errors::CatalogError;

/// Built-in catalog resource.
pub const DEFAULT_CATALOG_YAML: &str = include_str!("default_catalog.yaml");

/// Environment variable naming an alternative catalog file.
pub const CATALOG_ENV_VAR: &str = "CREW_SCAFFOLD_CATALOG";

/// Versioned tool catalog plus the credential tables derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalog {
    /// Catalog data version, bumped whenever the resource changes.
    pub version: String,

    #[serde(default)]
    crewai: CrewaiVersions,

    /// Ordered provider rules; the first match wins.
    #[serde(default)]
    llm_providers: Vec<ProviderRule>,

    /// Variables added when tracing is enabled.
    #[serde(default)]
    tracing_env_vars: Vec<String>,

    categories: Vec<ToolCategory>,

    /// Tool name → (category index, tool index).
    #[serde(skip)]
    index: HashMap<String, (usize, usize)>,
}

impl ToolCatalog {
    /// Parse the built-in catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(DEFAULT_CATALOG_YAML)
    }

    /// Parse a catalog from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let mut catalog: ToolCatalog = serde_yaml::from_str(yaml)?;
        catalog.build_index()?;
        Ok(catalog)
    }

    /// Parse a catalog from a YAML file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path` if given, else from `CREW_SCAFFOLD_CATALOG`, else the
    /// built-in resource.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        if let Some(path) = path {
            log::debug!("loading tool catalog from {}", path.display());
            return Self::from_file(path);
        }
        match std::env::var(CATALOG_ENV_VAR) {
            Ok(env_path) if !env_path.is_empty() => {
                log::debug!("loading tool catalog from ${} = {}", CATALOG_ENV_VAR, env_path);
                Self::from_file(env_path)
            }
            _ => Self::builtin(),
        }
    }

    fn build_index(&mut self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Invalid("catalog has no categories".to_string()));
        }
        self.index.clear();
        for (ci, category) in self.categories.iter().enumerate() {
            for (ti, tool) in category.tools.iter().enumerate() {
                if tool.name.trim().is_empty() {
                    return Err(CatalogError::Invalid(format!(
                        "category '{}' has a tool without a name",
                        category.name
                    )));
                }
                self.index.entry(tool.name.clone()).or_insert((ci, ti));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tools
    // -----------------------------------------------------------------------

    /// All categories in catalog order.
    pub fn categories(&self) -> &[ToolCategory] {
        &self.categories
    }

    /// Find a category by exact name.
    pub fn category(&self, name: &str) -> Option<&ToolCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Look up a tool by name.
    pub fn tool(&self, name: &str) -> Option<&ToolEntry> {
        self.index
            .get(name)
            .map(|&(ci, ti)| &self.categories[ci].tools[ti])
    }

    /// Name of the category a tool is first listed under.
    pub fn category_of(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&(ci, _)| self.categories[ci].name.as_str())
    }

    /// Whether the catalog knows `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every distinct tool name, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self.index.keys().map(String::as_str).collect();
        names.into_iter().collect()
    }

    /// Number of distinct tools.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the catalog holds no tools.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Variables a tool requires; empty for unknown tools.
    pub fn tool_env_vars(&self, name: &str) -> &[String] {
        self.tool(name).map(|t| t.env_vars.as_slice()).unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // Providers, tracing, versions
    // -----------------------------------------------------------------------

    /// Ordered provider rules.
    pub fn llm_providers(&self) -> &[ProviderRule] {
        &self.llm_providers
    }

    /// Variables a provider requires; empty when the catalog has no rule.
    pub fn provider_env_vars(&self, provider: LlmProvider) -> &[String] {
        self.llm_providers
            .iter()
            .find(|rule| rule.provider == provider)
            .map(|rule| rule.env_vars.as_slice())
            .unwrap_or(&[])
    }

    /// Variables added when tracing is enabled.
    pub fn tracing_env_vars(&self) -> &[String] {
        &self.tracing_env_vars
    }

    /// Tested crewAI release range.
    pub fn crewai_versions(&self) -> &CrewaiVersions {
        &self.crewai
    }
}
