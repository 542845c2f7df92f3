//! Command-line front end for the `crew-scaffold` binary.
//!
//! Every command that takes a request reads a `ProjectRequest` document;
//! `.json` files are parsed as JSON and anything else as YAML.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::agent::CodeExecutionMode;
use crate::catalog::{ToolCatalog, CATALOG_ENV_VAR};
use crate::compat::check_against;
use crate::process::Process;
use crate::project::{
    archive_file_name, create_zip_file, generate_project_structure, generate_project_summary,
    save_project_to_disk, GenerationMode, ProjectRequest,
};
use crate::validation::validate_project;

#[derive(Debug, Parser)]
#[command(
    name = "crew-scaffold",
    version,
    about = "Validate crewAI project configurations and generate project scaffolds"
)]
pub struct Cli {
    /// Tool catalog YAML replacing the built-in one.
    #[arg(long, global = true, env = CATALOG_ENV_VAR)]
    pub catalog: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a request and print categorized errors.
    Validate {
        /// Request file (YAML or JSON).
        request: PathBuf,
    },
    /// Print the environment variables the project needs.
    Env { request: PathBuf },
    /// Validate, then write the project files or a zip archive.
    Generate(GenerateOpts),
    /// Print a markdown summary of the configuration.
    Summary { request: PathBuf },
    /// List the tools in the catalog. Without `--category`, also lists the
    /// LLM providers with their suggested models, the crew processes and the
    /// code execution modes.
    Catalog {
        /// Only this category.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Check an installed crewAI version against the tested releases.
    Compat {
        /// Installed version, e.g. `1.4.1`.
        installed: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct GenerateOpts {
    pub request: PathBuf,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Write `<project>.zip` instead of a directory tree.
    #[arg(long)]
    pub zip: bool,

    /// Override the request's generation mode (core_files or complete_project).
    #[arg(short, long)]
    pub mode: Option<GenerationMode>,
}

/// Read a request document, choosing the parser by extension.
pub fn load_request(path: &Path) -> anyhow::Result<ProjectRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let request = if is_json {
        ProjectRequest::from_json(&content)
            .with_context(|| format!("invalid JSON request in {}", path.display()))?
    } else {
        ProjectRequest::from_yaml(&content)
            .with_context(|| format!("invalid YAML request in {}", path.display()))?
    };
    Ok(request.prepared())
}

/// Provider, process and code execution choices for the `catalog` listing.
fn write_options(catalog: &ToolCatalog, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "\nLLM providers:")?;
    for rule in catalog.llm_providers() {
        writeln!(out, "  {:<28} {}", rule.provider.to_string(), rule.models.join(", "))?;
    }
    writeln!(out, "\nProcesses:")?;
    for process in Process::ALL {
        writeln!(out, "  {:<28} {}", process.to_string(), process.description())?;
    }
    writeln!(out, "\nCode execution modes:")?;
    for mode in CodeExecutionMode::ALL {
        writeln!(out, "  {:<28} {}", mode.to_string(), mode.description())?;
    }
    Ok(())
}

/// Exit status for a failed check.
pub const EXIT_FAILURE: u8 = 1;

/// Run a parsed command line, writing results to `out`. Returns the process
/// exit status: 0, or [`EXIT_FAILURE`] when validation or a compat check fails.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<u8> {
    let catalog = ToolCatalog::load(cli.catalog.as_deref()).context("failed to load tool catalog")?;

    match cli.command {
        Commands::Validate { request } => {
            let request = load_request(&request)?;
            let report = validate_project(&request, &catalog);
            write!(out, "{}", report)?;
            Ok(exit_code(report.is_valid))
        }
        Commands::Env { request } => {
            let request = load_request(&request)?;
            for name in request.required_env_vars(&catalog) {
                writeln!(out, "{}", name)?;
            }
            Ok(0)
        }
        Commands::Generate(opts) => generate(opts, &catalog, out),
        Commands::Summary { request } => {
            let request = load_request(&request)?;
            let summary = generate_project_summary(
                &request.project_name,
                &request.agents,
                &request.tasks,
                &request.crew,
            );
            write!(out, "{}", summary)?;
            Ok(0)
        }
        Commands::Catalog { category } => {
            let categories = catalog
                .categories()
                .iter()
                .filter(|c| category.as_deref().map_or(true, |name| c.name == name));

            let mut listed = 0;
            for category in categories {
                writeln!(out, "{}:", category.name)?;
                for tool in &category.tools {
                    if tool.env_vars.is_empty() {
                        writeln!(out, "  {:<28} {}", tool.name, tool.description)?;
                    } else {
                        writeln!(
                            out,
                            "  {:<28} {} [{}]",
                            tool.name,
                            tool.description,
                            tool.env_vars.join(", ")
                        )?;
                    }
                }
                listed += 1;
            }
            if listed == 0 {
                anyhow::bail!(
                    "unknown category '{}'",
                    category.as_deref().unwrap_or_default()
                );
            }
            if category.is_none() {
                write_options(&catalog, out)?;
            }
            Ok(0)
        }
        Commands::Compat { installed } => {
            let versions = catalog.crewai_versions();
            let check = check_against(&installed, versions);
            writeln!(
                out,
                "crewAI {}: {} (tested: {})",
                installed,
                check,
                versions.tested_versions.join(", ")
            )?;
            Ok(exit_code(check.compatible))
        }
    }
}

fn generate(
    opts: GenerateOpts,
    catalog: &ToolCatalog,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let mut request = load_request(&opts.request)?;
    if let Some(mode) = opts.mode {
        request.generation_mode = mode;
    }

    let report = validate_project(&request, catalog);
    if !report.is_valid {
        write!(out, "{}", report)?;
        return Ok(EXIT_FAILURE);
    }

    let files = generate_project_structure(&request, catalog)?;
    let project = request.project_name.as_str();

    if opts.zip {
        let bytes = create_zip_file(&files, project)?;
        std::fs::create_dir_all(&opts.out)
            .with_context(|| format!("failed to create {}", opts.out.display()))?;
        let target = opts
            .out
            .join(archive_file_name(project, request.generation_mode));
        std::fs::write(&target, bytes)
            .with_context(|| format!("failed to write {}", target.display()))?;
        writeln!(out, "{}", target.display())?;
    } else {
        let root = opts.out.join(project);
        for path in save_project_to_disk(&files, &root)? {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(0)
}

fn exit_code(ok: bool) -> u8 {
    if ok {
        0
    } else {
        EXIT_FAILURE
    }
}
