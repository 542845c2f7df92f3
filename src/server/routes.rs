//! Axum route handlers for the crew-scaffold HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`: Returns `{"status": "ok", "version": ..., "service": "crew-scaffold"}`
//! - `GET  /catalog/tools`: Catalog version, tool categories, LLM providers
//!   and the process and code execution choices
//! - `POST /validate`: `ProjectRequest` in, `ValidationReport` out
//! - `POST /env-vars`: Required environment variable names
//! - `POST /generate`: Generated files as JSON, or 422 with the report
//! - `POST /download`: Generated project as a zip, or 422 with the report
//! - `POST /summary`: Markdown project summary

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::CodeExecutionMode;
use crate::catalog::ToolCatalog;
use crate::process::Process;
use crate::project::{
    archive_file_name, create_zip_file, extract_input_variables, generate_project_structure,
    generate_project_summary, GeneratedFileSet, ProjectRequest,
};
use crate::validation::{validate_project, ValidationReport};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Tool catalog consulted by validation and env resolution.
    pub catalog: Arc<ToolCatalog>,
}

impl AppState {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/catalog/tools", get(catalog_handler))
        .route("/validate", post(validate_handler))
        .route("/env-vars", post(env_vars_handler))
        .route("/generate", post(generate_handler))
        .route("/download", post(download_handler))
        .route("/summary", post(summary_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Body of a successful `/generate`.
#[derive(Debug, Serialize)]
struct GenerateResponse {
    files: GeneratedFileSet,
    input_variables: Vec<String>,
    required_env_vars: Vec<String>,
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!("generation failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Validate, then generate. An invalid request becomes a 422 carrying the
/// report.
fn validated_files(
    request: &ProjectRequest,
    catalog: &ToolCatalog,
) -> Result<GeneratedFileSet, Response> {
    let report = validate_project(request, catalog);
    if !report.is_valid {
        tracing::info!(
            "rejected '{}' with {} validation errors",
            request.project_name,
            report.error_count()
        );
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response());
    }
    generate_project_structure(request, catalog).map_err(internal_error)
}

/// GET /health: liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "crew-scaffold",
    }))
}

/// GET /catalog/tools: the tool catalog grouped by category, plus the
/// choices a form offers next to it.
async fn catalog_handler(State(state): State<AppState>) -> Json<Value> {
    let processes: Vec<Value> = Process::ALL
        .iter()
        .map(|p| serde_json::json!({ "name": p, "description": p.description() }))
        .collect();
    let code_execution_modes: Vec<Value> = CodeExecutionMode::ALL
        .iter()
        .map(|m| serde_json::json!({ "name": m, "description": m.description() }))
        .collect();

    Json(serde_json::json!({
        "version": state.catalog.version,
        "categories": state.catalog.categories(),
        "llm_providers": state.catalog.llm_providers(),
        "processes": processes,
        "code_execution_modes": code_execution_modes,
    }))
}

/// POST /validate: categorized validation report.
async fn validate_handler(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Json<ValidationReport> {
    let request = request.prepared();
    Json(validate_project(&request, &state.catalog))
}

/// POST /env-vars: variables the generated project needs.
async fn env_vars_handler(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Json<Value> {
    Json(serde_json::json!({
        "required": request.required_env_vars(&state.catalog),
    }))
}

/// POST /generate: generated files with the detected inputs and env vars.
async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Result<Json<GenerateResponse>, Response> {
    let request = request.prepared();
    let files = validated_files(&request, &state.catalog)?;

    Ok(Json(GenerateResponse {
        files,
        input_variables: extract_input_variables(&request.agents, &request.tasks),
        required_env_vars: request.required_env_vars(&state.catalog),
    }))
}

/// POST /download: generated project as a zip attachment.
async fn download_handler(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Result<Response, Response> {
    let request = request.prepared();
    let files = validated_files(&request, &state.catalog)?;
    let bytes = create_zip_file(&files, &request.project_name).map_err(internal_error)?;
    let file_name = archive_file_name(&request.project_name, request.generation_mode);

    tracing::debug!("serving {} ({} bytes)", file_name, bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /summary: markdown overview of the configuration.
async fn summary_handler(Json(request): Json<ProjectRequest>) -> impl IntoResponse {
    let request = request.prepared();
    let summary = generate_project_summary(
        &request.project_name,
        &request.agents,
        &request.tasks,
        &request.crew,
    );
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        summary,
    )
}
