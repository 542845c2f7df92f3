//! HTTP server for validation and project generation.
//!
//! Exposes the scaffolding engine as a JSON API for a form front end.
//!
//! # Endpoints
//!
//! - `GET  /health`: Liveness probe
//! - `GET  /catalog/tools`: Tool catalog
//! - `POST /validate`: Validate a project request
//! - `POST /env-vars`: Required environment variables
//! - `POST /generate`: Generate files as JSON
//! - `POST /download`: Generate a zip archive
//! - `POST /summary`: Markdown summary

pub mod routes;

pub use routes::{app_router, AppState};
