//! crew-scaffold HTTP server binary.
//!
//! Serves validation and project generation over HTTP for a form front end.
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP port (default: 8080)
//! - `CREW_SCAFFOLD_CATALOG`: Path to a replacement tool catalog YAML
//! - `RUST_LOG`: Tracing filter (default: "info,crew_scaffold=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use crew_scaffold::catalog::ToolCatalog;
use crew_scaffold::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crew_scaffold=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    // Honors CREW_SCAFFOLD_CATALOG.
    let catalog = ToolCatalog::load(None).context("failed to load tool catalog")?;
    tracing::info!(
        "tool catalog v{} loaded ({} tools)",
        catalog.version,
        catalog.len()
    );

    let app = app_router(AppState::new(catalog));

    tracing::info!("crew-scaffold server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health        - liveness probe");
    tracing::info!("  GET  /catalog/tools - tool catalog");
    tracing::info!("  POST /validate      - validation report");
    tracing::info!("  POST /generate      - generated files");
    tracing::info!("  POST /download      - zip archive");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
