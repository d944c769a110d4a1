//! HTTP Server and Scrape Handling
//!
//! This module implements the Prometheus exporter HTTP server.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing the metrics path and `/`
//! - **Scrape**: every request to the metrics path runs `dog` afresh; nothing is cached
//! - **State Management**: immutable shared state (schema, runner, settings) behind Arc
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with a link to the metrics path
//! - `GET <metrics_path>` - Prometheus metrics in text format (default `/metrics`)
//!
//! # Error Handling
//!
//! Failed `dog` queries are logged and only remove their metrics from the
//! response; the endpoint still answers 200. Only a rendering failure yields
//! a 500. Failing to bind the listener is fatal.

use crate::collectors::{self, CollectionContext};
use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics::{self, MetricSchema, NAMESPACE};
use crate::process;
use crate::sheepdog::ProcessRunner;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::Registry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    schema: Arc<MetricSchema>,
    runner: Arc<ProcessRunner>,
    pid_file: Option<Arc<PathBuf>>,
    metrics_path: Arc<str>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let runner = ProcessRunner::new(config.sheepdog.dog_binary.clone())
        .with_timeout(config.sheepdog.command_timeout());

    let state = AppState {
        schema: Arc::new(MetricSchema::new()),
        runner: Arc::new(runner),
        pid_file: config.sheepdog.pid_file.clone().map(Arc::new),
        metrics_path: Arc::from(config.server.metrics_path.as_str()),
    };

    // Build the router
    let app = Router::new()
        .route("/", get(root_handler))
        .route(&config.server.metrics_path, get(metrics_handler))
        .with_state(state);

    // Start the server
    let addr = &config.server.listen_address;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!(
        "Metrics available at http://{}{}",
        addr, config.server.metrics_path
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// HTML served at `/`
pub fn landing_page(metrics_path: &str) -> String {
    format!(
        r#"<html>
<head><title>Sheepdog Exporter</title></head>
<body>
<h1>Sheepdog Exporter</h1>
<p><a href="{}">Metrics</a></p>
</body>
</html>"#,
        metrics_path
    )
}

/// Runs one complete scrape and renders it in Prometheus text format.
///
/// Query failures are absorbed into the metric set; only rendering can fail.
pub async fn scrape_and_render(
    schema: &MetricSchema,
    runner: &ProcessRunner,
    pid_file: Option<&std::path::Path>,
) -> anyhow::Result<String> {
    let registry = Registry::new();
    let ctx = CollectionContext { runner, schema };
    collectors::collect(&ctx, &registry).await?;

    if let Some(pid_file) = pid_file {
        if let Err(e) = process::register_process_metrics(&registry, pid_file, NAMESPACE) {
            warn!("Skipping process metrics: {}", e);
        }
    }

    metrics::render(&registry)
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(landing_page(&state.metrics_path))
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let pid_file = state.pid_file.as_deref().map(PathBuf::as_path);
    match scrape_and_render(&state.schema, &state.runner, pid_file).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}
