// src/server/mod.rs
// =============================================================================
// The HTTP service.
//
// Routes:
// - POST /analyze-url : download a page and analyze it (see handler.rs)
// - GET  /health      : liveness check
//
// The analysis itself is injected through AppState::analyze. In production it
// runs the real analyzer with the shared HTTP client; tests swap in stubs.
// =============================================================================

mod handler;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use tracing::info;
use url::Url;

use crate::analyzer::{self, Report};
use crate::cli::HttpArgs;
use crate::error::AnalyzeError;
use crate::probe::{http_client, Fetcher, HttpFetcher};

/// Analyzes `html` that was downloaded from the given URL.
pub type AnalyzeFn =
    Arc<dyn Fn(Url, String) -> BoxFuture<'static, Result<Report, AnalyzeError>> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    /// Client used to download the pages to analyze
    pub client: Client,
    pub analyze: AnalyzeFn,
}

impl AppState {
    pub fn from_config(config: &HttpArgs) -> Result<Self> {
        let client = http_client(config.http_timeout)?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(client.clone()));
        let token_limit = config.token_limit();
        let deadline = config.analysis_deadline;

        let analyze = analyzer_fn(move |url, html| {
            analyzer::analyze(url, html, Arc::clone(&fetcher), token_limit, deadline)
        });

        Ok(Self { client, analyze })
    }
}

/// Wraps an async function into an AnalyzeFn.
pub fn analyzer_fn<F, Fut>(f: F) -> AnalyzeFn
where
    F: Fn(Url, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Report, AnalyzeError>> + Send + 'static,
{
    Arc::new(move |url, html| f(url, html).boxed())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze-url", post(handler::analyze_url))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        // without a signal handler, run until the process is killed
        Err(_) => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let config = HttpArgs {
            http_timeout: Duration::from_secs(1),
            analysis_deadline: Duration::from_secs(1),
            max_token_bytes: 0,
        };
        let state = AppState::from_config(&config).unwrap();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
