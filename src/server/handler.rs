// src/server/handler.rs
// =============================================================================
// The POST /analyze-url endpoint.
//
// Request body:  {"url": "https://example.com"}
// Response body: {"result": <report or null>, "error": "...", "code": <int>}
//
// Failure mapping:
// - body is not the expected JSON      -> 400, code 406
// - url is not an absolute http(s) URL -> 400, code 400
// - the page could not be downloaded   -> 412
// - the page could not be analyzed     -> 412
// =============================================================================

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use super::AppState;
use crate::analyzer::Report;
use crate::page::fetch_page;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: Option<Report>,
    pub error: String,
    pub code: u16,
}

impl AnalyzeResponse {
    fn failure(status: StatusCode, code: StatusCode, message: &str) -> Response {
        let body = Self {
            result: None,
            error: message.to_string(),
            code: code.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn analyze_url(State(state): State<AppState>, body: Bytes) -> Response {
    // We take the raw body (Bytes) instead of axum's Json extractor so a bad
    // body gets our own envelope instead of axum's default rejection
    // Step 1: decode {"url": "..."}
    let request: UrlRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "error while binding request body");
            return AnalyzeResponse::failure(
                StatusCode::BAD_REQUEST,
                StatusCode::NOT_ACCEPTABLE,
                "cannot parse request body",
            );
        }
    };
    info!(url = %request.url, "request body bound successfully");

    // Step 2: only absolute http(s) URLs are worth fetching
    let url = match parse_target(&request.url) {
        Some(url) => url,
        None => {
            error!(url = %request.url, "requested url is not valid");
            return AnalyzeResponse::failure(
                StatusCode::BAD_REQUEST,
                StatusCode::BAD_REQUEST,
                "entered url is not valid",
            );
        }
    };

    // Step 3: download the page (200 + text/html, see page.rs)
    let html = match fetch_page(&state.client, &url).await {
        Ok(html) => html,
        Err(e) => {
            error!(url = %url, error = %e, "error while performing request");
            return AnalyzeResponse::failure(
                StatusCode::PRECONDITION_FAILED,
                StatusCode::PRECONDITION_FAILED,
                "could not retrieve html body of url",
            );
        }
    };

    // Step 4: run the analysis. `state.analyze` is a field holding a
    // function, hence the parentheses around it before calling.
    match (state.analyze)(url.clone(), html).await {
        Ok(report) => {
            // Partial (cancelled) reports are still a success; the report
            // itself says probe_status = "cancelled"
            info!(url = %url, "html analyzed successfully");
            let body = AnalyzeResponse {
                result: Some(report),
                error: String::new(),
                code: StatusCode::OK.as_u16(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(url = %url, error = %e, "error while parsing html");
            AnalyzeResponse::failure(
                StatusCode::PRECONDITION_FAILED,
                StatusCode::PRECONDITION_FAILED,
                "error while parsing html",
            )
        }
    }
}

// Only absolute http(s) URLs can be fetched.
fn parse_target(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
