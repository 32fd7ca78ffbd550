// src/analyzer/engine.rs
// =============================================================================
// Puts all the extractors together into one Report.
//
// An Analyzer owns one Document and is either unanalyzed or analyzed. The
// first call to analyze() validates the document, runs every extractor,
// probes the links and caches the Report. Every later call returns the cached
// Report: no scanning, no network.
//
// The cache is a tokio OnceCell, so two concurrent first calls still only
// analyze (and probe) once; the second caller waits for the first.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use super::document::Document;
use super::headings::headings_count;
use super::links::extract_links;
use super::login::has_login_form;
use super::report::{LinksCount, Report};
use super::title::page_title;
use super::version::html_version;
use crate::error::AnalyzeError;
use crate::probe::{probe_links, Fetcher};

pub struct Analyzer {
    document: Document,
    fetcher: Arc<dyn Fetcher>,
    report: OnceCell<Report>,
}

impl Analyzer {
    pub fn new(document: Document, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            document,
            fetcher,
            report: OnceCell::new(),
        }
    }

    /// Analyzes the document once and returns the cached report afterwards.
    ///
    /// `cancel` only bounds the wait on link probes; a cancelled run still
    /// produces (and caches) a report with `probe_status = cancelled`.
    pub async fn analyze(&self, cancel: &CancellationToken) -> Result<&Report, AnalyzeError> {
        // get_or_try_init runs build_report only if the cell is still empty.
        // An Err leaves the cell empty, so a failed analysis is not cached.
        // The returned &Report borrows from self: callers get the cached
        // value, not a copy.
        self.report.get_or_try_init(|| self.build_report(cancel)).await
    }

    async fn build_report(&self, cancel: &CancellationToken) -> Result<Report, AnalyzeError> {
        // A hard tokenizer failure stops everything before any network call.
        // The `?` turns the ScanError into AnalyzeError::DocumentInvalid
        // through the #[from] conversion in error.rs.
        self.document.scanner().validate()?;

        // Links first: probing is the slow part and needs the link set
        let links = extract_links(&self.document);
        let probes = probe_links(Arc::clone(&self.fetcher), links.probe_targets(), cancel).await;

        // The remaining extractors each rescan the document; none of them
        // touch the network, so they finish quickly
        let report = Report {
            html_version: html_version(&self.document).to_string(),
            page_title: page_title(&self.document),
            headings_count: headings_count(&self.document),
            links_count: LinksCount {
                internal: links.internal.len(),
                external: links.external.len(),
            },
            inaccessible_links_count: probes.inaccessible,
            has_login_form: has_login_form(&self.document),
            probe_status: probes.status,
        };

        info!(url = %self.document.host(), ?report, "html analyzed");
        Ok(report)
    }
}

/// One-shot analysis whose probe wait is bounded by `deadline`.
pub async fn analyze_with_deadline(
    document: Document,
    fetcher: Arc<dyn Fetcher>,
    deadline: Duration,
) -> Result<Report, AnalyzeError> {
    // The timer task cancels the token once the deadline passes. Cloning a
    // CancellationToken gives another handle to the SAME token.
    let cancel = CancellationToken::new();
    let timer = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(deadline).await;
            cancel.cancel();
        }
    });

    let analyzer = Analyzer::new(document, fetcher);
    // .cloned() turns Result<&Report, _> into Result<Report, _> so the
    // report can outlive the analyzer
    let result = analyzer.analyze(&cancel).await.cloned();

    // Analysis finished first: the timer has nothing left to do
    timer.abort();
    result
}

/// Convenience wrapper: analyze `html` fetched from `host`.
pub async fn analyze(
    host: Url,
    html: String,
    fetcher: Arc<dyn Fetcher>,
    max_token_bytes: Option<usize>,
    deadline: Duration,
) -> Result<Report, AnalyzeError> {
    let document = Document::new(html, host).with_token_limit(max_token_bytes);
    analyze_with_deadline(document, fetcher, deadline).await
}
