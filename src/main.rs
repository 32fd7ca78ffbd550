// src/main.rs
// =============================================================================
// This is the entry point of the detective application.
//
// What happens here:
// 1. Parse command-line arguments (and DETECTIVE_* environment variables)
// 2. Install the logger
// 3. Dispatch to the chosen subcommand (serve or analyze)
// 4. Exit with proper code (0 = success, 1 = inaccessible links, 2 = error)
// =============================================================================

mod analyzer;      // src/analyzer/ - the HTML analysis engine
mod cli;           // src/cli.rs - command-line parsing and configuration
mod error;         // src/error.rs - error types
mod logging;       // src/logging.rs - tracing subscriber setup
mod page;          // src/page.rs - downloading the page to analyze
mod probe;         // src/probe/ - link accessibility checks
mod server;        // src/server/ - the HTTP service

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use url::Url;

use analyzer::Report;
use cli::{Cli, Commands, HttpArgs};
use probe::{Fetcher, HttpFetcher, ProbeStatus};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "detective failed");
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = done, every link accessible
//   Ok(1) = analysis done, some links inaccessible
//   Err   = anything went wrong
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(&cli.logger)?;

    match cli.command {
        Commands::Serve { addr } => {
            let state = server::AppState::from_config(&cli.http)?;
            server::serve(addr, state).await?;
            Ok(0)
        }
        Commands::Analyze { url, json } => handle_analyze(url, json, &cli.http).await,
    }
}

// Handles the 'analyze' subcommand: fetch, analyze, print.
async fn handle_analyze(url: Url, json: bool, config: &HttpArgs) -> Result<i32> {
    let client = probe::http_client(config.http_timeout)?;
    let html = page::fetch_page(&client, &url).await?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(client));
    let report = analyzer::analyze(
        url.clone(),
        html,
        fetcher,
        config.token_limit(),
        config.analysis_deadline,
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&url, &report);
    }

    if report.inaccessible_links_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the report as a human-readable table in the terminal
fn print_table(url: &Url, report: &Report) {
    let headings = &report.headings_count;
    let rows = [
        ("URL", url.to_string()),
        ("HTML version", report.html_version.clone()),
        ("Page title", report.page_title.clone()),
        (
            "Headings",
            format!(
                "h1: {}  h2: {}  h3: {}  h4: {}  h5: {}  h6: {}",
                headings.h1, headings.h2, headings.h3, headings.h4, headings.h5, headings.h6
            ),
        ),
        ("Internal links", report.links_count.internal.to_string()),
        ("External links", report.links_count.external.to_string()),
        ("Inaccessible links", inaccessible_display(report)),
        (
            "Login form",
            if report.has_login_form { "Yes" } else { "No" }.to_string(),
        ),
    ];

    println!("{}", "=".repeat(80));
    for (label, value) in rows {
        println!("{:<20} {}", label, value);
    }
    println!("{}", "=".repeat(80));
}

fn inaccessible_display(report: &Report) -> String {
    match report.probe_status {
        ProbeStatus::Complete => report.inaccessible_links_count.to_string(),
        ProbeStatus::Cancelled => format!(
            "{} (partial: probing stopped at the deadline)",
            report.inaccessible_links_count
        ),
    }
}
