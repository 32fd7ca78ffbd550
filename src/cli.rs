// src/cli.rs
// =============================================================================
// This file defines our command-line interface and configuration using the
// `clap` crate.
//
// Every option can also be set through an environment variable with the
// DETECTIVE_ prefix (clap's "env" feature), so the server can be configured
// entirely from the environment:
//
//   DETECTIVE_ADDR=0.0.0.0:8080 DETECTIVE_HTTP_TIMEOUT=10s detective serve
//
// Command-line flags win over environment variables, which win over defaults.
// =============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use url::Url;

use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "detective",
    version,
    about = "Analyze web pages: HTML version, title, headings, links and login forms",
    long_about = "detective downloads a web page and reports its HTML version, title, heading \
                  counts, internal/external links, how many of those links are inaccessible \
                  and whether the page has a login form."
)]
pub struct Cli {
    #[command(flatten)]
    pub logger: LoggerArgs,

    #[command(flatten)]
    pub http: HttpArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (POST /analyze-url)
    ///
    /// Example: detective serve --addr 127.0.0.1:8000
    Serve {
        /// Address to listen on
        #[arg(long, env = "DETECTIVE_ADDR", default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },

    /// Analyze a single page and print the report
    ///
    /// Example: detective analyze https://example.com --json
    Analyze {
        /// Page URL to analyze (e.g., https://example.com)
        url: Url,

        /// Output the report in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Settings of the HTTP client and of the analysis itself.
#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    /// Timeout of every outgoing request (page download and link probes)
    #[arg(long, env = "DETECTIVE_HTTP_TIMEOUT", default_value = "30s", value_parser = parse_duration)]
    pub http_timeout: Duration,

    /// How long to wait for link probes before reporting a partial count
    #[arg(long, env = "DETECTIVE_ANALYSIS_DEADLINE", default_value = "25s", value_parser = parse_duration)]
    pub analysis_deadline: Duration,

    /// Largest accepted single HTML token in bytes (0 = unlimited)
    #[arg(long, env = "DETECTIVE_MAX_TOKEN_BYTES", default_value_t = 0)]
    pub max_token_bytes: usize,
}

impl HttpArgs {
    pub fn token_limit(&self) -> Option<usize> {
        (self.max_token_bytes > 0).then_some(self.max_token_bytes)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoggerArgs {
    /// Install a logger at all
    #[arg(long = "logger-enabled", env = "DETECTIVE_LOGGER_ENABLED", default_value_t = true, action = ArgAction::Set)]
    pub enabled: bool,

    /// trace, debug, info, warn or error (anything else means error)
    #[arg(long = "logger-level", env = "DETECTIVE_LOGGER_LEVEL", default_value = "info")]
    pub level: String,

    /// Human readable lines instead of JSON
    #[arg(long = "logger-pretty", env = "DETECTIVE_LOGGER_PRETTY", default_value_t = false, action = ArgAction::Set)]
    pub pretty: bool,

    /// Also write logs to <path>/<prefix>.log
    #[arg(
        long = "logger-file-redirect-enabled",
        env = "DETECTIVE_LOGGER_FILE_REDIRECT_ENABLED",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub file_redirect_enabled: bool,

    #[arg(
        long = "logger-file-redirect-path",
        env = "DETECTIVE_LOGGER_FILE_REDIRECT_PATH",
        default_value = "/var/log"
    )]
    pub file_redirect_path: String,

    #[arg(
        long = "logger-file-redirect-prefix",
        env = "DETECTIVE_LOGGER_FILE_REDIRECT_PREFIX",
        default_value = "detective"
    )]
    pub file_redirect_prefix: String,
}

/// Parses "30s", "500ms", "2m" or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, ConfigError> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(raw.to_string()))?;

    match unit {
        "" | "s" => Ok(Duration::from_secs(value)),
        "ms" => Ok(Duration::from_millis(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        _ => Err(ConfigError::InvalidDuration(raw.to_string())),
    }
}
