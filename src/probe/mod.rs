// src/probe/mod.rs
// =============================================================================
// This module checks whether links are alive.
//
// Submodules:
// - fetcher: the Fetcher trait and its reqwest implementation
// - prober: concurrent probing of many links with cancellation
// =============================================================================

mod fetcher;
mod prober;

pub use fetcher::{http_client, Fetcher, HttpFetcher};
pub use prober::{probe_links, ProbeStatus};
