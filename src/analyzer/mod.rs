// src/analyzer/mod.rs
// =============================================================================
// This module contains the HTML analysis engine.
//
// Submodules:
// - scanner: turns the page text into tokens (every extractor rescans)
// - document: the page text + the URL it was fetched from
// - version, title, headings, links, login: one extractor per fact
// - report: the Report type returned to callers
// - engine: the Analyzer that runs everything once and caches the Report
//
// Every extractor is a plain function `fn(&Document) -> fact`; they do not
// share any state, so the order they run in does not matter. Only the link
// probing (in crate::probe) needs the output of the link extractor.
// =============================================================================

mod document;
mod engine;
mod headings;
mod links;
mod login;
mod report;
mod scanner;
mod title;
mod version;

pub use engine::analyze;
pub use report::Report;
