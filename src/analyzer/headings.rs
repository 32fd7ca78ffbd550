// src/analyzer/headings.rs
// Counts <h1>..<h6> opening tags. The whole tag name has to match, so
// <header> and <hgroup> are never counted.

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::scanner::Token;

/// Number of headings per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingsCount {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

pub fn headings_count(document: &Document) -> HeadingsCount {
    let mut headings = HeadingsCount::default();

    for token in document.scanner().scan() {
        let Token::StartTag(tag) = token else {
            continue;
        };
        match tag.name.as_str() {
            "h1" => headings.h1 += 1,
            "h2" => headings.h2 += 1,
            "h3" => headings.h3 += 1,
            "h4" => headings.h4 += 1,
            "h5" => headings.h5 += 1,
            "h6" => headings.h6 += 1,
            _ => {}
        }
    }

    headings
}
