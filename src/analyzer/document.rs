// src/analyzer/document.rs
// The immutable input of one analysis: page text plus the URL it came from.

use url::Url;

use super::scanner::Scanner;

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    host: Url,
    max_token_bytes: Option<usize>,
}

impl Document {
    pub fn new(text: impl Into<String>, host: Url) -> Self {
        Self {
            text: text.into(),
            host,
            max_token_bytes: None,
        }
    }

    /// Caps the size of any single token; `None` means unlimited.
    pub fn with_token_limit(mut self, limit: Option<usize>) -> Self {
        self.max_token_bytes = limit;
        self
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// A fresh scanner positioned at the start of the text.
    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(&self.text).with_token_limit(self.max_token_bytes)
    }
}

#[cfg(test)]
pub(crate) fn test_document(html: &str) -> Document {
    Document::new(html, Url::parse("https://example.com/").unwrap())
}
