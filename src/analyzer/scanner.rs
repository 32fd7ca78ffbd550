// src/analyzer/scanner.rs
// =============================================================================
// This module turns HTML text into a flat stream of tokens.
//
// We use html5ever's standalone tokenizer (the same tokenizer `scraper`
// is built on) but we never build a DOM. Every extractor calls `scan()` and
// walks the tokens from the beginning; scans share nothing. Comments are
// dropped.
//
// The tokenizer alone does not know that <title> or <script> hold raw text
// (normally the tree builder tells it), so our sink switches the tokenizer
// into the right raw-text state whenever one of those tags opens.
// =============================================================================

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Doctype, Tag, TagKind, Token as RawToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use tracing::trace;

use crate::error::ScanError;

/// One token of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal doctype content, e.g. `html PUBLIC "-//W3C//DTD HTML 4.01//EN"`
    Doctype(String),
    StartTag(StartTag),
    EndTag(String),
    /// A run of character data, entity references already decoded
    Text(String),
    /// A hard failure. Nothing follows it.
    Error(ScanError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercase tag name
    pub name: String,
    /// (lowercase name, value) pairs in document order
    pub attrs: Vec<(String, String)>,
}

impl StartTag {
    /// Returns the value of the first attribute called `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn size(&self) -> usize {
        self.name.len()
            + self
                .attrs
                .iter()
                .map(|(name, value)| name.len() + value.len())
                .sum::<usize>()
    }
}

/// A restartable token source over borrowed document text.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    text: &'a str,
    max_token_bytes: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            max_token_bytes: None,
        }
    }

    /// Any single token larger than `limit` bytes ends the scan with
    /// `Token::Error`.
    pub fn with_token_limit(mut self, limit: Option<usize>) -> Self {
        self.max_token_bytes = limit;
        self
    }

    /// Tokenizes the whole text from the start.
    pub fn scan(&self) -> std::vec::IntoIter<Token> {
        let sink = Collector {
            tokens: Vec::new(),
            text: String::new(),
            limit: self.max_token_bytes,
            failed: false,
        };

        let mut input = BufferQueue::new();
        input.push_back(StrTendril::from_slice(self.text));

        let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        // feed() only returns early for script handles, which our sink never asks for
        let _ = tokenizer.feed(&mut input);
        tokenizer.end();

        tokenizer.sink.tokens.into_iter()
    }

    /// Runs a full scan and reports the first hard failure, if any.
    pub fn validate(&self) -> Result<(), ScanError> {
        match self.scan().find_map(|token| match token {
            Token::Error(err) => Some(err),
            _ => None,
        }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// Receives raw html5ever tokens and turns them into our Token values.
struct Collector {
    tokens: Vec<Token>,
    // pending character data, flushed as one Text token
    text: String,
    limit: Option<usize>,
    failed: bool,
}

impl Collector {
    fn push(&mut self, token: Token, size: usize) {
        if self.failed {
            return;
        }
        if let Some(limit) = self.limit {
            if size > limit {
                self.tokens.push(Token::Error(ScanError::TokenTooLarge { size, limit }));
                self.failed = true;
                return;
            }
        }
        self.tokens.push(token);
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let size = text.len();
        self.push(Token::Text(text), size);
    }
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&mut self, token: RawToken, line_number: u64) -> TokenSinkResult<()> {
        if self.failed {
            return TokenSinkResult::Continue;
        }

        match token {
            RawToken::CharacterTokens(chars) => self.text.push_str(&chars),
            RawToken::NullCharacterToken => self.text.push('\u{FFFD}'),
            RawToken::TagToken(tag) => {
                self.flush_text();
                return self.process_tag(tag);
            }
            RawToken::DoctypeToken(doctype) => {
                self.flush_text();
                let literal = doctype_literal(&doctype);
                let size = literal.len();
                self.push(Token::Doctype(literal), size);
            }
            // comments only split the surrounding text
            RawToken::CommentToken(_) => self.flush_text(),
            RawToken::EOFToken => self.flush_text(),
            RawToken::ParseError(reason) => {
                trace!(line = line_number, %reason, "recoverable html parse error");
            }
        }

        TokenSinkResult::Continue
    }
}

impl Collector {
    fn process_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let raw_kind = raw_text_kind(&name);
                let start = StartTag {
                    name,
                    attrs: tag
                        .attrs
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect(),
                };
                let size = start.size();
                self.push(Token::StartTag(start), size);

                match raw_kind {
                    Some(kind) if !self.failed => TokenSinkResult::RawData(kind),
                    _ => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                let size = name.len();
                self.push(Token::EndTag(name), size);
                TokenSinkResult::Continue
            }
        }
    }
}

// Elements whose content is text rather than markup.
fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "title" | "textarea" => Some(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "script" => Some(RawKind::ScriptData),
        _ => None,
    }
}

// Rebuilds what followed `<!DOCTYPE ` in the source.
fn doctype_literal(doctype: &Doctype) -> String {
    let mut literal = doctype
        .name
        .as_ref()
        .map(|name| name.to_string())
        .unwrap_or_default();

    match (&doctype.public_id, &doctype.system_id) {
        (Some(public), Some(system)) => {
            literal.push_str(&format!(" PUBLIC \"{public}\" \"{system}\""));
        }
        (Some(public), None) => literal.push_str(&format!(" PUBLIC \"{public}\"")),
        (None, Some(system)) => literal.push_str(&format!(" SYSTEM \"{system}\"")),
        (None, None) => {}
    }

    literal
}
