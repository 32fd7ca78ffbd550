// src/analyzer/title.rs
// Reads the page title: the text right after the first <title> tag.

use tracing::warn;

use super::document::Document;
use super::scanner::Token;

pub const EMPTY_TITLE: &str = "Empty Page Title";

pub fn page_title(document: &Document) -> String {
    let mut tokens = document.scanner().scan();

    while let Some(token) = tokens.next() {
        if !matches!(&token, Token::StartTag(tag) if tag.name == "title") {
            continue;
        }
        // only the very next token counts
        return match tokens.next() {
            Some(Token::Text(text)) if !text.is_empty() => text,
            _ => {
                warn!("page title is empty");
                EMPTY_TITLE.to_string()
            }
        };
    }

    warn!("could not find page title");
    EMPTY_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::document::test_document;

    #[test]
    fn test_title_is_filled() {
        assert_eq!(page_title(&test_document("<title>Test Title</title>")), "Test Title");
    }

    #[test]
    fn test_title_has_no_value() {
        assert_eq!(page_title(&test_document("<title></title>")), EMPTY_TITLE);
    }

    #[test]
    fn test_title_does_not_exist() {
        let doc = test_document("<p>simple paragraph</p>");
        assert_eq!(page_title(&doc), EMPTY_TITLE);
    }

    #[test]
    fn test_first_title_wins() {
        let doc = test_document("<head><title>First</title></head><svg><title>Second</title></svg>");
        assert_eq!(page_title(&doc), "First");
    }

    #[test]
    fn test_title_entities_are_decoded() {
        let doc = test_document("<title>Tom &amp; Jerry</title>");
        assert_eq!(page_title(&doc), "Tom & Jerry");
    }
}
