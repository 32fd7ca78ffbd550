// src/analyzer/version.rs
// =============================================================================
// Detects the HTML version declared by the document's doctype.
//
// The table below follows the W3C list of recommended doctypes:
// https://www.w3.org/QA/2002/04/valid-dtd-list.html
//
// Matching is a case-insensitive substring test, tried in table order. The
// last entry ("HTML") matches almost any doctype, so it must stay last.
// =============================================================================

use tracing::warn;

use super::document::Document;
use super::scanner::Token;

pub const UNKNOWN_VERSION: &str = "Unknown HTML Version";

// (version label, uppercase matcher)
const DOCTYPES: [(&str, &str); 8] = [
    ("HTML 4.01 Strict", r#""-//W3C//DTD HTML 4.01//EN""#),
    ("HTML 4.01 Transitional", r#""-//W3C//DTD HTML 4.01 TRANSITIONAL//EN""#),
    ("HTML 4.01 Frameset", r#""-//W3C//DTD HTML 4.01 FRAMESET//EN""#),
    ("XHTML 1.0 Strict", r#""-//W3C//DTD XHTML 1.0 STRICT//EN"#),
    ("XHTML 1.0 Transitional", r#""-//W3C//DTD XHTML 1.0 TRANSITIONAL//EN""#),
    ("XHTML 1.0 Frameset", r#""-//W3C//DTD XHTML 1.0 FRAMESET//EN""#),
    ("XHTML 1.1", r#""-//W3C//DTD XHTML 1.1//EN""#),
    ("HTML 5", "HTML"),
];

/// Returns the label of the first known doctype found, or
/// "Unknown HTML Version".
pub fn html_version(document: &Document) -> &'static str {
    for token in document.scanner().scan() {
        if let Token::Doctype(literal) = token {
            if let Some(version) = classify_doctype(&literal) {
                return version;
            }
        }
    }

    warn!("html version not found");
    UNKNOWN_VERSION
}

fn classify_doctype(literal: &str) -> Option<&'static str> {
    let upper = literal.to_uppercase();
    DOCTYPES
        .iter()
        .find(|(_, matcher)| upper.contains(matcher))
        .map(|(version, _)| *version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::document::test_document;

    #[test]
    fn test_known_versions() {
        let cases = [
            ("HTML 5", "<!DOCTYPE HTML>"),
            ("HTML 5", "<!doctype html><html></html>"),
            (
                "HTML 4.01 Strict",
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN">"#,
            ),
            (
                "HTML 4.01 Transitional",
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#,
            ),
            (
                "HTML 4.01 Frameset",
                r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN">"#,
            ),
            (
                "XHTML 1.0 Strict",
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN">"#,
            ),
            (
                "XHTML 1.0 Transitional",
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN">"#,
            ),
            (
                "XHTML 1.0 Frameset",
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN">"#,
            ),
            (
                "XHTML 1.1",
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN">"#,
            ),
        ];

        for (expected, html) in cases {
            assert_eq!(html_version(&test_document(html)), expected, "doctype: {html}");
        }
    }

    #[test]
    fn test_system_identifier_does_not_shadow_public() {
        let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#;
        assert_eq!(html_version(&test_document(html)), "XHTML 1.0 Strict");
    }

    #[test]
    fn test_missing_doctype_is_unknown() {
        let doc = test_document("<html><head></head></html>");
        assert_eq!(html_version(&doc), UNKNOWN_VERSION);
    }

    #[test]
    fn test_unrecognized_doctype_is_unknown() {
        let doc = test_document("<!DOCTYPE foo>");
        assert_eq!(html_version(&doc), UNKNOWN_VERSION);
    }
}
