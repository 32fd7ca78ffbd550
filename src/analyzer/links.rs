// src/analyzer/links.rs
// =============================================================================
// This module finds the links of a page and sorts them into internal,
// external and rejected.
//
// For every <a> tag with an href attribute:
// 1. empty href                          -> rejected (empty)
// 2. href starting with '#'              -> rejected (fragment / pointer link)
// 3. href that is not a valid reference  -> rejected (parse failure)
// 4. explicit scheme without "http"      -> rejected (mailto:, javascript:, ...)
// 5. no host, or a host that contains the page's host -> internal
// 6. anything else                       -> external
//
// Internal links are resolved to absolute URLs against the page URL.
//
// The host test is a substring test on purpose: blog.example.com counts as
// internal for a page on example.com.
// =============================================================================

use tracing::{debug, info};
use url::Url;

use super::document::Document;
use super::scanner::Token;

/// Why an href was left out of the link counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    Fragment,
    ParseFailure,
    NonHttpScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLink {
    /// Absolute URL, resolved against the page URL
    Internal(Url),
    External(Url),
    Rejected(RejectReason),
}

/// The usable links of a page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    pub internal: Vec<Url>,
    pub external: Vec<Url>,
}

impl LinkSet {
    /// Every link that should be probed. Duplicates are kept.
    pub fn probe_targets(&self) -> Vec<Url> {
        self.external
            .iter()
            .chain(self.internal.iter())
            .cloned()
            .collect()
    }
}

/// Classifies every href of every <a> tag. Anchors without href are skipped.
pub fn classify_links(document: &Document) -> Vec<ClassifiedLink> {
    let host = document.host();

    document
        .scanner()
        .scan()
        .filter_map(|token| match token {
            Token::StartTag(tag) if tag.name == "a" => {
                tag.attr("href").map(|href| classify_href(host, href))
            }
            _ => None,
        })
        .collect()
}

/// Collects the internal and external links of a document.
pub fn extract_links(document: &Document) -> LinkSet {
    info!("parsing links in html document");

    let mut links = LinkSet::default();
    for link in classify_links(document) {
        match link {
            ClassifiedLink::Internal(url) => {
                info!(url = %url, "marked as internal");
                links.internal.push(url);
            }
            ClassifiedLink::External(url) => {
                info!(url = %url, "marked as external");
                links.external.push(url);
            }
            ClassifiedLink::Rejected(_) => {}
        }
    }
    links
}

/// Classifies a single href value found on the page at `host`.
pub fn classify_href(host: &Url, href: &str) -> ClassifiedLink {
    if href.is_empty() {
        debug!(href, "url ignored because it was empty");
        return ClassifiedLink::Rejected(RejectReason::Empty);
    }
    if href.starts_with('#') {
        debug!(href, "url ignored because it was a pointer");
        return ClassifiedLink::Rejected(RejectReason::Fragment);
    }

    let reference = href.trim();
    match Url::parse(reference) {
        // absolute reference with its own scheme
        Ok(url) => {
            if !url.scheme().contains("http") {
                debug!(href, scheme = url.scheme(), "url ignored, bad scheme");
                return ClassifiedLink::Rejected(RejectReason::NonHttpScheme);
            }
            if is_internal(host, &url) {
                ClassifiedLink::Internal(url)
            } else {
                ClassifiedLink::External(url)
            }
        }
        // relative reference: path-only, or protocol-relative ("//host/path")
        Err(url::ParseError::RelativeUrlWithoutBase) => match host.join(reference) {
            Ok(resolved) => {
                if !has_authority(reference) || is_internal(host, &resolved) {
                    ClassifiedLink::Internal(resolved)
                } else {
                    ClassifiedLink::External(resolved)
                }
            }
            Err(e) => {
                debug!(href, error = %e, "url ignored, could not parse url");
                ClassifiedLink::Rejected(RejectReason::ParseFailure)
            }
        },
        Err(e) => {
            debug!(href, error = %e, "url ignored, could not parse url");
            ClassifiedLink::Rejected(RejectReason::ParseFailure)
        }
    }
}

fn has_authority(reference: &str) -> bool {
    reference.starts_with("//") || reference.starts_with("\\\\")
}

fn is_internal(host: &Url, url: &Url) -> bool {
    match authority(url) {
        None => true,
        Some(link_host) => link_host.contains(&authority(host).unwrap_or_default()),
    }
}

// Lowercase host plus the port when one is written explicitly.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    fn doc(html: &str) -> Document {
        Document::new(html, host())
    }

    #[test]
    fn test_mixed_page_counts() {
        let html = r##"
            <a href="/contact">Contact</a>
            <a href="https://example.com/about">About</a>
            <a href="https://rust-lang.org">Rust</a>
            <a href="#section">Jump</a>
            <a href="">Nothing</a>
            <a name="anchor">No href</a>
        "##;
        let links = extract_links(&doc(html));
        assert_eq!(links.internal.len(), 2);
        assert_eq!(links.external.len(), 1);
    }

    #[test]
    fn test_anchor_without_href_is_not_classified() {
        let classified = classify_links(&doc(r#"<a name="top">Top</a><a id="x"></a>"#));
        assert!(classified.is_empty());
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            classify_href(&host(), ""),
            ClassifiedLink::Rejected(RejectReason::Empty)
        );
        assert_eq!(
            classify_href(&host(), "#top"),
            ClassifiedLink::Rejected(RejectReason::Fragment)
        );
        assert_eq!(
            classify_href(&host(), "mailto:test@example.com"),
            ClassifiedLink::Rejected(RejectReason::NonHttpScheme)
        );
        assert_eq!(
            classify_href(&host(), "javascript:void(0)"),
            ClassifiedLink::Rejected(RejectReason::NonHttpScheme)
        );
        assert_eq!(
            classify_href(&host(), "http://[::1"),
            ClassifiedLink::Rejected(RejectReason::ParseFailure)
        );
    }

    #[test]
    fn test_relative_links_resolve_against_host() {
        assert_eq!(
            classify_href(&host(), "/docs"),
            ClassifiedLink::Internal(Url::parse("https://example.com/docs").unwrap())
        );
        assert_eq!(
            classify_href(&host(), "contact-us"),
            ClassifiedLink::Internal(Url::parse("https://example.com/blog/contact-us").unwrap())
        );
        assert_eq!(
            classify_href(&host(), "  ../about  "),
            ClassifiedLink::Internal(Url::parse("https://example.com/about").unwrap())
        );
    }

    #[test]
    fn test_subdomain_and_case_count_as_internal() {
        assert!(matches!(
            classify_href(&host(), "https://blog.example.com/x"),
            ClassifiedLink::Internal(_)
        ));
        assert!(matches!(
            classify_href(&host(), "HTTPS://EXAMPLE.COM/Upper"),
            ClassifiedLink::Internal(_)
        ));
    }

    #[test]
    fn test_protocol_relative_links() {
        assert_eq!(
            classify_href(&host(), "//cdn.other.org/lib.js"),
            ClassifiedLink::External(Url::parse("https://cdn.other.org/lib.js").unwrap())
        );
        assert!(matches!(
            classify_href(&host(), "//example.com/x"),
            ClassifiedLink::Internal(_)
        ));
    }

    #[test]
    fn test_port_distinguishes_hosts() {
        let host = Url::parse("http://127.0.0.1:40001/").unwrap();
        assert!(matches!(
            classify_href(&host, "http://127.0.0.1:40001/a"),
            ClassifiedLink::Internal(_)
        ));
        assert!(matches!(
            classify_href(&host, "http://127.0.0.1:40002/a"),
            ClassifiedLink::External(_)
        ));
    }

    #[test]
    fn test_probe_targets_keep_duplicates() {
        let html = r#"<a href="/a">1</a><a href="/a">2</a><a href="https://other.org">3</a>"#;
        let links = extract_links(&doc(html));
        assert_eq!(links.probe_targets().len(), 3);
    }
}
