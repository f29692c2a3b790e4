//! Content area isolation.
//!
//! Finds the DOM subtree most likely to hold the page's primary readable
//! content, so prose-level checks (keyword density, link counting, image
//! analysis) don't score navigation and footer boilerplate.
//!
//! The first H1 anchors the search: its ancestors are walked upward until a
//! container has substantial content (at least 3 paragraphs and 2 headings),
//! skipping site-wide wrappers. Pages without an H1 fall back to common
//! content containers, then to the full document.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Upper bound on the ancestor walk from the H1
const MAX_ANCESTOR_HOPS: usize = 10;

/// Class/id fragments that mark a container as a site-wide wrapper
const WRAPPER_MARKERS: [&str; 3] = ["site", "wrapper", "page"];

/// Fallback container selectors, tried in order when no H1 exists
const FALLBACK_CONTAINERS: [&str; 7] = [
    "article",
    "main",
    ".entry-content",
    ".post-content",
    ".article-content",
    ".content",
    "#content",
];

const MIN_PARAGRAPHS: usize = 3;
const MIN_HEADINGS: usize = 2;

/// How the content area was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// Qualifying ancestor of the first H1
    PrimaryHeading,
    /// One of the fallback container selectors matched
    ContainerFallback,
    /// Nothing qualified; the whole document is used
    FullDocument,
}

/// The isolated content region, re-parseable as an HTML fragment.
#[derive(Debug, Clone)]
pub struct ContentArea {
    pub html: String,
    pub source: ContentSource,
}

fn h1_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("h1").unwrap())
}

fn paragraph_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("p").unwrap())
}

fn heading_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap())
}

fn fallback_selectors() -> &'static Vec<Selector> {
    static SELECTORS: OnceLock<Vec<Selector>> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        FALLBACK_CONTAINERS
            .iter()
            .map(|s| Selector::parse(s).unwrap())
            .collect()
    })
}

/// Isolate the primary content region of a parsed document.
///
/// Never fails: malformed markup parses leniently upstream, and the full
/// document is the terminal fallback.
pub fn isolate(document: &Html) -> ContentArea {
    if let Some(h1) = document.select(h1_selector()).next() {
        // Only the first H1 anchors the walk.
        let mut hops = 0;
        let mut node = h1.parent();
        while let Some(current) = node {
            if let Some(element) = ElementRef::wrap(current) {
                if element.value().name() == "body" {
                    break;
                }
                if hops >= MAX_ANCESTOR_HOPS {
                    break;
                }
                hops += 1;
                if !is_site_wrapper(&element) && has_substantial_content(&element) {
                    log::debug!(
                        "[CONTENT] isolated <{}> after {} hop(s) from h1",
                        element.value().name(),
                        hops
                    );
                    return ContentArea {
                        html: element.html(),
                        source: ContentSource::PrimaryHeading,
                    };
                }
            }
            node = current.parent();
        }
        return full_document(document);
    }

    for selector in fallback_selectors() {
        if let Some(element) = document.select(selector).next() {
            return ContentArea {
                html: element.html(),
                source: ContentSource::ContainerFallback,
            };
        }
    }

    full_document(document)
}

fn full_document(document: &Html) -> ContentArea {
    ContentArea {
        html: document.root_element().html(),
        source: ContentSource::FullDocument,
    }
}

fn is_site_wrapper(element: &ElementRef) -> bool {
    let class = element.value().attr("class").unwrap_or("").to_lowercase();
    let id = element.value().attr("id").unwrap_or("").to_lowercase();
    WRAPPER_MARKERS
        .iter()
        .any(|marker| class.contains(marker) || id.contains(marker))
}

fn has_substantial_content(element: &ElementRef) -> bool {
    element.select(paragraph_selector()).count() >= MIN_PARAGRAPHS
        && element.select(heading_selector()).count() >= MIN_HEADINGS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_body(extra_attrs: &str) -> String {
        format!(
            r#"<html><body>
                <div class="site-wrapper">
                  <nav><a href="/a">A</a><a href="/b">B</a></nav>
                  <div {extra_attrs}>
                    <h1>Main Title</h1>
                    <h2>Section</h2>
                    <p>One paragraph of text.</p>
                    <p>Another paragraph.</p>
                    <p>A third paragraph.</p>
                  </div>
                  <footer><p>Footer boilerplate</p></footer>
                </div>
            </body></html>"#
        )
    }

    #[test]
    fn test_isolates_h1_ancestor_with_substantial_content() {
        let html = article_body(r#"class="entry""#);
        let document = Html::parse_document(&html);
        let area = isolate(&document);

        assert_eq!(area.source, ContentSource::PrimaryHeading);
        assert!(area.html.contains("Main Title"));
        assert!(!area.html.contains("Footer boilerplate"));
    }

    #[test]
    fn test_skips_site_wrapper_containers() {
        // The only qualifying ancestor carries a wrapper class, so the walk
        // passes through it and ends at body: full document.
        let html = r#"<html><body>
            <div class="page-wrapper">
              <h1>Main Title</h1>
              <h2>Section</h2>
              <p>a</p><p>b</p><p>c</p>
            </div>
            <footer><p>Footer boilerplate</p></footer>
        </body></html>"#;
        let document = Html::parse_document(html);
        let area = isolate(&document);

        assert_eq!(area.source, ContentSource::FullDocument);
        assert!(area.html.contains("Footer boilerplate"));
    }

    #[test]
    fn test_falls_back_to_article_without_h1() {
        let html = r#"<html><body>
            <nav><a href="/x">x</a></nav>
            <article><h2>Only H2</h2><p>Body text.</p></article>
        </body></html>"#;
        let document = Html::parse_document(html);
        let area = isolate(&document);

        assert_eq!(area.source, ContentSource::ContainerFallback);
        assert!(area.html.contains("Only H2"));
        assert!(!area.html.contains("nav"));
    }

    #[test]
    fn test_full_document_when_nothing_matches() {
        let html = "<html><body><p>Just a paragraph.</p></body></html>";
        let document = Html::parse_document(html);
        let area = isolate(&document);

        assert_eq!(area.source, ContentSource::FullDocument);
        assert!(area.html.contains("Just a paragraph."));
    }

    #[test]
    fn test_only_first_h1_is_anchor() {
        let html = r#"<html><body>
            <div class="hero"><h1>Banner H1</h1></div>
            <div class="entry">
              <h1>Second H1</h1>
              <h2>Section</h2>
              <p>a</p><p>b</p><p>c</p>
            </div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let area = isolate(&document);

        // The hero div has no substantial content, so the walk from the
        // first H1 climbs to body and gives up.
        assert_eq!(area.source, ContentSource::FullDocument);
    }

    #[test]
    fn test_malformed_html_does_not_abort() {
        let html = "<html><body><div><h1>Broken <p>unclosed <h2>Heading";
        let document = Html::parse_document(html);
        let area = isolate(&document);
        assert!(!area.html.is_empty());
    }
}
