//! Document and content-area signal extractors.
//!
//! Each extractor is a pure function over a parsed HTML tree. Extractors
//! never fail: missing or malformed markup yields the signal's zero value.

use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

use crate::domain::models::{ContentLinks, Heading, HeadingAnalysis, ImageAnalysis, ImageDetail};

/// Headings are truncated to this many characters (plus an ellipsis)
const HEADING_TEXT_MAX: usize = 80;

/// At most this many example URLs are kept per link class
const LINK_SAMPLE_LIMIT: usize = 5;

/// Title-tag separators; everything after the first one is dropped
const TITLE_SEPARATORS: [char; 4] = ['|', '-', '–', '—'];

pub struct PageExtractor;

impl PageExtractor {
    pub fn extract_title_tag(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("title").unwrap());
        html.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn extract_meta_description(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='description']").unwrap());
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn extract_og_title(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[property='og:title']").unwrap());
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn extract_first_h1(html: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("h1").unwrap());
        html.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Resolve the page title, in preference order: the stored record title,
    /// the first H1, the Open Graph title, then the `<title>` tag with any
    /// site-name suffix stripped at the first separator.
    pub fn resolve_title(html: &Html, stored: Option<&str>) -> String {
        if let Some(title) = stored.map(str::trim).filter(|s| !s.is_empty()) {
            return title.to_string();
        }
        if let Some(h1) = Self::extract_first_h1(html) {
            return h1;
        }
        if let Some(og) = Self::extract_og_title(html) {
            return og;
        }
        Self::extract_title_tag(html)
            .map(|t| strip_site_suffix(&t))
            .unwrap_or_default()
    }

    /// Collect H1-H6 headings in document order, flagging keyword matches.
    pub fn extract_headings(html: &Html, keyword: &str) -> HeadingAnalysis {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

        let keyword = keyword.trim().to_lowercase();
        let mut analysis = HeadingAnalysis::default();

        for element in html.select(selector) {
            let text = element.text().collect::<String>().trim().to_string();
            if text.is_empty() {
                continue;
            }
            let tag = element.value().name().to_lowercase();
            let has_keyword = !keyword.is_empty() && text.to_lowercase().contains(&keyword);

            match tag.as_str() {
                "h1" => analysis.h1_count += 1,
                "h2" => analysis.h2_count += 1,
                _ => {}
            }
            if has_keyword {
                analysis.with_keyword += 1;
            }
            analysis.headings.push(Heading {
                tag,
                text: truncate_heading(&text),
                has_keyword,
            });
        }

        analysis
    }

    /// Scan `<img>` tags for alt coverage and keyword-bearing alt text.
    ///
    /// Data-URI sources are placeholders (lazy-load shims); they still count
    /// toward alt coverage but never toward keyword matches.
    pub fn extract_images(html: &Html, keyword: &str) -> ImageAnalysis {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("img").unwrap());

        let keyword = keyword.trim().to_lowercase();
        let mut analysis = ImageAnalysis::default();

        for element in html.select(selector) {
            let src = element.value().attr("src").unwrap_or("").trim().to_string();
            let alt = element.value().attr("alt").unwrap_or("").trim().to_string();
            let has_alt = !alt.is_empty();
            let is_placeholder = src.starts_with("data:");
            let has_keyword =
                !is_placeholder && !keyword.is_empty() && alt.to_lowercase().contains(&keyword);

            analysis.total += 1;
            if !has_alt {
                analysis.missing_alt += 1;
            }
            if has_keyword {
                analysis.with_keyword += 1;
            }
            analysis.details.push(ImageDetail {
                src,
                alt,
                has_alt,
                has_keyword,
                is_placeholder,
            });
        }

        analysis
    }

    /// Classify anchors as internal or external against the page's own host.
    ///
    /// Fragment-only, `javascript:`, `mailto:` and `tel:` links are excluded
    /// from both counts. Relative paths resolve against the base URL and
    /// therefore count as internal.
    pub fn extract_links(html: &Html, base: &Url) -> ContentLinks {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());

        let mut links = ContentLinks::default();

        for element in html.select(selector) {
            let href = element.value().attr("href").unwrap_or("").trim();

            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
                || href.starts_with("tel:")
            {
                continue;
            }

            let resolved = match base.join(href) {
                Ok(url) => url,
                Err(_) => continue,
            };
            if !matches!(resolved.scheme(), "http" | "https") {
                continue;
            }

            if resolved.host_str() == base.host_str() {
                links.internal += 1;
                if links.sample_internal_urls.len() < LINK_SAMPLE_LIMIT {
                    links.sample_internal_urls.push(resolved.to_string());
                }
            } else {
                links.external += 1;
                if links.sample_external_urls.len() < LINK_SAMPLE_LIMIT {
                    links.sample_external_urls.push(resolved.to_string());
                }
            }
        }

        links
    }
}

fn truncate_heading(text: &str) -> String {
    if text.chars().count() <= HEADING_TEXT_MAX {
        return text.to_string();
    }
    let truncated: String = text.chars().take(HEADING_TEXT_MAX).collect();
    format!("{}...", truncated)
}

fn strip_site_suffix(title: &str) -> String {
    title
        .split(&TITLE_SEPARATORS[..])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_title_prefers_stored_then_h1() {
        let html = Html::parse_document(
            r#"<html><head>
                <title>Buy Shoes Online | Example Store</title>
                <meta property="og:title" content="Buy Shoes Online">
            </head><body><h1>Buy Shoes</h1></body></html>"#,
        );

        assert_eq!(
            PageExtractor::resolve_title(&html, Some("Stored Title")),
            "Stored Title"
        );
        assert_eq!(PageExtractor::resolve_title(&html, None), "Buy Shoes");
        assert_eq!(PageExtractor::resolve_title(&html, Some("  ")), "Buy Shoes");
    }

    #[test]
    fn test_resolve_title_falls_back_to_og_then_title_tag() {
        let html = Html::parse_document(
            r#"<html><head>
                <title>Buy Shoes Online | Example Store</title>
                <meta property="og:title" content="Buy Shoes Online">
            </head><body></body></html>"#,
        );
        assert_eq!(PageExtractor::resolve_title(&html, None), "Buy Shoes Online");

        let html = Html::parse_document(
            "<html><head><title>Buy Shoes Online - Example Store</title></head><body></body></html>",
        );
        assert_eq!(PageExtractor::resolve_title(&html, None), "Buy Shoes Online");
    }

    #[test]
    fn test_extract_headings_counts_and_keyword_flags() {
        let html = Html::parse_document(
            r#"<html><body>
                <h1>Buy Running Shoes</h1>
                <h2>Why shoes matter</h2>
                <h2></h2>
                <h3>Care guide</h3>
            </body></html>"#,
        );
        let analysis = PageExtractor::extract_headings(&html, "shoes");

        assert_eq!(analysis.h1_count, 1);
        assert_eq!(analysis.h2_count, 1); // empty h2 skipped
        assert_eq!(analysis.headings.len(), 3);
        assert_eq!(analysis.with_keyword, 2);
        assert!(analysis.headings[0].has_keyword);
        assert!(!analysis.headings[2].has_keyword);
    }

    #[test]
    fn test_heading_truncation() {
        let long = "x".repeat(120);
        let html = Html::parse_document(&format!("<h2>{}</h2>", long));
        let analysis = PageExtractor::extract_headings(&html, "");
        assert_eq!(analysis.headings[0].text.chars().count(), 83);
        assert!(analysis.headings[0].text.ends_with("..."));
    }

    #[test]
    fn test_extract_images_alt_and_placeholder() {
        let html = Html::parse_document(
            r#"<html><body>
                <img src="shoes.jpg" alt="red shoes">
                <img src="banner.png" alt="">
                <img src="plain.png">
                <img src="data:image/gif;base64,R0lGOD" alt="shoes placeholder">
            </body></html>"#,
        );
        let analysis = PageExtractor::extract_images(&html, "shoes");

        assert_eq!(analysis.total, 4);
        assert_eq!(analysis.missing_alt, 2);
        // placeholder alt never counts toward keyword matches
        assert_eq!(analysis.with_keyword, 1);
        assert!(analysis.details[3].is_placeholder);
    }

    #[test]
    fn test_image_analysis_is_idempotent() {
        let html = Html::parse_document(
            r#"<img src="a.jpg" alt="one"><img src="b.jpg"><img src="c.jpg" alt="">"#,
        );
        let first = PageExtractor::extract_images(&html, "one");
        let second = PageExtractor::extract_images(&html, "one");
        assert_eq!(first.total, second.total);
        assert_eq!(first.missing_alt, second.missing_alt);
        assert_eq!(first.with_keyword, second.with_keyword);
    }

    #[test]
    fn test_link_classification_never_double_counts() {
        let base = Url::parse("https://example.com/page").unwrap();
        let html = Html::parse_document(
            r##"<html><body>
                <a href="/internal">in</a>
                <a href="https://example.com/other">in</a>
                <a href="https://other.org/">out</a>
                <a href="#section">frag</a>
                <a href="javascript:void(0)">js</a>
                <a href="mailto:x@example.com">mail</a>
                <a href="tel:+123">tel</a>
            </body></html>"##,
        );
        let links = PageExtractor::extract_links(&html, &base);

        let total_anchors = 7;
        let excluded = total_anchors - links.internal - links.external;
        assert_eq!(links.internal, 2);
        assert_eq!(links.external, 1);
        assert_eq!(excluded, 4);
        assert_eq!(links.sample_internal_urls.len(), 2);
        assert_eq!(links.sample_external_urls, vec!["https://other.org/"]);
    }

    #[test]
    fn test_relative_links_count_as_internal() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        let html = Html::parse_document(r#"<a href="sibling">s</a><a href="/root">r</a>"#);
        let links = PageExtractor::extract_links(&html, &base);
        assert_eq!(links.internal, 2);
        assert_eq!(links.external, 0);
    }
}
