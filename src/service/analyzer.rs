//! Analysis orchestration.
//!
//! Composes the content-area isolator and the signal extractors into one
//! `PageAnalysis` record: parse once, isolate, run the content-area
//! extractors against the isolated fragment and the technical extractors
//! against the full document, then assemble hints, recommendations, and
//! the score. All extractor outputs are collected before any hint is
//! emitted, so the output order is fixed regardless of extraction order.

use chrono::Utc;
use scraper::Html;
use url::Url;

use crate::domain::models::{PageAnalysis, PageRecord};
use crate::extractor::content_area::{self, ContentSource};
use crate::extractor::keyword::{analyze_keyword, opening_paragraph, visible_text};
use crate::extractor::page_extractor::PageExtractor;
use crate::extractor::structured_data::{detect_faq, detect_howto, technical_seo, SchemaScan};
use crate::service::recommendations::{self, RecommendationInput};
use crate::service::scoring::{self, ScoreInput};

mod hints;

/// Analyze one fetched page.
///
/// Pure: no I/O, no shared state, safe to run for many URLs in parallel.
/// The prior record (if any) contributes the stored title and the focus
/// keyword that drives the keyword-level checks.
pub fn analyze(html: &str, url: &Url, prior: Option<&PageRecord>) -> PageAnalysis {
    let document = Html::parse_document(html);

    let stored_title = prior.map(|p| p.title.as_str()).filter(|t| !t.trim().is_empty());
    let keyword = prior
        .map(|p| p.focus_keyword.trim().to_string())
        .unwrap_or_default();

    let title = PageExtractor::resolve_title(&document, stored_title);
    let description = PageExtractor::extract_meta_description(&document).unwrap_or_default();

    let area = content_area::isolate(&document);
    if area.source == ContentSource::FullDocument {
        log::debug!("[ANALYZE] no content container qualified for {}, scoring full document", url);
    }
    let content = Html::parse_fragment(&area.html);
    let content_text = visible_text(&content);

    let heading_analysis = PageExtractor::extract_headings(&content, &keyword);
    let keyword_analysis = analyze_keyword(&content_text, &keyword);
    let opening = opening_paragraph(&content_text, &keyword);
    let image_analysis = PageExtractor::extract_images(&content, &keyword);
    let content_links = PageExtractor::extract_links(&content, url);

    let scan = SchemaScan::new(html);
    let technical = technical_seo(&document, &scan);
    let faq = detect_faq(&document, &scan);
    let howto = detect_howto(&document, &scan);

    let hints = hints::build(&hints::HintInput {
        url,
        title: &title,
        description: &description,
        keyword: &keyword,
        headings: &heading_analysis,
        keyword_analysis: &keyword_analysis,
        opening: &opening,
        links: &content_links,
        technical: &technical,
        faq: &faq,
        howto: &howto,
    });

    let recommendations = recommendations::generate(&RecommendationInput {
        url,
        title: &title,
        description: &description,
        keyword: &keyword,
        headings: &heading_analysis,
        word_count: keyword_analysis.word_count,
        links: &content_links,
        images: &image_analysis,
        technical: &technical,
    });

    let score = scoring::score(&ScoreInput {
        title: &title,
        description: &description,
        headings: &heading_analysis,
        keyword: &keyword_analysis,
        opening: &opening,
        images: &image_analysis,
        links: &content_links,
        faq: &faq,
        technical: &technical,
    });

    log::debug!(
        "[ANALYZE] {} scored {}/100 ({})",
        url,
        score.value,
        score.grade.as_str()
    );

    PageAnalysis {
        title,
        description,
        focus_keyword: keyword,
        heading_analysis,
        keyword_analysis,
        image_analysis,
        content_links,
        opening_paragraph: opening,
        faq,
        howto,
        technical_seo: technical,
        score,
        hints,
        recommendations,
        analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Grade, KeywordStatus, ScoreCategory};

    fn record_with_keyword(url: &str, keyword: &str) -> PageRecord {
        let mut record = PageRecord::new(url, "");
        record.focus_keyword = keyword.to_string();
        record
    }

    /// 1000 visible words with the keyword appearing 12 times (~1.2%).
    fn shoes_page() -> String {
        let mut words: Vec<String> = (0..985).map(|i| format!("word{}", i)).collect();
        for i in 0..10 {
            words.insert(i * 90, "shoes".to_string());
        }
        // h1 text adds "Buy Shoes" (2 words, 1 occurrence), and the first
        // paragraph opens with the keyword.
        let body: String = words.join(" ");
        format!(
            r#"<html><head>
                <title>Buy Shoes Online | Example</title>
                <meta name="description" content="{}">
                <link rel="canonical" href="https://example.com/shoes">
            </head><body>
                <div class="entry">
                  <h1>Buy Shoes</h1>
                  <h2>Fit</h2>
                  <h2>Materials</h2>
                  <p>shoes first of all</p>
                  <p>{}</p>
                  <p>closing thoughts here</p>
                  <a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
                  <a href="https://authority.org/">ref</a>
                  <img src="pair.webp" alt="red shoes pair">
                </div>
            </body></html>"#,
            "d".repeat(155),
            body
        )
    }

    #[test]
    fn test_keyword_rich_page_gets_full_density_points() {
        let url = Url::parse("https://example.com/shoes").unwrap();
        let record = record_with_keyword("https://example.com/shoes", "shoes");
        let analysis = analyze(&shoes_page(), &url, Some(&record));

        assert_eq!(analysis.keyword_analysis.status, KeywordStatus::Good);
        assert!(
            analysis.keyword_analysis.density_percent >= 0.8
                && analysis.keyword_analysis.density_percent <= 2.5,
            "density was {}",
            analysis.keyword_analysis.density_percent
        );
        let density = analysis
            .score
            .category(ScoreCategory::KeywordDensity)
            .unwrap();
        assert_eq!(density.score, 15);
    }

    #[test]
    fn test_degraded_page_hints_and_breakdown() {
        let html = r#"<html><head><title>Untitled</title></head><body>
            <p>short</p>
            <img src="a.jpg"><img src="b.jpg"><img src="c.jpg">
        </body></html>"#;
        let url = Url::parse("https://example.com/bad").unwrap();
        let analysis = analyze(html, &url, None);

        assert!(analysis.hints.iter().any(|h| h.contains("❌ Missing H1")));
        assert!(analysis
            .hints
            .iter()
            .any(|h| h.contains("❌ Missing meta description")));
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("Add ONE H1 tag")));
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("alt text to 3 images")));
        assert_eq!(
            analysis.score.category(ScoreCategory::H1).unwrap().score,
            0
        );
        assert_eq!(
            analysis.score.category(ScoreCategory::Images).unwrap().score,
            0
        );
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let html = shoes_page();
        let url = Url::parse("https://example.com/shoes").unwrap();
        let record = record_with_keyword("https://example.com/shoes", "shoes");

        let a = analyze(&html, &url, Some(&record));
        let b = analyze(&html, &url, Some(&record));

        assert_eq!(a.hints, b.hints);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.score.value, b.score.value);
    }

    #[test]
    fn test_empty_document_degrades_to_zero_values() {
        let url = Url::parse("https://example.com/empty").unwrap();
        let analysis = analyze("", &url, None);

        assert_eq!(analysis.heading_analysis.h1_count, 0);
        assert_eq!(analysis.image_analysis.total, 0);
        assert_eq!(analysis.content_links.internal, 0);
        assert_eq!(analysis.score.grade, Grade::F);
    }

    #[test]
    fn test_title_resolution_prefers_stored_record() {
        let url = Url::parse("https://example.com/shoes").unwrap();
        let mut record = record_with_keyword("https://example.com/shoes", "shoes");
        record.title = "Stored Shoes Title".to_string();
        let analysis = analyze(&shoes_page(), &url, Some(&record));
        assert_eq!(analysis.title, "Stored Shoes Title");
    }

    #[test]
    fn test_opening_paragraph_found_in_isolated_content() {
        let url = Url::parse("https://example.com/shoes").unwrap();
        let record = record_with_keyword("https://example.com/shoes", "shoes");
        let analysis = analyze(&shoes_page(), &url, Some(&record));
        assert!(analysis.opening_paragraph.found);
        assert_eq!(
            analysis.score.category(ScoreCategory::OpeningParagraph).unwrap().score,
            10
        );
    }
}
