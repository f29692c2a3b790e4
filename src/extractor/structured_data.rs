//! Structured-data and technical tag extractors.
//!
//! Schema detection operates on a whitespace-stripped, lowercased copy of
//! the raw document so `"@type": "FAQPage"` and `"@type":"FAQPage"` both
//! match. Tag-level signals (canonical, robots, Open Graph, Twitter, image
//! formats) come from the parsed tree.

use scraper::{Html, Selector};
use std::sync::OnceLock;

use crate::domain::models::{FaqAnalysis, HowtoAnalysis, TechnicalSeo};
use crate::extractor::keyword::visible_text;

/// FAQ heading markers (lowercase)
const FAQ_HEADING_MARKERS: [&str; 3] = ["faq", "frequently asked", "common questions"];

/// HowTo heading markers (lowercase)
const HOWTO_HEADING_MARKERS: [&str; 4] = ["how to", "guide", "tutorial", "steps"];

/// Minimum question-shaped elements for the FAQ heuristic
const FAQ_MIN_QUESTIONS: usize = 3;

/// Pre-scanned JSON-LD signal source: the raw document lowercased with all
/// whitespace removed, computed once per analysis.
pub struct SchemaScan {
    compact: String,
}

impl SchemaScan {
    pub fn new(raw_html: &str) -> Self {
        let compact = raw_html
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        Self { compact }
    }

    /// True when a JSON-LD `"@type":"<ty>"` declaration is present.
    pub fn has_type(&self, ty: &str) -> bool {
        self.compact
            .contains(&format!("\"@type\":\"{}\"", ty.to_lowercase()))
    }

    /// Number of `"@type"` declarations in the document.
    pub fn type_count(&self) -> usize {
        self.compact.matches("\"@type\":").count()
    }

    fn question_type_count(&self) -> usize {
        self.compact.matches("\"@type\":\"question\"").count()
    }
}

/// Detect FAQ content: FAQPage/Question structured data first (highest
/// confidence), then a heading/question-mark heuristic.
pub fn detect_faq(html: &Html, scan: &SchemaScan) -> FaqAnalysis {
    if scan.has_type("FAQPage") || scan.has_type("Question") {
        return FaqAnalysis {
            detected: true,
            via_schema: true,
            question_count: scan.question_type_count(),
        };
    }

    static HEADING: OnceLock<Selector> = OnceLock::new();
    let heading = HEADING.get_or_init(|| Selector::parse("h2, h3, h4").unwrap());

    let has_faq_heading = html.select(heading).any(|el| {
        let text = el.text().collect::<String>().to_lowercase();
        FAQ_HEADING_MARKERS.iter().any(|m| text.contains(m))
    });

    static QUESTION: OnceLock<Selector> = OnceLock::new();
    let question = QUESTION.get_or_init(|| Selector::parse("h2, h3, h4, dt, strong").unwrap());

    let question_count = html
        .select(question)
        .filter(|el| {
            el.text()
                .collect::<String>()
                .trim()
                .ends_with('?')
        })
        .count();

    FaqAnalysis {
        detected: has_faq_heading || question_count >= FAQ_MIN_QUESTIONS,
        via_schema: false,
        question_count,
    }
}

/// Detect HowTo content: HowTo structured data first, then a heading marker
/// co-occurring with a numbered list or literal "step N" text.
pub fn detect_howto(html: &Html, scan: &SchemaScan) -> HowtoAnalysis {
    if scan.has_type("HowTo") {
        return HowtoAnalysis {
            detected: true,
            via_schema: true,
        };
    }

    static HEADING: OnceLock<Selector> = OnceLock::new();
    let heading = HEADING.get_or_init(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

    let has_howto_heading = html.select(heading).any(|el| {
        let text = el.text().collect::<String>().to_lowercase();
        HOWTO_HEADING_MARKERS.iter().any(|m| text.contains(m))
    });
    if !has_howto_heading {
        return HowtoAnalysis::default();
    }

    static OL: OnceLock<Selector> = OnceLock::new();
    let ol = OL.get_or_init(|| Selector::parse("ol").unwrap());

    let has_numbered_list = html.select(ol).next().is_some();
    let has_step_text = has_step_pattern(&visible_text(html));

    HowtoAnalysis {
        detected: has_numbered_list || has_step_text,
        via_schema: false,
    }
}

/// Literal "step <digit>" occurrence, e.g. "Step 1" or "step 3:".
fn has_step_pattern(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.match_indices("step ").any(|(idx, _)| {
        lower[idx + 5..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    })
}

/// Document-level technical tag extraction.
pub fn technical_seo(html: &Html, scan: &SchemaScan) -> TechnicalSeo {
    static CANONICAL: OnceLock<Selector> = OnceLock::new();
    let canonical_sel = CANONICAL.get_or_init(|| Selector::parse("link[rel='canonical']").unwrap());

    static ROBOTS: OnceLock<Selector> = OnceLock::new();
    let robots_sel = ROBOTS.get_or_init(|| Selector::parse("meta[name='robots']").unwrap());

    static OG: OnceLock<Selector> = OnceLock::new();
    let og_sel = OG.get_or_init(|| Selector::parse("meta[property^='og:']").unwrap());

    static TWITTER: OnceLock<Selector> = OnceLock::new();
    let twitter_sel = TWITTER.get_or_init(|| Selector::parse("meta[name^='twitter:']").unwrap());

    static IMG: OnceLock<Selector> = OnceLock::new();
    let img_sel = IMG.get_or_init(|| Selector::parse("img[src]").unwrap());

    let canonical = html
        .select(canonical_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let robots = html
        .select(robots_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut webp_images = 0;
    let mut legacy_images = 0;
    let mut total_images = 0;
    for element in html.select(img_sel) {
        let src = element.value().attr("src").unwrap_or("").trim();
        if src.is_empty() {
            continue;
        }
        total_images += 1;
        // Ignore query strings when sniffing the extension
        let path = src.split('?').next().unwrap_or("").to_lowercase();
        if path.ends_with(".webp") {
            webp_images += 1;
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") || path.ends_with(".png") {
            legacy_images += 1;
        }
    }

    TechnicalSeo {
        canonical,
        robots,
        schema_types: scan.type_count(),
        og_tags: html.select(og_sel).count(),
        twitter_tags: html.select(twitter_sel).count(),
        webp_images,
        legacy_images,
        total_images,
    }
}
