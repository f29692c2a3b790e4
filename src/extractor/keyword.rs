//! Prose-level keyword checks: density and opening-paragraph presence.
//!
//! Both operate on the visible text of the isolated content area, with
//! script/style blocks stripped. Occurrence counting is a raw
//! case-insensitive substring count, not a word-boundary match; the
//! recommendation thresholds were tuned against that looser behavior.

use scraper::{node::Node, ElementRef, Html};

use crate::domain::models::{KeywordAnalysis, KeywordStatus, OpeningParagraph};

/// Density below this is "low" (percent)
const DENSITY_LOW: f64 = 0.5;

/// Density above this is "high" (percent)
const DENSITY_HIGH: f64 = 3.0;

/// Words considered part of the opening paragraph
const OPENING_WORD_LIMIT: usize = 100;

/// Extract the visible text of a parsed document or fragment, skipping
/// script, style, and noscript subtrees.
pub fn visible_text(html: &Html) -> String {
    let mut out = String::new();
    collect_text(html.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if matches!(el.name(), "script" | "style" | "noscript") => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Count keyword occurrences and classify the density.
pub fn analyze_keyword(text: &str, keyword: &str) -> KeywordAnalysis {
    let word_count = text.split_whitespace().count();
    let keyword = keyword.trim().to_lowercase();

    if keyword.is_empty() {
        return KeywordAnalysis {
            count: 0,
            density_percent: 0.0,
            word_count,
            status: KeywordStatus::Missing,
        };
    }
    if word_count == 0 {
        return KeywordAnalysis {
            count: 0,
            density_percent: 0.0,
            word_count: 0,
            status: KeywordStatus::Error,
        };
    }

    let count = text.to_lowercase().matches(keyword.as_str()).count();
    let density_percent = (1000.0 * count as f64 / word_count as f64).round() / 10.0;

    let status = if count == 0 {
        KeywordStatus::Missing
    } else if density_percent < DENSITY_LOW {
        KeywordStatus::Low
    } else if density_percent > DENSITY_HIGH {
        KeywordStatus::High
    } else {
        KeywordStatus::Good
    };

    KeywordAnalysis {
        count,
        density_percent,
        word_count,
        status,
    }
}

/// Check whether the keyword appears in the first 100 words of the content.
pub fn opening_paragraph(text: &str, keyword: &str) -> OpeningParagraph {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return OpeningParagraph { found: false };
    }

    let opening = text
        .split_whitespace()
        .take(OPENING_WORD_LIMIT)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    OpeningParagraph {
        found: opening.contains(&keyword),
    }
}
