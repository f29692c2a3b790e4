//! Weighted SEO scoring.
//!
//! Deterministic and pure: the same analysis always produces the same
//! score. Category weights sum to 100; the per-category breakdown is part
//! of the contract, consumed by dashboards and exports.

use crate::domain::models::{
    CategoryScore, CategoryStatus, ContentLinks, FaqAnalysis, Grade, HeadingAnalysis,
    ImageAnalysis, KeywordAnalysis, OpeningParagraph, ScoreCategory, SeoScore, TechnicalSeo,
};

/// Everything the scoring table reads, borrowed from a `PageAnalysis` in
/// the making.
pub struct ScoreInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub headings: &'a HeadingAnalysis,
    pub keyword: &'a KeywordAnalysis,
    pub opening: &'a OpeningParagraph,
    pub images: &'a ImageAnalysis,
    pub links: &'a ContentLinks,
    pub faq: &'a FaqAnalysis,
    pub technical: &'a TechnicalSeo,
}

pub fn score(input: &ScoreInput) -> SeoScore {
    let breakdown = vec![
        entry(ScoreCategory::Title, score_title(input.title), 15),
        entry(
            ScoreCategory::MetaDescription,
            score_description(input.description),
            10,
        ),
        entry(ScoreCategory::H1, score_h1(input.headings), 15),
        entry(
            ScoreCategory::KeywordDensity,
            score_keyword_density(input.keyword),
            15,
        ),
        entry(
            ScoreCategory::OpeningParagraph,
            if input.opening.found { 10 } else { 0 },
            10,
        ),
        entry(ScoreCategory::Images, score_images(input.images), 10),
        entry(
            ScoreCategory::InternalLinks,
            score_internal_links(input.links.internal),
            5,
        ),
        entry(
            ScoreCategory::ExternalLinks,
            score_external_links(input.links.external),
            5,
        ),
        entry(
            ScoreCategory::ContentLength,
            score_content_length(input.keyword.word_count),
            5,
        ),
        entry(
            ScoreCategory::Schema,
            score_schema(input.faq, input.technical),
            5,
        ),
        entry(
            ScoreCategory::Canonical,
            if input.technical.canonical.is_some() { 5 } else { 0 },
            5,
        ),
    ];

    let value: u32 = breakdown.iter().map(|c| c.score).sum();

    SeoScore {
        value,
        grade: grade_for(value),
        breakdown,
    }
}

fn entry(category: ScoreCategory, score: u32, max: u32) -> CategoryScore {
    let status = if score == max {
        CategoryStatus::Good
    } else if score == 0 {
        CategoryStatus::Poor
    } else {
        CategoryStatus::Ok
    };
    CategoryScore {
        category,
        score,
        max,
        status,
    }
}

fn grade_for(value: u32) -> Grade {
    match value {
        90.. => Grade::APlus,
        80..=89 => Grade::A,
        70..=79 => Grade::B,
        60..=69 => Grade::C,
        50..=59 => Grade::D,
        _ => Grade::F,
    }
}

fn score_title(title: &str) -> u32 {
    let len = title.chars().count();
    if len == 0 {
        0
    } else if (50..=60).contains(&len) {
        15
    } else if (30..=70).contains(&len) {
        10
    } else {
        5
    }
}

fn score_description(description: &str) -> u32 {
    let len = description.chars().count();
    if len == 0 {
        0
    } else if (150..=160).contains(&len) {
        10
    } else if (100..=180).contains(&len) {
        7
    } else {
        3
    }
}

fn score_h1(headings: &HeadingAnalysis) -> u32 {
    match headings.h1_count {
        0 => 0,
        1 => {
            let keyword_bonus = if headings.with_keyword > 0 { 5 } else { 0 };
            10 + keyword_bonus
        }
        _ => 5,
    }
}

fn score_keyword_density(keyword: &KeywordAnalysis) -> u32 {
    let density = keyword.density_percent;
    if keyword.count == 0 {
        0
    } else if (0.8..=2.5).contains(&density) {
        15
    } else if (0.5..=3.0).contains(&density) {
        10
    } else {
        5
    }
}

fn score_images(images: &ImageAnalysis) -> u32 {
    if images.total == 0 {
        return 3;
    }
    if images.missing_alt == images.total {
        0
    } else if images.missing_alt > 0 {
        3
    } else if images.with_keyword >= 1 {
        10
    } else {
        7
    }
}

fn score_internal_links(internal: usize) -> u32 {
    if (3..=15).contains(&internal) {
        5
    } else if internal > 0 {
        3
    } else {
        0
    }
}

fn score_external_links(external: usize) -> u32 {
    if (1..=5).contains(&external) {
        5
    } else if external > 0 {
        3
    } else {
        0
    }
}

fn score_content_length(word_count: usize) -> u32 {
    if word_count >= 800 {
        5
    } else if word_count >= 500 {
        3
    } else if word_count >= 300 {
        1
    } else {
        0
    }
}

fn score_schema(faq: &FaqAnalysis, technical: &TechnicalSeo) -> u32 {
    if faq.via_schema {
        5
    } else if technical.schema_types > 0 {
        3
    } else {
        0
    }
}
