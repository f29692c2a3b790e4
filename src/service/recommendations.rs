//! Rule-based recommendation generation.
//!
//! Each rule is independently evaluable and the evaluation order is fixed,
//! so the output sequence is deterministic for a given analysis. Positive
//! confirmations are emitted for title, meta description, and content
//! length when their thresholds are met; the mobile, page-speed, and
//! readability tips are unconditional.

use url::Url;

use crate::domain::models::{ContentLinks, HeadingAnalysis, ImageAnalysis, TechnicalSeo};

pub struct RecommendationInput<'a> {
    pub url: &'a Url,
    pub title: &'a str,
    pub description: &'a str,
    pub keyword: &'a str,
    pub headings: &'a HeadingAnalysis,
    pub word_count: usize,
    pub links: &'a ContentLinks,
    pub images: &'a ImageAnalysis,
    pub technical: &'a TechnicalSeo,
}

pub fn generate(input: &RecommendationInput) -> Vec<String> {
    let mut out = Vec::new();
    let keyword = input.keyword.trim();
    let keyword_lower = keyword.to_lowercase();

    // Title
    let title_len = input.title.chars().count();
    if title_len > 60 {
        let preview: String = input.title.chars().take(57).collect();
        out.push(format!(
            "📝 TITLE: Shorten to 50-60 characters (currently {}). Consider: \"{}...\"",
            title_len, preview
        ));
    } else if title_len < 30 {
        out.push(format!(
            "📝 TITLE: Expand to 50-60 characters (currently {}). Add target keyword or descriptive terms.",
            title_len
        ));
    } else if !keyword.is_empty() && !input.title.to_lowercase().contains(&keyword_lower) {
        out.push(format!(
            "📝 TITLE: Include focus keyword \"{}\" near the beginning for better ranking.",
            keyword
        ));
    } else {
        out.push(format!(
            "✅ TITLE: Well optimized at {} characters.",
            title_len
        ));
    }

    // Meta description
    let desc_len = input.description.chars().count();
    if desc_len == 0 {
        out.push(
            "📝 META: Write a compelling 150-160 character meta description with your focus keyword to improve click-through rate."
                .to_string(),
        );
    } else if desc_len < 50 {
        out.push(format!(
            "📝 META: Expand description to 150-160 characters (currently {}). Add value proposition and call-to-action.",
            desc_len
        ));
    } else if desc_len > 160 {
        out.push(format!(
            "📝 META: Trim to 150-160 characters (currently {}) to avoid truncation in search results.",
            desc_len
        ));
    } else if !keyword.is_empty() && !input.description.to_lowercase().contains(&keyword_lower) {
        out.push(format!(
            "📝 META: Include focus keyword \"{}\" naturally in your meta description.",
            keyword
        ));
    } else {
        out.push("✅ META: Description well optimized.".to_string());
    }

    // Keyword placement
    if keyword.is_empty() {
        out.push(
            "🎯 KEYWORD: Define a focus keyword to optimize this page for search rankings."
                .to_string(),
        );
    } else {
        let slug = keyword_lower.replace(' ', "-");
        let url_lower = input.url.as_str().to_lowercase();
        let mut missing = Vec::new();
        if !input.title.to_lowercase().contains(&keyword_lower) {
            missing.push("title");
        }
        if !input.description.to_lowercase().contains(&keyword_lower) {
            missing.push("description");
        }
        if !url_lower.contains(&slug) {
            missing.push("URL");
        }
        if !missing.is_empty() {
            out.push(format!(
                "🎯 KEYWORD: Include \"{}\" in: {} for better relevance.",
                keyword,
                missing.join(", ")
            ));
        }
    }

    // Heading structure
    if input.headings.h1_count == 0 {
        out.push(
            "🏗️ HEADERS: Add ONE H1 tag with your primary keyword. This is critical for SEO."
                .to_string(),
        );
    } else if input.headings.h1_count > 1 {
        out.push(
            "🏗️ HEADERS: Remove duplicate H1 tags. Use only ONE H1 per page, use H2-H6 for subheadings."
                .to_string(),
        );
    }
    if input.headings.h2_count == 0 {
        out.push(
            "🏗️ HEADERS: Add 3-5 H2 subheadings to organize content and include related keywords."
                .to_string(),
        );
    }

    // Content length
    if input.word_count < 300 {
        out.push(format!(
            "📄 CONTENT: Expand to 800-1500 words (currently {}). Add more value, examples, and target related keywords.",
            input.word_count
        ));
    } else if input.word_count > 2500 {
        out.push(format!(
            "📄 CONTENT: Consider breaking into multiple focused pages (currently {} words) or ensure content is scannable with subheadings.",
            input.word_count
        ));
    } else {
        out.push(format!(
            "✅ CONTENT: Good length at {} words.",
            input.word_count
        ));
    }

    // Internal links
    if input.links.internal < 3 {
        out.push(
            "🔗 LINKS: Add 3-5 internal links to related pages/posts. This improves site structure and keeps visitors engaged."
                .to_string(),
        );
    } else if input.links.internal > 20 {
        out.push(format!(
            "🔗 LINKS: Reduce internal links to 10-15 (currently {}). Too many can dilute link value and confuse users.",
            input.links.internal
        ));
    }

    // External links
    if input.links.external == 0 {
        out.push(
            "🌐 EXTERNAL: Link to 2-3 authoritative sources (Wikipedia, government sites, industry leaders) to boost credibility."
                .to_string(),
        );
    } else if input.links.external > 10 {
        out.push(format!(
            "🌐 EXTERNAL: Reduce to 3-5 quality external links (currently {}). Focus on highly authoritative domains.",
            input.links.external
        ));
    }

    // Image alt coverage
    if input.images.missing_alt > 0 {
        out.push(format!(
            "🖼️ IMAGES: Add descriptive alt text to {} images. Include target keyword naturally where relevant.",
            input.images.missing_alt
        ));
    }

    // Structured data
    if input.technical.schema_types == 0 {
        out.push(
            "📊 SCHEMA: Implement schema markup (FAQ, HowTo, Product, or Article) to enhance search appearance with rich snippets."
                .to_string(),
        );
    }

    // Baseline recommendations, always emitted
    out.push(
        "📱 MOBILE: Test on real devices. Ensure tap targets are 48px+, text is readable, and page loads under 3 seconds."
            .to_string(),
    );
    out.push(
        "⚡ SPEED: Compress images (use WebP), enable caching, minify CSS/JS, and use a CDN for faster loading."
            .to_string(),
    );
    out.push(
        "📖 READABILITY: Use short paragraphs (3-4 sentences), bullet points, and bold important terms for better engagement."
            .to_string(),
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input<'a>(
        url: &'a Url,
        title: &'a str,
        description: &'a str,
        keyword: &'a str,
        headings: &'a HeadingAnalysis,
        links: &'a ContentLinks,
        images: &'a ImageAnalysis,
        technical: &'a TechnicalSeo,
    ) -> RecommendationInput<'a> {
        RecommendationInput {
            url,
            title,
            description,
            keyword,
            headings,
            word_count: 900,
            links,
            images,
            technical,
        }
    }

    #[test]
    fn test_optimized_page_still_gets_recommendations() {
        let url = Url::parse("https://example.com/running-shoes").unwrap();
        let title = "Running Shoes Buying Guide for Daily Training Use"; // 49 chars, keyword present
        let description = format!("running shoes {}", "d".repeat(120));
        let headings = HeadingAnalysis {
            h1_count: 1,
            h2_count: 4,
            ..Default::default()
        };
        let links = ContentLinks {
            internal: 5,
            external: 3,
            ..Default::default()
        };
        let images = ImageAnalysis {
            total: 2,
            ..Default::default()
        };
        let technical = TechnicalSeo {
            schema_types: 1,
            ..Default::default()
        };
        let recs = generate(&base_input(
            &url,
            title,
            &description,
            "running shoes",
            &headings,
            &links,
            &images,
            &technical,
        ));

        // Positive confirmations plus the three unconditional tips
        assert!(recs.iter().any(|r| r.starts_with("✅ TITLE:")));
        assert!(recs.iter().any(|r| r.starts_with("✅ META:")));
        assert!(recs.iter().any(|r| r.starts_with("✅ CONTENT:")));
        assert!(recs.iter().any(|r| r.starts_with("📱 MOBILE:")));
        assert!(recs.iter().any(|r| r.starts_with("⚡ SPEED:")));
        assert!(recs.iter().any(|r| r.starts_with("📖 READABILITY:")));
        assert!(!recs.iter().any(|r| r.starts_with("🎯 KEYWORD:")));
    }

    #[test]
    fn test_keyword_missing_locations_are_named() {
        let url = Url::parse("https://example.com/page-7").unwrap();
        let headings = HeadingAnalysis {
            h1_count: 1,
            h2_count: 2,
            ..Default::default()
        };
        let links = ContentLinks {
            internal: 4,
            external: 1,
            ..Default::default()
        };
        let images = ImageAnalysis::default();
        let technical = TechnicalSeo::default();
        let recs = generate(&base_input(
            &url,
            &"t".repeat(40),
            &"d".repeat(120),
            "winter boots",
            &headings,
            &links,
            &images,
            &technical,
        ));

        let keyword_rec = recs
            .iter()
            .find(|r| r.starts_with("🎯 KEYWORD:"))
            .expect("keyword recommendation expected");
        assert!(keyword_rec.contains("title, description, URL"));
    }

    #[test]
    fn test_structural_rules_fire_in_fixed_order() {
        let url = Url::parse("https://example.com/").unwrap();
        let headings = HeadingAnalysis::default(); // no h1, no h2
        let links = ContentLinks::default(); // no links at all
        let images = ImageAnalysis {
            total: 3,
            missing_alt: 3,
            ..Default::default()
        };
        let technical = TechnicalSeo::default();
        let mut input = base_input(
            &url,
            "",
            "",
            "",
            &headings,
            &links,
            &images,
            &technical,
        );
        input.word_count = 120;
        let recs = generate(&input);

        let position = |needle: &str| {
            recs.iter()
                .position(|r| r.contains(needle))
                .unwrap_or_else(|| panic!("missing recommendation: {}", needle))
        };

        assert!(position("Add ONE H1 tag") < position("Add 3-5 H2 subheadings"));
        assert!(position("Add 3-5 H2 subheadings") < position("Expand to 800-1500 words"));
        assert!(position("Expand to 800-1500 words") < position("internal links"));
        assert!(position("alt text to 3 images") < position("SCHEMA:"));
        assert!(recs.iter().any(|r| r.contains("Define a focus keyword")));
    }

    #[test]
    fn test_multiple_h1_and_link_excess_rules() {
        let url = Url::parse("https://example.com/").unwrap();
        let headings = HeadingAnalysis {
            h1_count: 2,
            h2_count: 1,
            ..Default::default()
        };
        let links = ContentLinks {
            internal: 25,
            external: 12,
            ..Default::default()
        };
        let images = ImageAnalysis::default();
        let technical = TechnicalSeo {
            schema_types: 1,
            ..Default::default()
        };
        let recs = generate(&base_input(
            &url,
            &"t".repeat(40),
            &"d".repeat(120),
            "",
            &headings,
            &links,
            &images,
            &technical,
        ));

        assert!(recs.iter().any(|r| r.contains("Remove duplicate H1 tags")));
        assert!(recs
            .iter()
            .any(|r| r.contains("Reduce internal links to 10-15 (currently 25)")));
        assert!(recs
            .iter()
            .any(|r| r.contains("Reduce to 3-5 quality external links (currently 12)")));
    }
}
