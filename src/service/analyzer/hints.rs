//! Hint assembly: one short pass/warn/fail flag per extracted signal.
//!
//! Hints are human-readable status flags, distinct from recommendations
//! (which are actionable instructions). One rule per signal, evaluated in
//! fixed order.

use url::Url;

use crate::domain::models::{
    ContentLinks, FaqAnalysis, HeadingAnalysis, HowtoAnalysis, KeywordAnalysis, KeywordStatus,
    OpeningParagraph, TechnicalSeo,
};

const WORD_COUNT_LOW: usize = 300;
const WORD_COUNT_FAIR: usize = 500;

pub struct HintInput<'a> {
    pub url: &'a Url,
    pub title: &'a str,
    pub description: &'a str,
    pub keyword: &'a str,
    pub headings: &'a HeadingAnalysis,
    pub keyword_analysis: &'a KeywordAnalysis,
    pub opening: &'a OpeningParagraph,
    pub links: &'a ContentLinks,
    pub technical: &'a TechnicalSeo,
    pub faq: &'a FaqAnalysis,
    pub howto: &'a HowtoAnalysis,
}

pub fn build(input: &HintInput) -> Vec<String> {
    let mut hints = Vec::new();

    // H1 structure
    if input.headings.h1_count == 0 {
        hints.push("❌ Missing H1 tag".to_string());
    } else if input.headings.h1_count > 1 {
        hints.push("⚠️ Multiple H1 tags found".to_string());
    } else {
        hints.push("✅ H1 tag structure good".to_string());
    }

    // Canonical
    if input.technical.canonical.is_some() {
        hints.push("✅ Canonical URL set".to_string());
    } else {
        hints.push("❌ Missing canonical URL".to_string());
    }

    // Robots directive, only when the meta tag exists
    if let Some(robots) = &input.technical.robots {
        if robots.contains("noindex") {
            hints.push("⚠️ Page set to NOINDEX".to_string());
        } else {
            hints.push("✅ Page indexable".to_string());
        }
    }

    // Open Graph
    if input.technical.og_tags > 0 {
        hints.push(format!(
            "✅ Open Graph tags present ({})",
            input.technical.og_tags
        ));
    } else {
        hints.push("❌ Missing Open Graph tags".to_string());
    }

    // Twitter cards, only when present
    if input.technical.twitter_tags > 0 {
        hints.push(format!(
            "✅ Twitter Card tags present ({})",
            input.technical.twitter_tags
        ));
    }

    // Schema markup
    if input.technical.schema_types > 0 {
        hints.push(format!(
            "✅ Schema markup found ({} types)",
            input.technical.schema_types
        ));
    } else {
        hints.push("⚠️ No schema markup detected".to_string());
    }

    // Image formats, only when there are images
    if input.technical.total_images > 0 {
        let percent = input.technical.webp_percent();
        if percent == 100 {
            hints.push("✅ All images in WebP format".to_string());
        } else if percent > 50 {
            hints.push(format!(
                "⚠️ {} images not WebP - consider converting",
                input.technical.legacy_images
            ));
        } else {
            hints.push(format!("❌ Only {}% WebP - optimize images", percent));
        }
    }

    // Word count
    let words = input.keyword_analysis.word_count;
    if words < WORD_COUNT_LOW {
        hints.push(format!("❌ Low word count ({}) - aim for 500+", words));
    } else if words < WORD_COUNT_FAIR {
        hints.push(format!("⚠️ Word count ({}) could be higher", words));
    } else {
        hints.push(format!("✅ Good word count ({})", words));
    }

    // Title length, only when out of range
    let title_len = input.title.chars().count();
    if title_len > 60 {
        hints.push(format!("⚠️ Title too long ({} chars)", title_len));
    } else if title_len < 30 {
        hints.push(format!("⚠️ Title too short ({} chars)", title_len));
    }

    // Meta description length
    let desc_len = input.description.chars().count();
    if desc_len == 0 {
        hints.push("❌ Missing meta description".to_string());
    } else if desc_len > 160 {
        hints.push(format!("⚠️ Meta description too long ({} chars)", desc_len));
    } else if desc_len < 50 {
        hints.push(format!("⚠️ Meta description too short ({} chars)", desc_len));
    }

    // Keyword signals, only when a focus keyword is configured
    if !input.keyword.trim().is_empty() {
        let density = input.keyword_analysis.density_percent;
        match input.keyword_analysis.status {
            KeywordStatus::Missing => {
                hints.push("❌ Focus keyword not found in content".to_string())
            }
            KeywordStatus::Low => {
                hints.push(format!("⚠️ Keyword density low ({}%)", density))
            }
            KeywordStatus::High => hints.push(format!(
                "⚠️ Keyword density high ({}%) - risk of stuffing",
                density
            )),
            KeywordStatus::Good => {
                hints.push(format!("✅ Keyword density good ({}%)", density))
            }
            KeywordStatus::Error => {}
        }

        if input.opening.found {
            hints.push("✅ Keyword appears in opening paragraph".to_string());
        } else {
            hints.push("⚠️ Keyword missing from first 100 words".to_string());
        }
    }

    // Structured content detections, only when positive
    if input.faq.detected {
        hints.push("✅ FAQ content detected".to_string());
    }
    if input.howto.detected {
        hints.push("✅ HowTo content detected".to_string());
    }

    // HTTPS
    if input.url.scheme() == "https" {
        hints.push("✅ HTTPS enabled".to_string());
    } else {
        hints.push("❌ Not using HTTPS".to_string());
    }

    // Link balance
    if input.links.external == 0 && input.links.internal > 0 {
        hints.push("⚠️ No external links - add authoritative sources".to_string());
    }
    if input.links.internal < 3 {
        hints.push("⚠️ Few internal links - improve internal linking".to_string());
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input<'a>(
        url: &'a Url,
        headings: &'a HeadingAnalysis,
        keyword_analysis: &'a KeywordAnalysis,
        opening: &'a OpeningParagraph,
        links: &'a ContentLinks,
        technical: &'a TechnicalSeo,
        faq: &'a FaqAnalysis,
        howto: &'a HowtoAnalysis,
    ) -> HintInput<'a> {
        HintInput {
            url,
            title: "A title that sits comfortably inside the range",
            description: "",
            keyword: "",
            headings,
            keyword_analysis,
            opening,
            links,
            technical,
            faq,
            howto,
        }
    }

    #[test]
    fn test_hint_order_is_stable() {
        let url = Url::parse("https://example.com/").unwrap();
        let headings = HeadingAnalysis {
            h1_count: 1,
            ..Default::default()
        };
        let keyword_analysis = KeywordAnalysis::default();
        let opening = OpeningParagraph::default();
        let links = ContentLinks {
            internal: 4,
            external: 1,
            ..Default::default()
        };
        let technical = TechnicalSeo {
            canonical: Some("c".into()),
            og_tags: 2,
            schema_types: 1,
            ..Default::default()
        };
        let faq = FaqAnalysis::default();
        let howto = HowtoAnalysis::default();

        let input = minimal_input(
            &url,
            &headings,
            &keyword_analysis,
            &opening,
            &links,
            &technical,
            &faq,
            &howto,
        );
        let hints = build(&input);

        // H1 always leads; canonical second; HTTPS near the tail
        assert_eq!(hints[0], "✅ H1 tag structure good");
        assert_eq!(hints[1], "✅ Canonical URL set");
        assert!(hints.contains(&"✅ HTTPS enabled".to_string()));
        assert_eq!(hints, build(&input));
    }

    #[test]
    fn test_noindex_and_missing_signals() {
        let url = Url::parse("http://example.com/").unwrap();
        let headings = HeadingAnalysis::default();
        let keyword_analysis = KeywordAnalysis::default();
        let opening = OpeningParagraph::default();
        let links = ContentLinks::default();
        let technical = TechnicalSeo {
            robots: Some("noindex, nofollow".into()),
            ..Default::default()
        };
        let faq = FaqAnalysis::default();
        let howto = HowtoAnalysis::default();

        let hints = build(&minimal_input(
            &url,
            &headings,
            &keyword_analysis,
            &opening,
            &links,
            &technical,
            &faq,
            &howto,
        ));

        assert!(hints.contains(&"❌ Missing H1 tag".to_string()));
        assert!(hints.contains(&"⚠️ Page set to NOINDEX".to_string()));
        assert!(hints.contains(&"❌ Missing canonical URL".to_string()));
        assert!(hints.contains(&"❌ Missing meta description".to_string()));
        assert!(hints.contains(&"❌ Not using HTTPS".to_string()));
    }

    #[test]
    fn test_keyword_hints_only_with_keyword() {
        let url = Url::parse("https://example.com/").unwrap();
        let headings = HeadingAnalysis::default();
        let keyword_analysis = KeywordAnalysis {
            count: 4,
            density_percent: 1.1,
            word_count: 400,
            status: crate::domain::models::KeywordStatus::Good,
        };
        let opening = OpeningParagraph { found: true };
        let links = ContentLinks::default();
        let technical = TechnicalSeo::default();
        let faq = FaqAnalysis::default();
        let howto = HowtoAnalysis::default();

        let mut input = minimal_input(
            &url,
            &headings,
            &keyword_analysis,
            &opening,
            &links,
            &technical,
            &faq,
            &howto,
        );
        let without = build(&input);
        assert!(!without.iter().any(|h| h.contains("Keyword density")));

        input.keyword = "shoes";
        let with = build(&input);
        assert!(with.contains(&"✅ Keyword density good (1.1%)".to_string()));
        assert!(with.contains(&"✅ Keyword appears in opening paragraph".to_string()));
    }
}
