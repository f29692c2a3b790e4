//! Domain entities for monitored pages, analysis results, and sync operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ====== Enums ======

/// Optimization priority assigned to a monitored page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Human-readable label, used for spreadsheet rows.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(anyhow::anyhow!("unknown priority: {}", other)),
        }
    }
}

/// Classification of the measured keyword density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    /// No focus keyword configured, or zero occurrences in the content
    Missing,
    /// Density below 0.5%
    Low,
    /// Density in the 0.5%..3% range
    Good,
    /// Density above 3%
    High,
    /// Content had no countable words; density is undefined
    Error,
}

// ====== Page record ======

/// One monitored page. Owned exclusively by the page store; the sync queue
/// only ever holds short-lived `RowPayload` copies of these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Stable identity. Required, absolute http(s) URL.
    pub url: String,
    pub title: String,
    pub description: String,
    pub focus_keyword: String,
    pub priority: Priority,
    /// Free-form, not validated as numeric
    pub search_volume: String,
    /// Free-form, not validated as numeric
    pub ranking: String,
    /// 0-100, `None` = not tested
    pub page_speed_mobile: Option<u8>,
    pub page_speed_desktop: Option<u8>,
    /// Result of the most recent fetch+analysis cycle
    pub analysis: Option<PageAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            url: url.into(),
            title: title.into(),
            description: String::new(),
            focus_keyword: String::new(),
            priority: Priority::default(),
            search_volume: String::new(),
            ranking: String::new(),
            page_speed_mobile: None,
            page_speed_desktop: None,
            analysis: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the fields a spreadsheet row needs.
    pub fn sync_payload(&self) -> RowPayload {
        RowPayload {
            url: self.url.clone(),
            seo_score: self.analysis.as_ref().map(|a| a.score.value),
            priority: Some(self.priority),
            notes: self
                .analysis
                .as_ref()
                .map(|a| a.recommendations.join("\n")),
        }
    }
}

// ====== Analysis record ======

/// Result of one fetch+analysis cycle for a URL. Immutable once produced;
/// a re-fetch replaces the whole value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    /// Title as resolved by the extraction chain (stored > H1 > og:title > <title>)
    pub title: String,
    pub description: String,
    pub focus_keyword: String,
    pub heading_analysis: HeadingAnalysis,
    pub keyword_analysis: KeywordAnalysis,
    pub image_analysis: ImageAnalysis,
    pub content_links: ContentLinks,
    pub opening_paragraph: OpeningParagraph,
    pub faq: FaqAnalysis,
    pub howto: HowtoAnalysis,
    pub technical_seo: TechnicalSeo,
    pub score: SeoScore,
    /// Short pass/warn/fail flags, one per signal, in fixed rule order
    pub hints: Vec<String>,
    /// Actionable instructions, in fixed rule order
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// Lowercase tag name: "h1".."h6"
    pub tag: String,
    /// Decoded text, truncated to 80 characters with an ellipsis
    pub text: String,
    pub has_keyword: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingAnalysis {
    pub headings: Vec<Heading>,
    pub h1_count: usize,
    pub h2_count: usize,
    pub with_keyword: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// Raw case-insensitive substring occurrence count
    pub count: usize,
    /// 100 * count / word_count, rounded to one decimal
    pub density_percent: f64,
    pub word_count: usize,
    pub status: KeywordStatus,
}

impl Default for KeywordAnalysis {
    fn default() -> Self {
        Self {
            count: 0,
            density_percent: 0.0,
            word_count: 0,
            status: KeywordStatus::Missing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDetail {
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
    pub has_keyword: bool,
    /// True for data-URI sources
    pub is_placeholder: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub total: usize,
    pub missing_alt: usize,
    pub with_keyword: usize,
    pub details: Vec<ImageDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentLinks {
    /// Anchors resolving to the page's own host, counted inside the content area
    pub internal: usize,
    /// Absolute http(s) anchors to a different host
    pub external: usize,
    pub sample_internal_urls: Vec<String>,
    pub sample_external_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OpeningParagraph {
    /// Keyword present in the first 100 words of the content area
    pub found: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqAnalysis {
    pub detected: bool,
    /// True when detection came from FAQPage/Question structured data
    pub via_schema: bool,
    pub question_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HowtoAnalysis {
    pub detected: bool,
    pub via_schema: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalSeo {
    pub canonical: Option<String>,
    pub robots: Option<String>,
    /// Number of JSON-LD "@type" occurrences in the document
    pub schema_types: usize,
    pub og_tags: usize,
    pub twitter_tags: usize,
    pub webp_images: usize,
    /// JPEG/PNG sources
    pub legacy_images: usize,
    pub total_images: usize,
}

impl TechnicalSeo {
    pub fn webp_percent(&self) -> u32 {
        if self.total_images == 0 {
            return 0;
        }
        ((self.webp_images as f64 / self.total_images as f64) * 100.0).round() as u32
    }
}

// ====== Score ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Scoring categories, in fixed evaluation/emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Title,
    MetaDescription,
    H1,
    KeywordDensity,
    OpeningParagraph,
    Images,
    InternalLinks,
    ExternalLinks,
    ContentLength,
    Schema,
    Canonical,
}

impl ScoreCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::Title => "title",
            ScoreCategory::MetaDescription => "meta_description",
            ScoreCategory::H1 => "h1",
            ScoreCategory::KeywordDensity => "keyword_density",
            ScoreCategory::OpeningParagraph => "opening_paragraph",
            ScoreCategory::Images => "images",
            ScoreCategory::InternalLinks => "internal_links",
            ScoreCategory::ExternalLinks => "external_links",
            ScoreCategory::ContentLength => "content_length",
            ScoreCategory::Schema => "schema",
            ScoreCategory::Canonical => "canonical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    /// Full points awarded
    Good,
    /// Partial points
    Ok,
    /// Zero points
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub score: u32,
    pub max: u32,
    pub status: CategoryStatus,
}

/// Weighted 0-100 score with letter grade and per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoScore {
    pub value: u32,
    pub grade: Grade,
    pub breakdown: Vec<CategoryScore>,
}

impl SeoScore {
    pub fn category(&self, category: ScoreCategory) -> Option<&CategoryScore> {
        self.breakdown.iter().find(|c| c.category == category)
    }
}

// ====== Sync operations ======

/// Page fields needed to build one spreadsheet row. A snapshot, never a
/// live reference; missing fields render as blank cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowPayload {
    pub url: String,
    pub seo_score: Option<u32>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SyncKind {
    Upsert { page: RowPayload },
    Delete { url: String },
}

/// Queued unit of replication work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOperation {
    pub kind: SyncKind,
    pub attempts: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl SyncOperation {
    pub fn upsert(page: RowPayload) -> Self {
        Self {
            kind: SyncKind::Upsert { page },
            attempts: 0,
            enqueued_at: Utc::now(),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            kind: SyncKind::Delete { url: url.into() },
            attempts: 0,
            enqueued_at: Utc::now(),
        }
    }
}

/// A sync operation as stored in the queue, with its row id.
#[derive(Debug, Clone)]
pub struct QueuedOperation {
    pub id: i64,
    pub op: SyncOperation,
}
