//! Spreadsheet row construction and column mapping.
//!
//! The default row shape is `Timestamp, URL, SEO Score, Status, Notes`
//! (columns A-E). When header mapping is enabled, rows are aligned to the
//! sheet's actual header row by case-insensitive label match, and unknown
//! headers are left blank.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::models::RowPayload;

/// Default row layout when the sheet has no usable headers.
pub const DEFAULT_COLUMNS: usize = 5;

/// Column letter holding the URL key when headers are unused.
pub const DEFAULT_URL_COLUMN: &str = "B";

/// Remote store settings. An empty spreadsheet id means the integration is
/// unconfigured and flushes are silent no-ops.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_tab")]
    pub tab: String,
    /// Read the header row and map columns by label instead of position
    #[serde(default)]
    pub read_headers: bool,
}

fn default_tab() -> String {
    "Sheet1".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            tab: default_tab(),
            read_headers: false,
        }
    }
}

impl SheetsConfig {
    pub fn is_configured(&self) -> bool {
        !self.spreadsheet_id.trim().is_empty()
    }

    pub fn tab(&self) -> &str {
        if self.tab.trim().is_empty() {
            "Sheet1"
        } else {
            &self.tab
        }
    }
}

/// Build the default positional row for a payload.
pub fn build_row(payload: &RowPayload, at: DateTime<Utc>) -> Vec<String> {
    vec![
        at.format("%Y-%m-%d %H:%M:%S").to_string(),
        payload.url.clone(),
        payload
            .seo_score
            .map(|s| s.to_string())
            .unwrap_or_default(),
        payload
            .priority
            .map(|p| p.label().to_string())
            .unwrap_or_default(),
        payload.notes.clone().unwrap_or_default(),
    ]
}

/// Build a row aligned to the given headers. Known logical fields map by
/// lowercase label; anything else stays blank.
pub fn build_row_for_headers(
    payload: &RowPayload,
    headers: &[String],
    at: DateTime<Utc>,
) -> Vec<String> {
    let base = build_row(payload, at);
    headers
        .iter()
        .map(|label| match label.trim().to_lowercase().as_str() {
            "timestamp" => base[0].clone(),
            "url" => base[1].clone(),
            "seo score" => base[2].clone(),
            "status" => base[3].clone(),
            "notes" => base[4].clone(),
            _ => String::new(),
        })
        .collect()
}

/// 1-based column index to a spreadsheet letter (1 -> A, 27 -> AA).
pub fn column_letter(mut index: usize) -> String {
    let mut letters = String::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        index = (index - rem - 1) / 26;
    }
    letters
}
