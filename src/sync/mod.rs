//! External spreadsheet replication.
//!
//! Page changes are queued as `SyncOperation`s and flushed in batches to a
//! remote row-oriented store keyed by URL. Delivery is at-least-once and
//! best-effort: the primary save path never waits on replication.

use async_trait::async_trait;
use thiserror::Error;

pub mod flusher;
pub mod sheets;

pub use flusher::{FlushReport, SheetSync, DEFAULT_FLUSH_LIMIT};
pub use sheets::SheetsConfig;

/// Remote spreadsheet errors, split into retryable transport conditions
/// and fatal configuration/auth problems.
#[derive(Debug, Clone, Error)]
pub enum SheetError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("server error (HTTP {0})")]
    Server(u16),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl SheetError {
    /// Only 429 and 5xx responses are worth retrying; auth and request
    /// errors will fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SheetError::RateLimited | SheetError::Server(_))
    }
}

/// Batched access to one spreadsheet tab. Implementations wrap the actual
/// remote API; tests use an in-memory fake. Row indices are 1-based.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Read a range (e.g. `Sheet1!B:B` or `Sheet1!1:1`) as rows of cells.
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError>;

    /// Apply one batched update of (range, rows) pairs.
    async fn batch_update(&self, data: &[(String, Vec<Vec<String>>)]) -> Result<(), SheetError>;

    /// Append rows after the last data row of the range.
    async fn append(&self, range: &str, rows: &[Vec<String>]) -> Result<(), SheetError>;

    /// Remove whole rows by 1-based index, in the order given.
    async fn batch_delete_rows(&self, sheet_id: i64, rows: &[usize]) -> Result<(), SheetError>;

    /// Clear cell values in the given ranges (fallback when the numeric
    /// sheet id cannot be resolved).
    async fn batch_clear(&self, ranges: &[String]) -> Result<(), SheetError>;

    /// Resolve a tab title to its numeric sheet id, if the tab exists.
    async fn resolve_sheet_id(&self, tab: &str) -> Result<Option<i64>, SheetError>;
}
