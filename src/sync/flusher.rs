//! Queue flushing against the remote spreadsheet.
//!
//! A flush is a single read-modify-write cycle: resolve the key column,
//! read the whole URL column once to map rows, stage every queued
//! operation, then execute the staged work as three batch calls (update,
//! append, delete). The row map is rebuilt from scratch on every flush —
//! O(rows) per run, a deliberate correctness-over-efficiency tradeoff
//! that does not scale past small sheets.
//!
//! Flushes must not overlap: two concurrent runs would compute row
//! indices from stale reads and corrupt the remote store, so the whole
//! cycle runs under one async mutex.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::Mutex;

use crate::domain::models::{QueuedOperation, SyncKind};
use crate::error::Result;
use crate::repository::QueueRepository;
use crate::sync::sheets::{
    build_row, build_row_for_headers, column_letter, SheetsConfig, DEFAULT_URL_COLUMN,
};
use crate::sync::{SheetError, SpreadsheetClient};

/// Operations processed per flush run
pub const DEFAULT_FLUSH_LIMIT: usize = 200;

/// An operation is dropped once its attempts exceed this budget
const MAX_OP_ATTEMPTS: u32 = 3;

/// Per-call retry budget for transient remote errors
const BACKOFF_RETRIES: u32 = 3;

/// First retry delay; doubles on each subsequent retry
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Outcome summary of one flush run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlushReport {
    /// Operations applied and removed from the queue
    pub applied: usize,
    /// Operations dropped after exhausting their retry budget
    pub dropped: usize,
    pub updated_rows: usize,
    pub appended_rows: usize,
    pub deleted_rows: usize,
}

enum Staged {
    Update { range: String, row: Vec<String> },
    Append { row: Vec<String> },
    DeleteRow { index: usize },
    /// Delete for a URL with no remote row: success with nothing to do
    Noop,
}

pub struct SheetSync {
    config: SheetsConfig,
    queue: Arc<dyn QueueRepository>,
    client: Arc<dyn SpreadsheetClient>,
    flush_lock: Mutex<()>,
}

impl SheetSync {
    pub fn new(
        config: SheetsConfig,
        queue: Arc<dyn QueueRepository>,
        client: Arc<dyn SpreadsheetClient>,
    ) -> Self {
        Self {
            config,
            queue,
            client,
            flush_lock: Mutex::new(()),
        }
    }

    /// Flush up to `max_items` queued operations.
    ///
    /// Unconfigured or empty queues are silent no-ops. An operation leaves
    /// the queue only when it was applied or its retry budget is spent;
    /// a failed batch call leaves its operations queued with incremented
    /// attempts for the next scheduled run.
    pub async fn flush(&self, max_items: usize) -> Result<FlushReport> {
        let _guard = self.flush_lock.lock().await;

        if !self.config.is_configured() {
            log::debug!("[SYNC] no spreadsheet configured, skipping flush");
            return Ok(FlushReport::default());
        }
        let batch = self.queue.front(max_items).await?;
        if batch.is_empty() {
            return Ok(FlushReport::default());
        }

        log::info!("[SYNC] flushing {} queued operation(s)", batch.len());
        let tab = self.config.tab();

        // Resolve headers and the URL key column
        let headers = if self.config.read_headers {
            self.read_headers(tab).await
        } else {
            Vec::new()
        };
        let url_column = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("url"))
            .map(|idx| column_letter(idx + 1))
            .unwrap_or_else(|| DEFAULT_URL_COLUMN.to_string());

        // One full column read builds the url -> 1-based row index map
        let column_range = format!("{}!{}:{}", tab, url_column, url_column);
        let column = with_backoff(|| self.client.read_range(&column_range)).await?;

        let mut row_by_url: HashMap<String, usize> = HashMap::new();
        for (idx, row) in column.iter().enumerate() {
            if !headers.is_empty() && idx == 0 {
                continue;
            }
            if let Some(value) = row.first() {
                let value = value.trim();
                if !value.is_empty() {
                    row_by_url.insert(value.to_string(), idx + 1);
                }
            }
        }

        // Stage every operation; staging failures cost one attempt
        let mut report = FlushReport::default();
        let mut updates: Vec<(String, Vec<Vec<String>>)> = Vec::new();
        let mut appends: Vec<Vec<String>> = Vec::new();
        let mut deletes: Vec<usize> = Vec::new();
        let mut staged_ids: Vec<i64> = Vec::new();

        let last_column = if headers.is_empty() {
            "E".to_string()
        } else {
            column_letter(headers.len())
        };

        for queued in &batch {
            match self.stage(queued, &headers, &row_by_url, tab, &last_column) {
                Ok(Staged::Update { range, row }) => {
                    updates.push((range, vec![row]));
                    staged_ids.push(queued.id);
                }
                Ok(Staged::Append { row }) => {
                    appends.push(row);
                    staged_ids.push(queued.id);
                }
                Ok(Staged::DeleteRow { index }) => {
                    deletes.push(index);
                    staged_ids.push(queued.id);
                }
                Ok(Staged::Noop) => {
                    staged_ids.push(queued.id);
                }
                Err(e) => {
                    log::warn!("[SYNC] cannot stage operation {}: {:#}", queued.id, e);
                    report.dropped += self.penalize(queued.id).await?;
                }
            }
        }

        report.updated_rows = updates.len();
        report.appended_rows = appends.len();
        report.deleted_rows = deletes.len();

        // Execute staged work as three batch calls
        let outcome = self
            .execute(tab, &last_column, updates, appends, deletes)
            .await;

        match outcome {
            Ok(()) => {
                for id in &staged_ids {
                    self.queue.remove(*id).await?;
                }
                report.applied = staged_ids.len();
                log::info!(
                    "[SYNC] flush complete: {} applied, {} dropped",
                    report.applied,
                    report.dropped
                );
                Ok(report)
            }
            Err(e) => {
                // Partial batch work (e.g. a completed append) is not rolled
                // back; the at-least-once contract allows re-application.
                log::error!("[SYNC] flush failed, operations remain queued: {}", e);
                for id in &staged_ids {
                    self.penalize(*id).await?;
                }
                Err(e.into())
            }
        }
    }

    async fn read_headers(&self, tab: &str) -> Vec<String> {
        let range = format!("{}!1:1", tab);
        match with_backoff(|| self.client.read_range(&range)).await {
            Ok(mut rows) if !rows.is_empty() => rows.remove(0),
            Ok(_) => Vec::new(),
            Err(e) => {
                log::warn!("[SYNC] failed to read header row: {}", e);
                Vec::new()
            }
        }
    }

    fn stage(
        &self,
        queued: &QueuedOperation,
        headers: &[String],
        row_by_url: &HashMap<String, usize>,
        tab: &str,
        last_column: &str,
    ) -> anyhow::Result<Staged> {
        match &queued.op.kind {
            SyncKind::Upsert { page } => {
                if page.url.trim().is_empty() {
                    return Err(anyhow!("upsert payload has no URL"));
                }
                let row = if headers.is_empty() {
                    build_row(page, queued.op.enqueued_at)
                } else {
                    build_row_for_headers(page, headers, queued.op.enqueued_at)
                };
                match row_by_url.get(page.url.trim()) {
                    Some(index) => Ok(Staged::Update {
                        range: format!("{}!A{}:{}{}", tab, index, last_column, index),
                        row,
                    }),
                    None => Ok(Staged::Append { row }),
                }
            }
            SyncKind::Delete { url } => match row_by_url.get(url.trim()) {
                Some(index) => Ok(Staged::DeleteRow { index: *index }),
                None => Ok(Staged::Noop),
            },
        }
    }

    async fn execute(
        &self,
        tab: &str,
        last_column: &str,
        updates: Vec<(String, Vec<Vec<String>>)>,
        appends: Vec<Vec<String>>,
        mut deletes: Vec<usize>,
    ) -> std::result::Result<(), SheetError> {
        if !updates.is_empty() {
            with_backoff(|| self.client.batch_update(&updates)).await?;
        }

        if !appends.is_empty() {
            let range = format!("{}!A:{}", tab, last_column);
            with_backoff(|| self.client.append(&range, &appends)).await?;
        }

        if !deletes.is_empty() {
            match with_backoff(|| self.client.resolve_sheet_id(tab)).await? {
                Some(sheet_id) => {
                    // Descending order so earlier deletes don't shift the
                    // indices of later ones within the batch.
                    deletes.sort_unstable_by(|a, b| b.cmp(a));
                    with_backoff(|| self.client.batch_delete_rows(sheet_id, &deletes)).await?;
                }
                None => {
                    let ranges: Vec<String> = deletes
                        .iter()
                        .map(|r| format!("{}!A{}:{}{}", tab, r, last_column, r))
                        .collect();
                    with_backoff(|| self.client.batch_clear(&ranges)).await?;
                }
            }
        }

        Ok(())
    }

    /// Bump an operation's attempts; drop it once the budget is exceeded.
    /// Returns 1 when the operation was dropped.
    async fn penalize(&self, id: i64) -> Result<usize> {
        let attempts = self.queue.bump_attempts(id).await?;
        if attempts > MAX_OP_ATTEMPTS {
            log::warn!(
                "[SYNC] dropping operation {} after {} attempts",
                id,
                attempts
            );
            self.queue.remove(id).await?;
            return Ok(1);
        }
        Ok(0)
    }
}

/// Retry a remote call on transient errors, doubling the delay each time.
async fn with_backoff<T, F, Fut>(mut call: F) -> std::result::Result<T, SheetError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, SheetError>>,
{
    let mut delay = BACKOFF_BASE;
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < BACKOFF_RETRIES => {
                attempt += 1;
                log::warn!(
                    "[SYNC] transient error ({}), retry {}/{} in {:?}",
                    e,
                    attempt,
                    BACKOFF_RETRIES,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
