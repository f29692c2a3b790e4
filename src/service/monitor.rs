//! Page monitoring service.
//!
//! Coordinates the page repository, the analysis pipeline, and the sync
//! queue. Every state change (add, update, remove, re-fetch, pagespeed
//! result) persists through the repository and then enqueues a replication
//! operation directly — there is no hidden event fan-out; this service is
//! the single producer the sync queue documents.
//!
//! Replication is best-effort: enqueue failures are logged and never fail
//! the primary save.

use std::sync::Arc;
use url::Url;

use crate::domain::models::{PageRecord, SyncOperation};
use crate::error::{AppError, Result};
use crate::repository::{PageRepository, QueueRepository};
use crate::service::analyzer;
use crate::service::http::PageFetcher;

pub struct PageMonitor {
    pages: Arc<dyn PageRepository>,
    queue: Arc<dyn QueueRepository>,
    fetcher: PageFetcher,
}

impl PageMonitor {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        queue: Arc<dyn QueueRepository>,
        fetcher: PageFetcher,
    ) -> Self {
        Self {
            pages,
            queue,
            fetcher,
        }
    }

    /// Add a page to the monitored set. URL and title are both required;
    /// the URL must be an absolute http(s) URL.
    pub async fn add_page(&self, url: &str, title: &str) -> Result<PageRecord> {
        let url = validate_url(url)?;
        if title.trim().is_empty() {
            return Err(AppError::InvalidUrl(format!(
                "a title is required when adding {}",
                url
            )));
        }
        if self.pages.get(url.as_str()).await?.is_some() {
            return Err(AppError::PageExists(url.to_string()));
        }

        let record = PageRecord::new(url.as_str(), title.trim());
        self.pages.upsert(&record).await?;
        log::info!("[MONITOR] added page {}", record.url);
        self.enqueue_upsert(&record).await;
        Ok(record)
    }

    /// Apply a manual edit to an existing page.
    pub async fn update_page(&self, mut record: PageRecord) -> Result<PageRecord> {
        validate_url(&record.url)?;
        if self.pages.get(&record.url).await?.is_none() {
            return Err(AppError::PageNotFound(record.url));
        }

        record.updated_at = chrono::Utc::now();
        self.pages.upsert(&record).await?;
        self.enqueue_upsert(&record).await;
        Ok(record)
    }

    /// Remove a page and queue the corresponding remote row deletion.
    pub async fn remove_page(&self, url: &str) -> Result<()> {
        let url = validate_url(url)?;
        if !self.pages.delete(url.as_str()).await? {
            return Err(AppError::PageNotFound(url.to_string()));
        }
        log::info!("[MONITOR] removed page {}", url);
        self.enqueue(SyncOperation::delete(url.as_str())).await;
        Ok(())
    }

    /// Re-fetch a page and replace its analysis.
    ///
    /// On fetch failure the record keeps its prior analysis untouched and
    /// the error is returned — no partial analysis is ever produced.
    pub async fn refresh(&self, url: &str) -> Result<PageRecord> {
        let parsed = validate_url(url)?;
        let mut record = self
            .pages
            .get(parsed.as_str())
            .await?
            .ok_or_else(|| AppError::PageNotFound(parsed.to_string()))?;

        let page = self.fetcher.fetch(&parsed).await?;
        if page.status >= 400 {
            return Err(AppError::network(format!(
                "{} returned HTTP {}",
                parsed, page.status
            )));
        }

        let analysis = analyzer::analyze(&page.html, &parsed, Some(&record));
        log::info!(
            "[MONITOR] {} analyzed: {}/100 ({})",
            record.url,
            analysis.score.value,
            analysis.score.grade.as_str()
        );

        record.analysis = Some(analysis);
        record.updated_at = chrono::Utc::now();
        self.pages.upsert(&record).await?;
        self.enqueue_upsert(&record).await;
        Ok(record)
    }

    /// Record externally measured PageSpeed scores for a page.
    pub async fn record_pagespeed(&self, url: &str, mobile: u8, desktop: u8) -> Result<PageRecord> {
        let parsed = validate_url(url)?;
        let mut record = self
            .pages
            .get(parsed.as_str())
            .await?
            .ok_or_else(|| AppError::PageNotFound(parsed.to_string()))?;

        record.page_speed_mobile = Some(mobile.min(100));
        record.page_speed_desktop = Some(desktop.min(100));
        record.updated_at = chrono::Utc::now();
        self.pages.upsert(&record).await?;
        self.enqueue_upsert(&record).await;
        Ok(record)
    }

    /// Number of replication operations waiting for the next flush.
    pub async fn pending_sync(&self) -> Result<usize> {
        Ok(self.queue.len().await?)
    }

    async fn enqueue_upsert(&self, record: &PageRecord) {
        self.enqueue(SyncOperation::upsert(record.sync_payload()))
            .await;
    }

    async fn enqueue(&self, op: SyncOperation) {
        if let Err(e) = self.queue.enqueue(&op).await {
            log::warn!("[MONITOR] failed to enqueue sync operation: {:#}", e);
        }
    }
}

fn validate_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidUrl("empty URL".to_string()));
    }
    let url = Url::parse(raw).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}
