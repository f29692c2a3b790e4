use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::models::{PageAnalysis, PageRecord, Priority};
use crate::repository::PageRepository;

/// SQLite-backed page store. The embedded `PageAnalysis` is serialized to
/// a JSON column; everything else maps to flat columns.
pub struct SqlitePageRepository {
    pool: SqlitePool,
}

impl SqlitePageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for SqlitePageRepository {
    async fn load_all(&self) -> Result<Vec<PageRecord>> {
        let rows = sqlx::query("SELECT * FROM pages ORDER BY created_at, url")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load pages")?;

        rows.iter().map(record_from_row).collect()
    }

    async fn get(&self, url: &str) -> Result<Option<PageRecord>> {
        let row = sqlx::query("SELECT * FROM pages WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load page")?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn upsert(&self, record: &PageRecord) -> Result<()> {
        let analysis = record
            .analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to serialize analysis")?;

        sqlx::query(
            "INSERT INTO pages (url, title, description, focus_keyword, priority, \
             search_volume, ranking, page_speed_mobile, page_speed_desktop, analysis, \
             created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(url) DO UPDATE SET \
               title = excluded.title, \
               description = excluded.description, \
               focus_keyword = excluded.focus_keyword, \
               priority = excluded.priority, \
               search_volume = excluded.search_volume, \
               ranking = excluded.ranking, \
               page_speed_mobile = excluded.page_speed_mobile, \
               page_speed_desktop = excluded.page_speed_desktop, \
               analysis = excluded.analysis, \
               updated_at = excluded.updated_at",
        )
        .bind(&record.url)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.focus_keyword)
        .bind(record.priority.as_str())
        .bind(&record.search_volume)
        .bind(&record.ranking)
        .bind(record.page_speed_mobile.map(|v| v as i64))
        .bind(record.page_speed_desktop.map(|v| v as i64))
        .bind(analysis)
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to upsert page")?;

        Ok(())
    }

    async fn delete(&self, url: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pages WHERE url = ?")
            .bind(url)
            .execute(&self.pool)
            .await
            .context("Failed to delete page")?;

        Ok(result.rows_affected() > 0)
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PageRecord> {
    let analysis: Option<String> = row.get("analysis");
    let analysis: Option<PageAnalysis> = analysis
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("Failed to deserialize analysis column")?;

    let priority: String = row.get("priority");

    Ok(PageRecord {
        url: row.get("url"),
        title: row.get("title"),
        description: row.get("description"),
        focus_keyword: row.get("focus_keyword"),
        priority: priority.parse().unwrap_or(Priority::Medium),
        search_volume: row.get("search_volume"),
        ranking: row.get("ranking"),
        page_speed_mobile: row.get::<Option<i64>, _>("page_speed_mobile").map(|v| v as u8),
        page_speed_desktop: row
            .get::<Option<i64>, _>("page_speed_desktop")
            .map(|v| v as u8),
        analysis,
        created_at: parse_timestamp(row.get("created_at")),
        updated_at: parse_timestamp(row.get("updated_at")),
    })
}

fn parse_timestamp(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
