//! SQLite pool setup.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Configure SQLite pragmas for each new connection.
async fn configure_sqlite_pragmas(conn: &mut sqlx::SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Executor;

    // WAL mode allows concurrent reads during writes
    conn.execute("PRAGMA journal_mode = WAL").await?;

    // NORMAL synchronous is still safe with WAL and much faster
    conn.execute("PRAGMA synchronous = NORMAL").await?;

    // 5 second timeout for busy connections
    conn.execute("PRAGMA busy_timeout = 5000").await?;

    conn.execute("PRAGMA foreign_keys = ON").await?;

    Ok(())
}

/// Open (or create) the database at the given path and run migrations.
pub async fn init_db(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("failed to create data dir: {}", parent.display()))?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", path.display());
    log::info!("Database URL: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                configure_sqlite_pragmas(conn).await?;
                Ok(())
            })
        })
        .connect(&db_url)
        .await
        .context(format!("failed to connect to database at {}", path.display()))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    log::info!("Database initialized at {}", path.display());
    Ok(pool)
}
