use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Creates a SQLite connection pool, creating the database file on first run.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite at {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Bootstraps the schema. Candidates live in a single keyed table with a
/// category column: global identifier uniqueness is one constraint, and the
/// category index gives per-partition fetches. `seq` preserves insertion
/// order so partition fetches are reproducible.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            seq              INTEGER PRIMARY KEY AUTOINCREMENT,
            id               BLOB NOT NULL UNIQUE,
            name             TEXT NOT NULL,
            email            TEXT NOT NULL,
            current_role     TEXT NOT NULL,
            experience_years INTEGER NOT NULL,
            skills           TEXT NOT NULL,
            education        TEXT NOT NULL DEFAULT '',
            location         TEXT NOT NULL DEFAULT '',
            category         TEXT NOT NULL,
            created_at       TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_candidates_category ON candidates(category)")
        .execute(pool)
        .await?;

    info!("Schema ready");
    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory SQLite pool");
    init_schema(&pool).await.expect("schema bootstrap");
    pool
}
