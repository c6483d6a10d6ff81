use std::fs;
use std::path::Path;
use std::time::Duration;

use otlite_core::error::{OtliteError, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};

use crate::schema::SCHEMA_SQL;

/// Handle on the SQLite store. Cheap to clone; every ingest call checks a
/// connection out of the pool and runs its own transaction, so no in-process
/// lock guards storage access.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    db_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    pub db_path: String,
    pub resources: i64,
    pub scopes: i64,
    pub spans: i64,
    pub metrics: i64,
    pub metric_data_points: i64,
    pub log_records: i64,
}

impl Store {
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| OtliteError::Io(format!("failed to create db dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(opts)
            .await
            .map_err(|e| OtliteError::Store(format!("failed to open sqlite db: {e}")))?;

        init_schema(&pool).await?;

        Ok(Self {
            pool,
            db_path: path.display().to_string(),
        })
    }

    pub async fn open_in_memory() -> Result<Self> {
        // An in-memory database exists per connection; pin the pool to a
        // single long-lived connection so every caller sees the same data.
        let opts = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .map_err(|e| OtliteError::Store(format!("failed to open in-memory db: {e}")))?;

        init_schema(&pool).await?;

        Ok(Self {
            pool,
            db_path: ":memory:".to_string(),
        })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            db_path: self.db_path.clone(),
            resources: scalar_i64(&self.pool, "SELECT COUNT(*) FROM resources").await?,
            scopes: scalar_i64(&self.pool, "SELECT COUNT(*) FROM instrumentation_scopes").await?,
            spans: scalar_i64(&self.pool, "SELECT COUNT(*) FROM spans").await?,
            metrics: scalar_i64(&self.pool, "SELECT COUNT(*) FROM metrics").await?,
            metric_data_points: scalar_i64(&self.pool, "SELECT COUNT(*) FROM metric_data_points")
                .await?,
            log_records: scalar_i64(&self.pool, "SELECT COUNT(*) FROM log_records").await?,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| OtliteError::Store(format!("failed to initialize schema: {e}")))?;
    Ok(())
}

async fn scalar_i64(pool: &SqlitePool, sql: &str) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .map_err(|e| OtliteError::Store(format!("query failed: {e}")))
}
