use otlite_core::error::{OtliteError, Result};
use otlite_core::model::log::{LogRecord, LogsPayload};
use sqlx::{Sqlite, Transaction};

use crate::Store;
use crate::entities::{resolve_resource, resolve_scope};

impl Store {
    /// Persist one logs export request as a single transaction.
    pub async fn insert_logs(&self, payload: &LogsPayload) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| OtliteError::Store(format!("begin tx failed: {e}")))?;

        for group in &payload.resources {
            let resource_id = resolve_resource(&mut tx, &group.resource).await?;
            for scope_group in &group.scopes {
                let scope_id = resolve_scope(&mut tx, &scope_group.scope).await?;
                for record in &scope_group.records {
                    insert_log_record(&mut tx, record, resource_id, scope_id).await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| OtliteError::Store(format!("commit logs failed: {e}")))
    }
}

async fn insert_log_record(
    tx: &mut Transaction<'_, Sqlite>,
    record: &LogRecord,
    resource_id: i64,
    scope_id: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO log_records (
           time_unix_nano, observed_time_unix_nano, severity_number, severity_text,
           body, attributes, trace_id, span_id, flags, resource_id, scope_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(record.time_unix_nano)
    .bind(record.observed_time_unix_nano)
    .bind(record.severity_number)
    .bind(&record.severity_text)
    .bind(&record.body_json)
    .bind(&record.attrs_json)
    .bind(&record.trace_id)
    .bind(&record.span_id)
    .bind(record.flags)
    .bind(resource_id)
    .bind(scope_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert log record: {e}")))?;
    Ok(())
}
