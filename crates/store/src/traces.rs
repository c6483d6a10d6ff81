use otlite_core::error::{OtliteError, Result};
use otlite_core::model::trace::{SpanEvent, SpanLink, SpanRecord, TracesPayload};
use sqlx::{Sqlite, Transaction};

use crate::Store;
use crate::entities::{resolve_resource, resolve_scope};

impl Store {
    /// Persist one trace export request as a single transaction. Any failure
    /// rolls back the whole payload; nothing from the call stays visible.
    pub async fn insert_traces(&self, payload: &TracesPayload) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| OtliteError::Store(format!("begin tx failed: {e}")))?;

        for group in &payload.resources {
            let resource_id = resolve_resource(&mut tx, &group.resource).await?;
            for scope_group in &group.scopes {
                let scope_id = resolve_scope(&mut tx, &scope_group.scope).await?;
                for span in &scope_group.spans {
                    insert_span(&mut tx, span, resource_id, scope_id).await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| OtliteError::Store(format!("commit traces failed: {e}")))
    }
}

async fn insert_span(
    tx: &mut Transaction<'_, Sqlite>,
    span: &SpanRecord,
    resource_id: i64,
    scope_id: i64,
) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO spans (
           trace_id, span_id, parent_span_id, trace_state,
           name, kind, start_time_unix_nano, end_time_unix_nano,
           attributes, dropped_attributes_count,
           status_code, status_message, flags,
           resource_id, scope_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )
    .bind(&span.trace_id)
    .bind(&span.span_id)
    .bind(&span.parent_span_id)
    .bind(&span.trace_state)
    .bind(&span.name)
    .bind(span.kind)
    .bind(span.start_time_unix_nano)
    .bind(span.end_time_unix_nano)
    .bind(&span.attrs_json)
    .bind(span.dropped_attributes_count)
    .bind(span.status_code)
    .bind(&span.status_message)
    .bind(span.flags)
    .bind(resource_id)
    .bind(scope_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert span {}: {e}", span.span_id)))?;

    // Events and links hang off the storage surrogate id, not the OTLP hex
    // ids, which repeat across retried exports.
    let span_ref = result.last_insert_rowid();
    for event in &span.events {
        insert_span_event(tx, event, span_ref).await?;
    }
    for link in &span.links {
        insert_span_link(tx, link, span_ref).await?;
    }

    Ok(())
}

async fn insert_span_event(
    tx: &mut Transaction<'_, Sqlite>,
    event: &SpanEvent,
    span_ref: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO span_events (span_ref, time_unix_nano, name, attributes, dropped_attributes_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(span_ref)
    .bind(event.time_unix_nano)
    .bind(&event.name)
    .bind(&event.attrs_json)
    .bind(event.dropped_attributes_count)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert span event: {e}")))?;
    Ok(())
}

async fn insert_span_link(
    tx: &mut Transaction<'_, Sqlite>,
    link: &SpanLink,
    span_ref: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO span_links (span_ref, trace_id, span_id, trace_state, attributes, dropped_attributes_count, flags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(span_ref)
    .bind(&link.trace_id)
    .bind(&link.span_id)
    .bind(&link.trace_state)
    .bind(&link.attrs_json)
    .bind(link.dropped_attributes_count)
    .bind(link.flags)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert span link: {e}")))?;
    Ok(())
}
