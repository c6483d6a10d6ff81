//! Get-or-create resolution for the shared entities every signal references.
//!
//! Each resolver is a single atomic upsert round-trip against the unique key
//! of its table. A separate existence check followed by an insert is a known
//! duplicate-row race under concurrent ingestion and must not come back.

use otlite_core::error::{OtliteError, Result};
use otlite_core::model::common::{ResourceDecl, ScopeDecl};
use otlite_core::model::metric::MetricRecord;
use sqlx::{Sqlite, Transaction};

/// Resolve a resource declaration to its canonical row id. The no-op
/// `DO UPDATE` makes `RETURNING id` total on conflict.
pub(crate) async fn resolve_resource(
    tx: &mut Transaction<'_, Sqlite>,
    resource: &ResourceDecl,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO resources (attributes, schema_url) VALUES (?1, ?2)
         ON CONFLICT (attributes, schema_url) DO UPDATE SET schema_url = excluded.schema_url
         RETURNING id",
    )
    .bind(&resource.attrs_json)
    .bind(&resource.schema_url)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to resolve resource: {e}")))
}

pub(crate) async fn resolve_scope(
    tx: &mut Transaction<'_, Sqlite>,
    scope: &ScopeDecl,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO instrumentation_scopes (name, version, attributes, schema_url)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (name, version, attributes, schema_url)
         DO UPDATE SET schema_url = excluded.schema_url
         RETURNING id",
    )
    .bind(&scope.name)
    .bind(&scope.version)
    .bind(&scope.attrs_json)
    .bind(&scope.schema_url)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to resolve scope: {e}")))
}

/// Resolve a metric series. Re-declaring a series refreshes the
/// documentation-only columns (last write wins); the dedup key columns are
/// never touched.
pub(crate) async fn resolve_metric(
    tx: &mut Transaction<'_, Sqlite>,
    metric: &MetricRecord,
    resource_id: i64,
    scope_id: i64,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO metrics (name, description, unit, metric_type, resource_id, scope_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (name, metric_type, resource_id, scope_id)
         DO UPDATE SET description = excluded.description, unit = excluded.unit
         RETURNING id",
    )
    .bind(&metric.name)
    .bind(&metric.description)
    .bind(&metric.unit)
    .bind(metric.data.metric_type())
    .bind(resource_id)
    .bind(scope_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to resolve metric {}: {e}", metric.name)))
}
