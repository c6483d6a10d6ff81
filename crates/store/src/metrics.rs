use otlite_core::error::{OtliteError, Result};
use otlite_core::model::metric::{
    ExponentialHistogramPoint, HistogramPoint, MetricData, MetricsPayload, NumberPoint,
    NumberValue, SummaryPoint,
};
use sqlx::{Sqlite, Transaction};

use crate::Store;
use crate::entities::{resolve_metric, resolve_resource, resolve_scope};

impl Store {
    /// Persist one metrics export request as a single transaction.
    pub async fn insert_metrics(&self, payload: &MetricsPayload) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| OtliteError::Store(format!("begin tx failed: {e}")))?;

        for group in &payload.resources {
            let resource_id = resolve_resource(&mut tx, &group.resource).await?;
            for scope_group in &group.scopes {
                let scope_id = resolve_scope(&mut tx, &scope_group.scope).await?;
                for metric in &scope_group.metrics {
                    let metric_id = resolve_metric(&mut tx, metric, resource_id, scope_id).await?;
                    insert_data_points(&mut tx, metric_id, &metric.data).await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| OtliteError::Store(format!("commit metrics failed: {e}")))
    }
}

async fn insert_data_points(
    tx: &mut Transaction<'_, Sqlite>,
    metric_id: i64,
    data: &MetricData,
) -> Result<()> {
    match data {
        MetricData::Gauge { points } => {
            for point in points {
                insert_number_point(tx, metric_id, point, None, None).await?;
            }
        }
        MetricData::Sum {
            aggregation_temporality,
            is_monotonic,
            points,
        } => {
            // Temporality and monotonicity live on the parent metric object
            // on the wire but are copied onto every stored point.
            for point in points {
                insert_number_point(
                    tx,
                    metric_id,
                    point,
                    Some(*aggregation_temporality),
                    Some(*is_monotonic),
                )
                .await?;
            }
        }
        MetricData::Histogram { points } => {
            for point in points {
                insert_histogram_point(tx, metric_id, point).await?;
            }
        }
        MetricData::ExponentialHistogram { points } => {
            for point in points {
                insert_exponential_histogram_point(tx, metric_id, point).await?;
            }
        }
        MetricData::Summary { points } => {
            for point in points {
                insert_summary_point(tx, metric_id, point).await?;
            }
        }
    }
    Ok(())
}

async fn insert_number_point(
    tx: &mut Transaction<'_, Sqlite>,
    metric_id: i64,
    point: &NumberPoint,
    aggregation_temporality: Option<i32>,
    is_monotonic: Option<bool>,
) -> Result<()> {
    let (value_double, value_int) = match point.value {
        Some(NumberValue::Double(v)) => (Some(v), None),
        Some(NumberValue::Int(v)) => (None, Some(v)),
        None => (None, None),
    };

    sqlx::query(
        "INSERT INTO metric_data_points (
           metric_id, attributes, start_time_unix_nano, time_unix_nano, flags, exemplars,
           value_double, value_int, aggregation_temporality, is_monotonic
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(metric_id)
    .bind(&point.common.attrs_json)
    .bind(point.common.start_time_unix_nano)
    .bind(point.common.time_unix_nano)
    .bind(point.common.flags)
    .bind(&point.common.exemplars_json)
    .bind(value_double)
    .bind(value_int)
    .bind(aggregation_temporality)
    .bind(is_monotonic)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert number point: {e}")))?;
    Ok(())
}

async fn insert_histogram_point(
    tx: &mut Transaction<'_, Sqlite>,
    metric_id: i64,
    point: &HistogramPoint,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO metric_data_points (
           metric_id, attributes, start_time_unix_nano, time_unix_nano, flags, exemplars,
           count, sum_value, min_value, max_value, bucket_counts, explicit_bounds
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(metric_id)
    .bind(&point.common.attrs_json)
    .bind(point.common.start_time_unix_nano)
    .bind(point.common.time_unix_nano)
    .bind(point.common.flags)
    .bind(&point.common.exemplars_json)
    .bind(point.count)
    .bind(point.sum)
    .bind(point.min)
    .bind(point.max)
    .bind(&point.bucket_counts_json)
    .bind(&point.explicit_bounds_json)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert histogram point: {e}")))?;
    Ok(())
}

async fn insert_exponential_histogram_point(
    tx: &mut Transaction<'_, Sqlite>,
    metric_id: i64,
    point: &ExponentialHistogramPoint,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO metric_data_points (
           metric_id, attributes, start_time_unix_nano, time_unix_nano, flags, exemplars,
           count, sum_value, min_value, max_value, scale, zero_count,
           positive_offset, positive_bucket_counts, negative_offset, negative_bucket_counts
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
    )
    .bind(metric_id)
    .bind(&point.common.attrs_json)
    .bind(point.common.start_time_unix_nano)
    .bind(point.common.time_unix_nano)
    .bind(point.common.flags)
    .bind(&point.common.exemplars_json)
    .bind(point.count)
    .bind(point.sum)
    .bind(point.min)
    .bind(point.max)
    .bind(point.scale)
    .bind(point.zero_count)
    .bind(point.positive.offset)
    .bind(&point.positive.bucket_counts_json)
    .bind(point.negative.offset)
    .bind(&point.negative.bucket_counts_json)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert exponential histogram point: {e}")))?;
    Ok(())
}

async fn insert_summary_point(
    tx: &mut Transaction<'_, Sqlite>,
    metric_id: i64,
    point: &SummaryPoint,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO metric_data_points (
           metric_id, attributes, start_time_unix_nano, time_unix_nano, flags, exemplars,
           count, sum_value, quantile_values
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(metric_id)
    .bind(&point.common.attrs_json)
    .bind(point.common.start_time_unix_nano)
    .bind(point.common.time_unix_nano)
    .bind(point.common.flags)
    .bind(&point.common.exemplars_json)
    .bind(point.count)
    .bind(point.sum)
    .bind(&point.quantile_values_json)
    .execute(&mut **tx)
    .await
    .map_err(|e| OtliteError::Store(format!("failed to insert summary point: {e}")))?;
    Ok(())
}
