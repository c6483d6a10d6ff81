use otlite_core::error::{OtliteError, Result};
use otlite_core::model::metric::{
    ExponentialBuckets, ExponentialHistogramPoint, HistogramPoint, MetricData, MetricRecord,
    MetricsPayload, NumberPoint, NumberValue, PointCommon, ResourceMetrics, ScopeMetrics,
    SummaryPoint,
};
use serde_json::Value;

use crate::otlp::common::{decode_resource, decode_scope};
use crate::otlp::extract::{
    JsonObject, array_field, as_object, bool_field, canonical_attrs, enum_field, f64_field,
    i64_string_field, int_field, object_field, opt_i64_string_field, parse_f64, parse_i64,
    required_array,
    string_field,
};

/// Variant keys checked in fixed priority order; exactly one must be present.
const METRIC_VARIANTS: [&str; 5] = [
    "gauge",
    "sum",
    "histogram",
    "exponentialHistogram",
    "summary",
];

pub fn decode_metrics(payload: &Value) -> Result<MetricsPayload> {
    let root = as_object(payload, "metrics payload")?;
    let mut resources = Vec::new();
    for item in required_array(root, "resourceMetrics")? {
        let group = as_object(item, "resourceMetrics entry")?;
        let resource = decode_resource(group)?;
        let mut scopes = Vec::new();
        for scope_item in array_field(group, "scopeMetrics")? {
            let scope_group = as_object(scope_item, "scopeMetrics entry")?;
            let scope = decode_scope(scope_group)?;
            let mut metrics = Vec::new();
            for metric_item in array_field(scope_group, "metrics")? {
                metrics.push(decode_metric(as_object(metric_item, "metrics entry")?)?);
            }
            scopes.push(ScopeMetrics { scope, metrics });
        }
        resources.push(ResourceMetrics { resource, scopes });
    }
    Ok(MetricsPayload { resources })
}

fn decode_metric(obj: &JsonObject) -> Result<MetricRecord> {
    let name = string_field(obj, "name")?;
    if name.is_empty() {
        return Err(OtliteError::Schema(
            "metric.name: required non-empty string".to_string(),
        ));
    }

    let mut variant: Option<&str> = None;
    for key in METRIC_VARIANTS {
        if obj.get(key).is_some_and(|v| !v.is_null()) {
            if let Some(prev) = variant {
                return Err(OtliteError::Schema(format!(
                    "metric '{name}': both {prev} and {key} set; exactly one variant is allowed"
                )));
            }
            variant = Some(key);
        }
    }
    let Some(variant) = variant else {
        return Err(OtliteError::Schema(format!(
            "metric '{name}': expected exactly one of gauge/sum/histogram/exponentialHistogram/summary"
        )));
    };
    let body = as_object(&obj[variant], variant)?;

    let data = match variant {
        "gauge" => MetricData::Gauge {
            points: decode_number_points(body)?,
        },
        "sum" => MetricData::Sum {
            // Temporality and monotonicity are declared once on the metric
            // and copied onto every stored point downstream.
            aggregation_temporality: enum_field(body, "aggregationTemporality", 2)? as i32,
            is_monotonic: bool_field(body, "isMonotonic")?,
            points: decode_number_points(body)?,
        },
        "histogram" => MetricData::Histogram {
            points: decode_points(body, decode_histogram_point)?,
        },
        "exponentialHistogram" => MetricData::ExponentialHistogram {
            points: decode_points(body, decode_exponential_histogram_point)?,
        },
        _ => MetricData::Summary {
            points: decode_points(body, decode_summary_point)?,
        },
    };

    Ok(MetricRecord {
        name,
        description: string_field(obj, "description")?,
        unit: string_field(obj, "unit")?,
        data,
    })
}

fn decode_points<T>(
    body: &JsonObject,
    decode: fn(&JsonObject) -> Result<T>,
) -> Result<Vec<T>> {
    let items = array_field(body, "dataPoints")?;
    let mut points = Vec::with_capacity(items.len());
    for item in items {
        points.push(decode(as_object(item, "dataPoints entry")?)?);
    }
    Ok(points)
}

fn decode_number_points(body: &JsonObject) -> Result<Vec<NumberPoint>> {
    decode_points(body, decode_number_point)
}

fn decode_point_common(obj: &JsonObject) -> Result<PointCommon> {
    Ok(PointCommon {
        attrs_json: canonical_attrs(array_field(obj, "attributes")?, "dataPoint.attributes")?,
        start_time_unix_nano: i64_string_field(obj, "startTimeUnixNano")?,
        time_unix_nano: i64_string_field(obj, "timeUnixNano")?,
        flags: int_field(obj, "flags")?,
        exemplars_json: obj
            .get("exemplars")
            .filter(|v| !v.is_null())
            .map(|v| v.to_string()),
    })
}

fn decode_number_point(obj: &JsonObject) -> Result<NumberPoint> {
    // asDouble XOR asInt; a point carrying neither is valid on the wire.
    let value = if let Some(double) = f64_field(obj, "asDouble")? {
        Some(NumberValue::Double(double))
    } else {
        opt_i64_string_field(obj, "asInt")?.map(NumberValue::Int)
    };
    Ok(NumberPoint {
        common: decode_point_common(obj)?,
        value,
    })
}

fn decode_histogram_point(obj: &JsonObject) -> Result<HistogramPoint> {
    Ok(HistogramPoint {
        common: decode_point_common(obj)?,
        count: i64_string_field(obj, "count")?,
        sum: f64_field(obj, "sum")?,
        min: f64_field(obj, "min")?,
        max: f64_field(obj, "max")?,
        bucket_counts_json: i64_array_json(array_field(obj, "bucketCounts")?, "bucketCounts")?,
        explicit_bounds_json: f64_array_json(array_field(obj, "explicitBounds")?, "explicitBounds")?,
    })
}

fn decode_exponential_histogram_point(obj: &JsonObject) -> Result<ExponentialHistogramPoint> {
    Ok(ExponentialHistogramPoint {
        common: decode_point_common(obj)?,
        count: i64_string_field(obj, "count")?,
        sum: f64_field(obj, "sum")?,
        min: f64_field(obj, "min")?,
        max: f64_field(obj, "max")?,
        scale: int_field(obj, "scale")? as i32,
        zero_count: i64_string_field(obj, "zeroCount")?,
        positive: decode_buckets(object_field(obj, "positive")?)?,
        negative: decode_buckets(object_field(obj, "negative")?)?,
    })
}

fn decode_buckets(obj: Option<&JsonObject>) -> Result<ExponentialBuckets> {
    let Some(obj) = obj else {
        return Ok(ExponentialBuckets::default());
    };
    Ok(ExponentialBuckets {
        offset: int_field(obj, "offset")? as i32,
        bucket_counts_json: i64_array_json(array_field(obj, "bucketCounts")?, "bucketCounts")?,
    })
}

fn decode_summary_point(obj: &JsonObject) -> Result<SummaryPoint> {
    let mut quantiles = Vec::new();
    for (i, item) in array_field(obj, "quantileValues")?.iter().enumerate() {
        let entry = as_object(item, &format!("quantileValues[{i}]"))?;
        quantiles.push(serde_json::json!({
            "quantile": f64_field(entry, "quantile")?.unwrap_or(0.0),
            "value": f64_field(entry, "value")?.unwrap_or(0.0),
        }));
    }
    let quantile_values_json = serde_json::to_string(&quantiles)
        .map_err(|e| OtliteError::Encode(format!("failed to serialize quantiles: {e}")))?;

    Ok(SummaryPoint {
        common: decode_point_common(obj)?,
        count: i64_string_field(obj, "count")?,
        sum: f64_field(obj, "sum")?,
        quantile_values_json,
    })
}

fn i64_array_json(items: &[Value], field: &str) -> Result<String> {
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(parse_i64(item, &format!("{field}[{i}]"))?);
    }
    serde_json::to_string(&out)
        .map_err(|e| OtliteError::Encode(format!("failed to serialize {field}: {e}")))
}

fn f64_array_json(items: &[Value], field: &str) -> Result<String> {
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(parse_f64(item, &format!("{field}[{i}]"))?);
    }
    serde_json::to_string(&out)
        .map_err(|e| OtliteError::Encode(format!("failed to serialize {field}: {e}")))
}
