//! OTLP/JSON request builders shared across test suites.

use serde_json::{Value, json};

pub fn string_attr(key: &str, value: &str) -> Value {
    json!({"key": key, "value": {"stringValue": value}})
}

fn attrs(pairs: &[(&str, &str)]) -> Value {
    Value::Array(pairs.iter().map(|(k, v)| string_attr(k, v)).collect())
}

pub fn span(trace_id: &str, span_id: &str, name: &str) -> Value {
    json!({
        "traceId": trace_id,
        "spanId": span_id,
        "name": name,
        "kind": 2,
        "startTimeUnixNano": "1700000000000000000",
        "endTimeUnixNano": "1700000000100000000",
        "status": {"code": 0, "message": ""}
    })
}

pub fn traces_request(
    resource_attrs: &[(&str, &str)],
    scope_name: Option<&str>,
    spans: Vec<Value>,
) -> Value {
    let mut scope_group = json!({"spans": spans});
    if let Some(name) = scope_name {
        scope_group["scope"] = json!({"name": name});
    }
    json!({
        "resourceSpans": [{
            "resource": {"attributes": attrs(resource_attrs)},
            "scopeSpans": [scope_group]
        }]
    })
}

pub fn gauge_metric(name: &str, value: f64) -> Value {
    json!({
        "name": name,
        "unit": "1",
        "gauge": {"dataPoints": [
            {"timeUnixNano": "1700000000000000000", "asDouble": value}
        ]}
    })
}

pub fn histogram_metric(name: &str, bucket_counts: &[u64], explicit_bounds: &[f64]) -> Value {
    let counts: Vec<String> = bucket_counts.iter().map(u64::to_string).collect();
    let total: u64 = bucket_counts.iter().sum();
    json!({
        "name": name,
        "unit": "ms",
        "histogram": {"dataPoints": [{
            "timeUnixNano": "1700000000000000000",
            "count": total.to_string(),
            "bucketCounts": counts,
            "explicitBounds": explicit_bounds
        }]}
    })
}

pub fn metrics_request(
    resource_attrs: &[(&str, &str)],
    scope_name: Option<&str>,
    metrics: Vec<Value>,
) -> Value {
    let mut scope_group = json!({"metrics": metrics});
    if let Some(name) = scope_name {
        scope_group["scope"] = json!({"name": name});
    }
    json!({
        "resourceMetrics": [{
            "resource": {"attributes": attrs(resource_attrs)},
            "scopeMetrics": [scope_group]
        }]
    })
}

pub fn log_record(
    severity_number: i64,
    severity_text: &str,
    body: &str,
    observed_time_unix_nano: &str,
) -> Value {
    json!({
        "observedTimeUnixNano": observed_time_unix_nano,
        "severityNumber": severity_number,
        "severityText": severity_text,
        "body": {"stringValue": body}
    })
}

pub fn logs_request(
    resource_attrs: &[(&str, &str)],
    scope_name: Option<&str>,
    records: Vec<Value>,
) -> Value {
    let mut scope_group = json!({"logRecords": records});
    if let Some(name) = scope_name {
        scope_group["scope"] = json!({"name": name});
    }
    json!({
        "resourceLogs": [{
            "resource": {"attributes": attrs(resource_attrs)},
            "scopeLogs": [scope_group]
        }]
    })
}
