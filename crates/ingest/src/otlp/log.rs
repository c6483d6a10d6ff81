use otlite_core::error::{OtliteError, Result};
use otlite_core::model::log::{LogRecord, LogsPayload, ResourceLogs, ScopeLogs};
use serde_json::Value;

use crate::otlp::common::{decode_resource, decode_scope};
use crate::otlp::extract::{
    JsonObject, array_field, as_object, canonical_attrs, enum_field, i64_string_field, int_field,
    required_array, string_field, wrong_type,
};

pub fn decode_logs(payload: &Value) -> Result<LogsPayload> {
    let root = as_object(payload, "logs payload")?;
    let mut resources = Vec::new();
    for item in required_array(root, "resourceLogs")? {
        let group = as_object(item, "resourceLogs entry")?;
        let resource = decode_resource(group)?;
        let mut scopes = Vec::new();
        for scope_item in array_field(group, "scopeLogs")? {
            let scope_group = as_object(scope_item, "scopeLogs entry")?;
            let scope = decode_scope(scope_group)?;
            let mut records = Vec::new();
            for record_item in array_field(scope_group, "logRecords")? {
                records.push(decode_log_record(as_object(record_item, "logRecords entry")?)?);
            }
            scopes.push(ScopeLogs { scope, records });
        }
        resources.push(ResourceLogs { resource, scopes });
    }
    Ok(LogsPayload { resources })
}

fn decode_log_record(obj: &JsonObject) -> Result<LogRecord> {
    Ok(LogRecord {
        time_unix_nano: i64_string_field(obj, "timeUnixNano")?,
        observed_time_unix_nano: i64_string_field(obj, "observedTimeUnixNano")?,
        severity_number: enum_field(obj, "severityNumber", 24)? as i32,
        severity_text: string_field(obj, "severityText")?,
        // The body stays the full wire value, structured or not; it is never
        // flattened to a display string.
        body_json: obj
            .get("body")
            .filter(|v| !v.is_null())
            .map(|v| v.to_string()),
        attrs_json: canonical_attrs(array_field(obj, "attributes")?, "logRecord.attributes")?,
        trace_id: correlation_id(obj, "traceId")?,
        span_id: correlation_id(obj, "spanId")?,
        flags: int_field(obj, "flags")?,
    })
}

/// Correlation ids are optional, but when present they must be non-empty
/// strings. They reference spans by value; the span may not exist yet.
fn correlation_id(obj: &JsonObject, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        Some(Value::String(_)) => Err(OtliteError::Schema(format!(
            "field '{field}': must be a non-empty string when present"
        ))),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}
