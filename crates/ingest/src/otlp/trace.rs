use otlite_core::error::{OtliteError, Result};
use otlite_core::model::trace::{ResourceSpans, ScopeSpans, SpanEvent, SpanLink, SpanRecord, TracesPayload};
use serde_json::Value;

use crate::otlp::common::{decode_resource, decode_scope};
use crate::otlp::extract::{
    JsonObject, array_field, as_object, canonical_attrs, enum_field, i64_string_field, int_field,
    object_field, opt_string_field, required_array, string_field,
};

/// One validating pass over a trace export request. Any malformed element at
/// any nesting level fails the whole payload; nothing is skipped silently.
pub fn decode_traces(payload: &Value) -> Result<TracesPayload> {
    let root = as_object(payload, "traces payload")?;
    let mut resources = Vec::new();
    for item in required_array(root, "resourceSpans")? {
        let group = as_object(item, "resourceSpans entry")?;
        let resource = decode_resource(group)?;
        let mut scopes = Vec::new();
        for scope_item in array_field(group, "scopeSpans")? {
            let scope_group = as_object(scope_item, "scopeSpans entry")?;
            let scope = decode_scope(scope_group)?;
            let mut spans = Vec::new();
            for span_item in array_field(scope_group, "spans")? {
                spans.push(decode_span(as_object(span_item, "spans entry")?)?);
            }
            scopes.push(ScopeSpans { scope, spans });
        }
        resources.push(ResourceSpans { resource, scopes });
    }
    Ok(TracesPayload { resources })
}

fn decode_span(obj: &JsonObject) -> Result<SpanRecord> {
    let trace_id = string_field(obj, "traceId")?;
    let span_id = string_field(obj, "spanId")?;
    let name = string_field(obj, "name")?;
    if trace_id.is_empty() {
        return Err(OtliteError::Schema(
            "span.traceId: required non-empty string".to_string(),
        ));
    }
    if span_id.is_empty() {
        return Err(OtliteError::Schema(
            "span.spanId: required non-empty string".to_string(),
        ));
    }
    if name.is_empty() {
        return Err(OtliteError::Schema(format!(
            "span {span_id}: name is required"
        )));
    }

    let (status_code, status_message) = match object_field(obj, "status")? {
        Some(status) => (
            int_field(status, "code")? as i32,
            string_field(status, "message")?,
        ),
        None => (0, String::new()),
    };

    let mut events = Vec::new();
    for item in array_field(obj, "events")? {
        events.push(decode_event(as_object(item, "events entry")?)?);
    }
    let mut links = Vec::new();
    for item in array_field(obj, "links")? {
        links.push(decode_link(as_object(item, "links entry")?)?);
    }

    Ok(SpanRecord {
        parent_span_id: opt_string_field(obj, "parentSpanId")?,
        trace_state: opt_string_field(obj, "traceState")?,
        kind: enum_field(obj, "kind", 5)? as i32,
        start_time_unix_nano: i64_string_field(obj, "startTimeUnixNano")?,
        end_time_unix_nano: i64_string_field(obj, "endTimeUnixNano")?,
        attrs_json: canonical_attrs(array_field(obj, "attributes")?, "span.attributes")?,
        dropped_attributes_count: int_field(obj, "droppedAttributesCount")?,
        status_code,
        status_message,
        flags: int_field(obj, "flags")?,
        events,
        links,
        trace_id,
        span_id,
        name,
    })
}

fn decode_event(obj: &JsonObject) -> Result<SpanEvent> {
    Ok(SpanEvent {
        time_unix_nano: i64_string_field(obj, "timeUnixNano")?,
        name: string_field(obj, "name")?,
        attrs_json: canonical_attrs(array_field(obj, "attributes")?, "event.attributes")?,
        dropped_attributes_count: int_field(obj, "droppedAttributesCount")?,
    })
}

fn decode_link(obj: &JsonObject) -> Result<SpanLink> {
    Ok(SpanLink {
        trace_id: string_field(obj, "traceId")?,
        span_id: string_field(obj, "spanId")?,
        trace_state: opt_string_field(obj, "traceState")?,
        attrs_json: canonical_attrs(array_field(obj, "attributes")?, "link.attributes")?,
        dropped_attributes_count: int_field(obj, "droppedAttributesCount")?,
        flags: int_field(obj, "flags")?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn span_json() -> Value {
        json!({
            "traceId": "4bf92f3577b34da6a3ce929d0e0e4736",
            "spanId": "00f067aa0ba902b7",
            "name": "GET /v1/orders",
            "kind": 2,
            "startTimeUnixNano": "1700000000000000000",
            "endTimeUnixNano": "1700000000100000000",
            "attributes": [
                {"key": "http.method", "value": {"stringValue": "GET"}}
            ],
            "status": {"code": 2, "message": "deadline exceeded"},
            "events": [
                {"timeUnixNano": "1700000000050000000", "name": "retry"}
            ],
            "links": [
                {"traceId": "ffff2f3577b34da6a3ce929d0e0e4736", "spanId": "aaaa67aa0ba902b7"}
            ]
        })
    }

    fn request(spans: Vec<Value>) -> Value {
        json!({
            "resourceSpans": [{
                "resource": {"attributes": [
                    {"key": "service.name", "value": {"stringValue": "api"}}
                ]},
                "scopeSpans": [{
                    "scope": {"name": "lib"},
                    "spans": spans
                }]
            }]
        })
    }

    #[test]
    fn decodes_full_span() {
        let payload = decode_traces(&request(vec![span_json()])).unwrap();
        assert_eq!(payload.resources.len(), 1);
        let span = &payload.resources[0].scopes[0].spans[0];
        assert_eq!(span.trace_id, "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_eq!(span.kind, 2);
        assert_eq!(span.start_time_unix_nano, 1_700_000_000_000_000_000);
        assert_eq!(span.attrs_json, "{\"http.method\":\"GET\"}");
        assert_eq!(span.status_code, 2);
        assert_eq!(span.status_message, "deadline exceeded");
        assert_eq!(span.events.len(), 1);
        assert_eq!(span.events[0].name, "retry");
        assert_eq!(span.links.len(), 1);
        assert_eq!(span.links[0].span_id, "aaaa67aa0ba902b7");
    }

    #[test]
    fn missing_resource_spans_is_fatal() {
        let err = decode_traces(&json!({"resourceLogs": []})).unwrap_err();
        assert!(err.to_string().contains("resourceSpans"));
    }

    #[test]
    fn span_without_span_id_rejects_payload() {
        let mut bad = span_json();
        bad.as_object_mut().unwrap().remove("spanId");
        let err = decode_traces(&request(vec![span_json(), bad])).unwrap_err();
        assert!(err.to_string().contains("spanId"));
    }

    #[test]
    fn out_of_range_kind_rejects_payload() {
        let mut bad = span_json();
        bad["kind"] = json!(6);
        assert!(decode_traces(&request(vec![bad])).is_err());
    }

    #[test]
    fn non_object_span_entry_rejects_payload() {
        let err = decode_traces(&request(vec![json!("junk")])).unwrap_err();
        assert!(matches!(err, OtliteError::Schema(_)));
    }

    #[test]
    fn missing_scope_and_resource_decode_to_defaults() {
        let payload = decode_traces(&json!({
            "resourceSpans": [{"scopeSpans": [{"spans": [span_json()]}]}]
        }))
        .unwrap();
        let group = &payload.resources[0];
        assert_eq!(group.resource.attrs_json, "{}");
        assert_eq!(group.scopes[0].scope.name, "");
    }

    #[test]
    fn empty_parent_span_id_becomes_none() {
        let mut root = span_json();
        root["parentSpanId"] = json!("");
        let payload = decode_traces(&request(vec![root])).unwrap();
        assert_eq!(payload.resources[0].scopes[0].spans[0].parent_span_id, None);
    }
}
