use crate::model::common::{ResourceDecl, ScopeDecl};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TracesPayload {
    pub resources: Vec<ResourceSpans>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpans {
    pub resource: ResourceDecl,
    pub scopes: Vec<ScopeSpans>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSpans {
    pub scope: ScopeDecl,
    pub spans: Vec<SpanRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub trace_state: Option<String>,
    pub name: String,
    pub kind: i32,
    pub start_time_unix_nano: i64,
    pub end_time_unix_nano: i64,
    pub attrs_json: String,
    pub dropped_attributes_count: i64,
    pub status_code: i32,
    pub status_message: String,
    pub flags: i64,
    pub events: Vec<SpanEvent>,
    pub links: Vec<SpanLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanEvent {
    pub time_unix_nano: i64,
    pub name: String,
    pub attrs_json: String,
    pub dropped_attributes_count: i64,
}

/// Links carry the hex ids of the linked span verbatim; they are resolved at
/// query time, not enforced at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLink {
    pub trace_id: String,
    pub span_id: String,
    pub trace_state: Option<String>,
    pub attrs_json: String,
    pub dropped_attributes_count: i64,
    pub flags: i64,
}
