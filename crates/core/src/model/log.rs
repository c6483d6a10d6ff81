use crate::model::common::{ResourceDecl, ScopeDecl};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogsPayload {
    pub resources: Vec<ResourceLogs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLogs {
    pub resource: ResourceDecl,
    pub scopes: Vec<ScopeLogs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeLogs {
    pub scope: ScopeDecl,
    pub records: Vec<LogRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub time_unix_nano: i64,
    /// Zero when the payload omits it; the zero sentinel is stored as-is
    /// rather than rejected.
    pub observed_time_unix_nano: i64,
    pub severity_number: i32,
    pub severity_text: String,
    /// The body as it appeared on the wire, serialized verbatim. Never
    /// coerced to a display string; None when the record carried no body.
    pub body_json: Option<String>,
    pub attrs_json: String,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub flags: i64,
}
