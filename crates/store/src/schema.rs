pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  attributes TEXT NOT NULL DEFAULT '{}',
  schema_url TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS instrumentation_scopes (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL DEFAULT '',
  version TEXT NOT NULL DEFAULT '',
  attributes TEXT NOT NULL DEFAULT '{}',
  schema_url TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS spans (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  trace_id TEXT NOT NULL,
  span_id TEXT NOT NULL,
  parent_span_id TEXT,
  trace_state TEXT,
  name TEXT NOT NULL,
  kind INTEGER NOT NULL DEFAULT 0,
  start_time_unix_nano INTEGER NOT NULL DEFAULT 0,
  end_time_unix_nano INTEGER NOT NULL DEFAULT 0,
  attributes TEXT NOT NULL DEFAULT '{}',
  dropped_attributes_count INTEGER NOT NULL DEFAULT 0,
  status_code INTEGER NOT NULL DEFAULT 0,
  status_message TEXT NOT NULL DEFAULT '',
  flags INTEGER NOT NULL DEFAULT 0,
  resource_id INTEGER NOT NULL REFERENCES resources (id),
  scope_id INTEGER NOT NULL REFERENCES instrumentation_scopes (id)
);

CREATE TABLE IF NOT EXISTS span_events (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  span_ref INTEGER NOT NULL REFERENCES spans (id) ON DELETE CASCADE,
  time_unix_nano INTEGER NOT NULL DEFAULT 0,
  name TEXT NOT NULL DEFAULT '',
  attributes TEXT NOT NULL DEFAULT '{}',
  dropped_attributes_count INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS span_links (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  span_ref INTEGER NOT NULL REFERENCES spans (id) ON DELETE CASCADE,
  trace_id TEXT NOT NULL DEFAULT '',
  span_id TEXT NOT NULL DEFAULT '',
  trace_state TEXT,
  attributes TEXT NOT NULL DEFAULT '{}',
  dropped_attributes_count INTEGER NOT NULL DEFAULT 0,
  flags INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS metrics (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  unit TEXT NOT NULL DEFAULT '',
  metric_type TEXT NOT NULL,
  resource_id INTEGER NOT NULL REFERENCES resources (id),
  scope_id INTEGER NOT NULL REFERENCES instrumentation_scopes (id)
);

CREATE TABLE IF NOT EXISTS metric_data_points (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  metric_id INTEGER NOT NULL REFERENCES metrics (id),
  attributes TEXT NOT NULL DEFAULT '{}',
  start_time_unix_nano INTEGER NOT NULL DEFAULT 0,
  time_unix_nano INTEGER NOT NULL DEFAULT 0,
  flags INTEGER NOT NULL DEFAULT 0,
  value_double REAL,
  value_int INTEGER,
  aggregation_temporality INTEGER,
  is_monotonic INTEGER,
  count INTEGER,
  sum_value REAL,
  min_value REAL,
  max_value REAL,
  bucket_counts TEXT,
  explicit_bounds TEXT,
  scale INTEGER,
  zero_count INTEGER,
  positive_offset INTEGER,
  positive_bucket_counts TEXT,
  negative_offset INTEGER,
  negative_bucket_counts TEXT,
  quantile_values TEXT,
  exemplars TEXT
);

CREATE TABLE IF NOT EXISTS log_records (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  time_unix_nano INTEGER NOT NULL DEFAULT 0,
  observed_time_unix_nano INTEGER NOT NULL DEFAULT 0,
  severity_number INTEGER NOT NULL DEFAULT 0,
  severity_text TEXT NOT NULL DEFAULT '',
  body TEXT,
  attributes TEXT NOT NULL DEFAULT '{}',
  trace_id TEXT,
  span_id TEXT,
  flags INTEGER NOT NULL DEFAULT 0,
  resource_id INTEGER NOT NULL REFERENCES resources (id),
  scope_id INTEGER NOT NULL REFERENCES instrumentation_scopes (id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_resources_unique
  ON resources (attributes, schema_url);
CREATE UNIQUE INDEX IF NOT EXISTS idx_scopes_unique
  ON instrumentation_scopes (name, version, attributes, schema_url);
CREATE UNIQUE INDEX IF NOT EXISTS idx_metrics_unique
  ON metrics (name, metric_type, resource_id, scope_id);

CREATE INDEX IF NOT EXISTS idx_spans_trace_id ON spans (trace_id);
CREATE INDEX IF NOT EXISTS idx_spans_resource_id ON spans (resource_id);
CREATE INDEX IF NOT EXISTS idx_spans_start_time ON spans (start_time_unix_nano);
CREATE INDEX IF NOT EXISTS idx_span_events_span_ref ON span_events (span_ref);
CREATE INDEX IF NOT EXISTS idx_span_links_span_ref ON span_links (span_ref);
CREATE INDEX IF NOT EXISTS idx_metrics_resource_id ON metrics (resource_id);
CREATE INDEX IF NOT EXISTS idx_metric_points_metric_id ON metric_data_points (metric_id);
CREATE INDEX IF NOT EXISTS idx_log_records_trace_id ON log_records (trace_id);
CREATE INDEX IF NOT EXISTS idx_log_records_resource_id ON log_records (resource_id);
CREATE INDEX IF NOT EXISTS idx_log_records_time ON log_records (time_unix_nano);
"#;
