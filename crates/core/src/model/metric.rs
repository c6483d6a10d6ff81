use crate::model::common::{ResourceDecl, ScopeDecl};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsPayload {
    pub resources: Vec<ResourceMetrics>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMetrics {
    pub resource: ResourceDecl,
    pub scopes: Vec<ScopeMetrics>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeMetrics {
    pub scope: ScopeDecl,
    pub metrics: Vec<MetricRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub data: MetricData,
}

/// The five OTLP metric shapes. Exactly one variant key may be present on the
/// wire; the decode pass enforces that before this type is built.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricData {
    Gauge {
        points: Vec<NumberPoint>,
    },
    Sum {
        aggregation_temporality: i32,
        is_monotonic: bool,
        points: Vec<NumberPoint>,
    },
    Histogram {
        points: Vec<HistogramPoint>,
    },
    ExponentialHistogram {
        points: Vec<ExponentialHistogramPoint>,
    },
    Summary {
        points: Vec<SummaryPoint>,
    },
}

impl MetricData {
    pub fn metric_type(&self) -> &'static str {
        match self {
            MetricData::Gauge { .. } => "gauge",
            MetricData::Sum { .. } => "sum",
            MetricData::Histogram { .. } => "histogram",
            MetricData::ExponentialHistogram { .. } => "exponential_histogram",
            MetricData::Summary { .. } => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointCommon {
    pub attrs_json: String,
    pub start_time_unix_nano: i64,
    pub time_unix_nano: i64,
    pub flags: i64,
    pub exemplars_json: Option<String>,
}

impl Default for PointCommon {
    fn default() -> Self {
        Self {
            attrs_json: "{}".to_string(),
            start_time_unix_nano: 0,
            time_unix_nano: 0,
            flags: 0,
            exemplars_json: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Double(f64),
    Int(i64),
}

/// Gauge and sum observation. A point with neither asDouble nor asInt is
/// valid on the wire and stored with both value columns NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberPoint {
    pub common: PointCommon,
    pub value: Option<NumberValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPoint {
    pub common: PointCommon,
    pub count: i64,
    pub sum: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub bucket_counts_json: String,
    pub explicit_bounds_json: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialHistogramPoint {
    pub common: PointCommon,
    pub count: i64,
    pub sum: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub scale: i32,
    pub zero_count: i64,
    pub positive: ExponentialBuckets,
    pub negative: ExponentialBuckets,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBuckets {
    pub offset: i32,
    pub bucket_counts_json: String,
}

impl Default for ExponentialBuckets {
    fn default() -> Self {
        Self {
            offset: 0,
            bucket_counts_json: "[]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPoint {
    pub common: PointCommon,
    pub count: i64,
    pub sum: Option<f64>,
    pub quantile_values_json: String,
}
