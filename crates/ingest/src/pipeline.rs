use otlite_core::error::Result;
use otlite_store::Store;
use serde_json::Value;

use crate::otlp;

/// Ingest one trace export request: a single validating decode pass, then a
/// single storage transaction. Success means the whole payload is durable;
/// failure means none of it is visible.
pub async fn ingest_traces(store: &Store, payload: &Value) -> Result<()> {
    let decoded = otlp::trace::decode_traces(payload)?;
    store.insert_traces(&decoded).await
}

pub async fn ingest_metrics(store: &Store, payload: &Value) -> Result<()> {
    let decoded = otlp::metric::decode_metrics(payload)?;
    store.insert_metrics(&decoded).await
}

pub async fn ingest_logs(store: &Store, payload: &Value) -> Result<()> {
    let decoded = otlp::log::decode_logs(payload)?;
    store.insert_logs(&decoded).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn one_bad_span_persists_nothing() {
        let store = Store::open_in_memory().await.unwrap();

        let mut spans: Vec<Value> = (0..10)
            .map(|i| {
                testkit::span(
                    "4bf92f3577b34da6a3ce929d0e0e4736",
                    &format!("00f067aa0ba902b{i}"),
                    "op",
                )
            })
            .collect();
        // Eleventh span has no spanId: the whole request must be rejected.
        spans.push(json!({
            "traceId": "4bf92f3577b34da6a3ce929d0e0e4736",
            "name": "orphan"
        }));
        let payload = testkit::traces_request(&[("service.name", "api")], Some("lib"), spans);

        assert!(ingest_traces(&store, &payload).await.is_err());

        let status = store.status().await.unwrap();
        assert_eq!(status.spans, 0);
        assert_eq!(status.resources, 0);
    }

    #[tokio::test]
    async fn valid_trace_payload_is_committed() {
        let store = Store::open_in_memory().await.unwrap();

        let payload = testkit::traces_request(
            &[("service.name", "api")],
            Some("lib"),
            vec![testkit::span(
                "4bf92f3577b34da6a3ce929d0e0e4736",
                "00f067aa0ba902b7",
                "GET /v1/orders",
            )],
        );
        ingest_traces(&store, &payload).await.unwrap();

        let status = store.status().await.unwrap();
        assert_eq!(status.spans, 1);
        assert_eq!(status.resources, 1);
        assert_eq!(status.scopes, 1);
    }

    #[tokio::test]
    async fn scopeless_metrics_resolve_one_canonical_scope() {
        let store = Store::open_in_memory().await.unwrap();

        for value in [1.0, 2.0] {
            let payload = testkit::metrics_request(
                &[("service.name", "api")],
                None,
                vec![testkit::gauge_metric("cpu.usage", value)],
            );
            ingest_metrics(&store, &payload).await.unwrap();
        }

        let status = store.status().await.unwrap();
        assert_eq!(status.scopes, 1);
        assert_eq!(status.metrics, 1);
        assert_eq!(status.metric_data_points, 2);
    }

    #[tokio::test]
    async fn unknown_metric_variant_rolls_back_the_call() {
        let store = Store::open_in_memory().await.unwrap();

        let payload = testkit::metrics_request(
            &[("service.name", "api")],
            Some("lib"),
            vec![
                testkit::gauge_metric("cpu.usage", 1.0),
                json!({"name": "mystery"}),
            ],
        );
        assert!(ingest_metrics(&store, &payload).await.is_err());
        assert_eq!(store.status().await.unwrap().metrics, 0);
    }

    #[tokio::test]
    async fn log_scenario_persists_expected_rows() {
        let store = Store::open_in_memory().await.unwrap();

        let payload = testkit::logs_request(
            &[("service.name", "svc-a")],
            Some("lib"),
            vec![testkit::log_record(9, "INFO", "hello", "1700000000000000000")],
        );
        ingest_logs(&store, &payload).await.unwrap();

        let status = store.status().await.unwrap();
        assert_eq!(status.resources, 1);
        assert_eq!(status.scopes, 1);
        assert_eq!(status.log_records, 1);
    }

    #[tokio::test]
    async fn missing_top_level_array_is_rejected() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(ingest_logs(&store, &json!({"resourceSpans": []})).await.is_err());
        assert!(ingest_traces(&store, &json!({})).await.is_err());
        assert!(ingest_metrics(&store, &json!({"resourceLogs": []})).await.is_err());
    }
}
