use std::path::Path;

use otlite_core::config::Config;
use otlite_ingest::otlp::http::router;
use otlite_store::Store;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

async fn spawn_server(db_path: &Path) -> (String, Store) {
    let cfg = Config {
        db_path: db_path.to_path_buf(),
        ..Config::default()
    };
    let store = Store::open(db_path).await.unwrap();
    let app = router(store.clone(), &cfg);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

async fn verify_pool(db_path: &Path) -> SqlitePool {
    SqlitePool::connect_with(SqliteConnectOptions::new().filename(db_path))
        .await
        .unwrap()
}

#[tokio::test]
async fn traces_round_trip_over_http() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;

    let payload = testkit::traces_request(
        &[("service.name", "api")],
        Some("lib"),
        vec![testkit::span(
            "4bf92f3577b34da6a3ce929d0e0e4736",
            "00f067aa0ba902b7",
            "GET /v1/orders",
        )],
    );
    let response = reqwest::Client::new()
        .post(format!("{base}/v1/traces"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "{}");

    let status = store.status().await.unwrap();
    assert_eq!(status.spans, 1);
    assert_eq!(status.resources, 1);
    assert_eq!(status.scopes, 1);
}

#[tokio::test]
async fn log_scenario_persists_expected_rows() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, _store) = spawn_server(&db_path).await;

    let payload = testkit::logs_request(
        &[("service.name", "svc-a")],
        Some("lib"),
        vec![testkit::log_record(9, "INFO", "hello", "1700000000000000000")],
    );
    let response = reqwest::Client::new()
        .post(format!("{base}/v1/logs"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let pool = verify_pool(&db_path).await;
    let (attributes, scope_name): (String, String) = sqlx::query_as(
        "SELECT r.attributes, s.name
         FROM log_records l
         JOIN resources r ON r.id = l.resource_id
         JOIN instrumentation_scopes s ON s.id = l.scope_id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(attributes, "{\"service.name\":\"svc-a\"}");
    assert_eq!(scope_name, "lib");

    let (observed, severity, severity_text, body): (i64, i64, String, String) = sqlx::query_as(
        "SELECT observed_time_unix_nano, severity_number, severity_text, body FROM log_records",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(observed, 1_700_000_000_000_000_000);
    assert_eq!(severity, 9);
    assert_eq!(severity_text, "INFO");
    assert_eq!(body, "{\"stringValue\":\"hello\"}");
}

#[tokio::test]
async fn gauge_and_histogram_round_trip_over_http() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;

    let payload = testkit::metrics_request(
        &[("service.name", "api")],
        Some("lib"),
        vec![
            testkit::gauge_metric("cpu.usage", 3.14),
            testkit::histogram_metric("http.duration", &[1, 2, 3], &[0.5, 1.0]),
        ],
    );
    let response = reqwest::Client::new()
        .post(format!("{base}/v1/metrics"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let pool = verify_pool(&db_path).await;
    let value_double: Option<f64> = sqlx::query_scalar(
        "SELECT p.value_double
         FROM metric_data_points p JOIN metrics m ON m.id = p.metric_id
         WHERE m.name = 'cpu.usage'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(value_double, Some(3.14));

    let (bucket_counts, explicit_bounds): (String, String) = sqlx::query_as(
        "SELECT p.bucket_counts, p.explicit_bounds
         FROM metric_data_points p JOIN metrics m ON m.id = p.metric_id
         WHERE m.name = 'http.duration'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(bucket_counts, "[1,2,3]");
    assert_eq!(explicit_bounds, "[0.5,1.0]");

    assert_eq!(store.status().await.unwrap().metrics, 2);
}

#[tokio::test]
async fn malformed_span_rejects_whole_payload() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;

    let mut spans: Vec<Value> = (0..10)
        .map(|i| {
            testkit::span(
                "4bf92f3577b34da6a3ce929d0e0e4736",
                &format!("00f067aa0ba902b{i}"),
                "op",
            )
        })
        .collect();
    spans.push(json!({"traceId": "4bf92f3577b34da6a3ce929d0e0e4736", "name": "orphan"}));

    let response = reqwest::Client::new()
        .post(format!("{base}/v1/traces"))
        .json(&testkit::traces_request(&[("service.name", "api")], None, spans))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(store.status().await.unwrap().spans, 0);
}

#[tokio::test]
async fn resource_schema_url_distinguishes_rows() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;
    let client = reqwest::Client::new();

    for (i, schema_url) in ["https://opentelemetry.io/schemas/1.21.0", "https://opentelemetry.io/schemas/1.24.0"]
        .iter()
        .enumerate()
    {
        let mut payload = testkit::traces_request(
            &[("service.name", "api")],
            Some("lib"),
            vec![testkit::span(
                "4bf92f3577b34da6a3ce929d0e0e4736",
                &format!("00f067aa0ba902b{i}"),
                "op",
            )],
        );
        payload["resourceSpans"][0]["schemaUrl"] = json!(schema_url);
        let response = client
            .post(format!("{base}/v1/traces"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(store.status().await.unwrap().resources, 2);
}

#[tokio::test]
async fn transport_rejects_bad_requests() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/v1/logs"))
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 415);

    let response = client
        .post(format!("{base}/v1/logs"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{base}/v1/logs"))
        .json(&json!({"resourceSpans": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{base}/v1/logs"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 405);

    assert_eq!(store.status().await.unwrap().log_records, 0);
}

#[tokio::test]
async fn charset_suffix_on_content_type_is_accepted() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("otlite.db");
    let (base, store) = spawn_server(&db_path).await;

    let payload = testkit::logs_request(
        &[("service.name", "api")],
        None,
        vec![testkit::log_record(5, "DEBUG", "dbg", "1700000000000000000")],
    );
    let response = reqwest::Client::new()
        .post(format!("{base}/v1/logs"))
        .header("content-type", "application/json; charset=utf-8")
        .body(payload.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(store.status().await.unwrap().log_records, 1);
}
