use std::fs;

use axum::http::StatusCode;
use serde_json::{Value, json};

use super::harness::{TestHarness, body_text, decode_json};

#[tokio::test]
async fn index_falls_back_to_message_without_static_page() {
    let harness = TestHarness::setup();

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert!(
        payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("static/index.html"))
    );
}

#[tokio::test]
async fn index_serves_static_page_when_present() {
    let harness = TestHarness::setup();
    fs::create_dir_all(&harness.config.static_dir).expect("mkdir static");
    fs::write(
        harness.config.static_dir.join("index.html"),
        "<html><body>Monitoring Dashboard</body></html>",
    )
    .expect("write index");

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Monitoring Dashboard"));
}

#[tokio::test]
async fn latest_is_not_found_without_reports() {
    let harness = TestHarness::setup();

    let response = harness.get("/api/latest").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["operation"], "report.latest");
    assert!(payload["trace_id"].as_str().is_some());
}

#[tokio::test]
async fn latest_returns_newest_report_with_filename() {
    let harness = TestHarness::setup();
    harness.seed_report("20261019_070000", &[]);
    let newest = harness.seed_report("20261019_080000", &["critical"]);

    let response = harness.get("/api/latest").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["filename"], newest.as_str());
    assert_eq!(payload["hostname"], "edge-01");
    assert_eq!(payload["metrics"]["memory_usage"]["value"], 63.0);
    assert_eq!(payload["alerts"][0]["severity"], "critical");

    let on_disk: Value = serde_json::from_slice(
        &fs::read(harness.output_dir().join(&newest)).expect("read report"),
    )
    .expect("parse report");
    assert!(on_disk.get("filename").is_none());
}

#[tokio::test]
async fn latest_unreadable_is_a_server_error_not_missing() {
    let harness = TestHarness::setup();
    harness.seed_report("20261019_070000", &[]);
    harness.seed_raw("report_20261019_080000.json", "{ truncated");

    let response = harness.get("/api/latest").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "LATEST_UNREADABLE");
    assert_eq!(payload["details"]["filename"], "report_20261019_080000.json");
}

#[tokio::test]
async fn history_defaults_clamps_and_skips_unreadable() {
    let harness = TestHarness::setup();
    for minute in 0..30 {
        harness.seed_report(&format!("20261019_08{minute:02}00"), &[]);
    }
    harness.seed_raw("report_20261019_090000.json", "garbage");

    let default_page: Value = decode_json(harness.get("/api/history").await).await;
    assert_eq!(default_page["total_available"], 31);
    // The unreadable newest file takes one of the 20 slots and is skipped.
    assert_eq!(default_page["count"], 19);
    assert_eq!(
        default_page["reports"][0]["filename"],
        "report_20261019_082900.json"
    );

    let small: Value = decode_json(harness.get("/api/history?limit=3").await).await;
    assert_eq!(small["count"], 2);
    assert_eq!(small["reports"].as_array().map(Vec::len), Some(2));

    let low: Value = decode_json(harness.get("/api/history?limit=-5").await).await;
    assert_eq!(low["count"], 0);
    assert_eq!(low["total_available"], 31);

    let high: Value = decode_json(harness.get("/api/history?limit=500").await).await;
    assert_eq!(high["count"], 30);
}

#[tokio::test]
async fn history_without_reports_is_empty_not_an_error() {
    let harness = TestHarness::setup();

    let response = harness.get("/api/history?limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert_eq!(
        payload,
        json!({"reports": [], "count": 0, "total_available": 0})
    );
}

#[tokio::test]
async fn history_rejects_non_numeric_limit() {
    let harness = TestHarness::setup();
    let response = harness.get("/api/history?limit=lots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_on_empty_catalog_has_null_bounds() {
    let harness = TestHarness::setup();

    let response = harness.get("/api/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert_eq!(
        payload,
        json!({"total_reports": 0, "oldest_report": null, "newest_report": null})
    );
}

#[tokio::test]
async fn stats_summarize_catalog_and_latest_alerts() {
    let harness = TestHarness::setup();
    let oldest = harness.seed_report("20261018_230000", &[]);
    harness.seed_report("20261019_070000", &["warning"]);
    let newest = harness.seed_report(
        "20261019_080000",
        &["critical", "warning", "warning", "unknown"],
    );

    let payload: Value = decode_json(harness.get("/api/stats").await).await;
    assert_eq!(payload["total_reports"], 3);
    assert_eq!(payload["oldest_report"], oldest.as_str());
    assert_eq!(payload["newest_report"], newest.as_str());
    assert_eq!(payload["latest_timestamp"], "20261019_080000");
    assert_eq!(payload["hostname"], "edge-01");
    assert_eq!(
        payload["alert_counts"],
        json!({"total": 4, "critical": 1, "warning": 2})
    );
}

#[tokio::test]
async fn latest_and_stats_tolerate_loose_collector_output() {
    let harness = TestHarness::setup();
    let on_disk = json!({
        "timestamp": "20261019_080000",
        "hostname": "edge-01",
        "metrics": {"load_average": {"1min": 0.5, "5min": 0.4}},
        "services": [{"name": "nginx", "status": "running", "pid": 42}],
        "alerts": [
            {"type": "cpu", "severity": "warning", "threshold": 80},
            {"type": "disk", "severity": null}
        ]
    });
    harness.seed_raw("report_20261019_080000.json", &on_disk.to_string());

    let response = harness.get("/api/latest").await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut expected = on_disk;
    expected["filename"] = json!("report_20261019_080000.json");
    assert_eq!(decode_json::<Value>(response).await, expected);

    let stats: Value = decode_json(harness.get("/api/stats").await).await;
    assert_eq!(
        stats["alert_counts"],
        json!({"total": 2, "critical": 0, "warning": 1})
    );
}
