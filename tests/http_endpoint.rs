//! HTTP surface: path-addressed procedures answered with a JSON envelope.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use kaspawallet::http::{ResultCode, ResultEnvelope};
use kaspawallet::HttpServer;

mod common;
use common::{DaemonScript, Probe, Setup, PASSWORD};

async fn get(harness: common::Harness, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
    let app = HttpServer::new(Arc::new(harness.dispatcher)).router();
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_unknown_procedure() {
    let (status, content_type, body) = get(Setup::default().build(), "/Frobnicate").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        body,
        serde_json::json!({
            "result": 1,
            "txs": [],
            "error": "no procedure found for path /Frobnicate"
        })
    );
}

#[tokio::test]
async fn test_send_money_success() {
    let harness = Setup {
        daemon: DaemonScript {
            batch: 2,
            ..Default::default()
        },
        ..Default::default()
    }
    .build();
    let probe = Arc::clone(&harness.probe);

    let uri = format!(
        "/SendMoney?wallet=kaspatest%3Aqqdestination&amount=250000000&password={}",
        PASSWORD.replace(' ', "+")
    );
    let (status, _, body) = get(harness, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let envelope: ResultEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.result, ResultCode::Success);
    assert_eq!(envelope.txs, ["txid-0".to_string(), "txid-1".to_string()]);
    assert_eq!(envelope.error, "");

    let build = probe.last_build.lock().unwrap().clone().unwrap();
    assert_eq!(build.address, "kaspatest:qqdestination");
    assert_eq!(build.amount, 250_000_000);
}

#[tokio::test]
async fn test_send_money_missing_parameter() {
    let harness = Setup::default().build();
    let probe = Arc::clone(&harness.probe);

    let (status, _, body) = get(harness, "/SendMoney?wallet=kaspatest%3Aqq&password=x").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 1);
    assert_eq!(body["error"], "missing parameter 'amount'");
    assert_eq!(Probe::get(&probe.key_reads), 0);
}

#[tokio::test]
async fn test_send_money_wrong_password_reports_remediation() {
    let (status, _, body) = get(
        Setup::default().build(),
        "/SendMoney?wallet=kaspatest%3Aqq&amount=1000&password=nope",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 1);
    assert_eq!(body["txs"], serde_json::json!([]));
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("password decryption failed"));
    assert!(error.ends_with("not specifying the same keys file used by the wallet daemon process."));
}

#[tokio::test]
async fn test_send_money_invalid_amount() {
    let (_, _, body) = get(
        Setup::default().build(),
        "/SendMoney?wallet=kaspatest%3Aqq&amount=ten&password=x",
    )
    .await;

    assert_eq!(body["result"], 1);
    assert!(body["error"].as_str().unwrap().contains("invalid amount 'ten'"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = HttpServer::new(Arc::new(Setup::default().build().dispatcher)).router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/Unknown")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}
