//! End-to-end polling against a wiremock server, with short real intervals.

use std::time::Duration;

use conformance_client::{
    ClientConfig, ConformanceClient, ConformanceError, ErrorKind, WaitDefaults, WaitOptions,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, ConformanceClient) {
    let server = MockServer::start().await;
    let client = ConformanceClient::new(ClientConfig::new(server.uri())).unwrap();
    (server, client)
}

fn quick() -> WaitOptions {
    WaitOptions::default()
        .with_interval(Duration::from_millis(20))
        .with_timeout(Duration::from_secs(5))
}

async fn respond_n_times(server: &MockServer, module_id: &str, body: serde_json::Value, n: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/info/{module_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(n)
        .mount(server)
        .await;
}

async fn respond_always(server: &MockServer, module_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/info/{module_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn polls(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn resolves_on_third_poll() {
    let (server, client) = setup().await;
    respond_n_times(&server, "m1", json!({"status": "WAITING"}), 1).await;
    respond_n_times(&server, "m1", json!({"status": "RUNNING"}), 1).await;
    respond_always(&server, "m1", json!({"status": "FINISHED", "result": "PASSED"})).await;

    let outcome = client.wait_for_state("m1", &quick()).await.unwrap();

    assert_eq!(outcome.status, "FINISHED");
    assert_eq!(outcome.result.as_deref(), Some("PASSED"));
    assert_eq!(polls(&server).await, 3);
}

#[tokio::test]
async fn failed_result_is_a_mismatch() {
    let (server, client) = setup().await;
    respond_always(&server, "m1", json!({"status": "FINISHED", "result": "FAILED"})).await;

    let err = client.wait_for_state("m1", &quick()).await.unwrap_err();

    assert!(matches!(
        &err,
        ConformanceError::ResultMismatch { module_id, status, result }
            if module_id == "m1" && status == "FINISHED" && result == "FAILED"
    ));
    assert_eq!(err.to_string(), "module id m1 is FINISHED but FAILED");
}

#[tokio::test]
async fn interrupted_stops_polling_immediately() {
    let (server, client) = setup().await;
    respond_n_times(&server, "m1", json!({"status": "RUNNING"}), 1).await;
    respond_always(&server, "m1", json!({"status": "INTERRUPTED"})).await;

    let err = client.wait_for_state("m1", &quick()).await.unwrap_err();

    assert!(matches!(err, ConformanceError::Interrupted { .. }));
    assert_eq!(polls(&server).await, 2);
}

#[tokio::test]
async fn times_out_when_never_terminal() {
    let (server, client) = setup().await;
    respond_always(&server, "m1", json!({"status": "RUNNING"})).await;

    let options = WaitOptions::default()
        .with_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_millis(300));
    let err = client.wait_for_state("m1", &options).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.module_id(), Some("m1"));
    let count = polls(&server).await;
    assert!((1..=7).contains(&count), "unexpected poll count {count}");
}

#[tokio::test]
async fn custom_states_without_result_check() {
    let (server, client) = setup().await;
    respond_n_times(&server, "m1", json!({"status": "CREATED"}), 1).await;
    respond_always(&server, "m1", json!({"status": "WAITING"})).await;

    let options = quick()
        .with_states(["WAITING"])
        .with_results(Vec::<String>::new());
    let outcome = client.wait_for_state("m1", &options).await.unwrap();

    assert_eq!(outcome.status, "WAITING");
    assert_eq!(outcome.result, None);
}

#[tokio::test]
async fn protocol_error_during_poll_ends_the_wait() {
    let (server, client) = setup().await;
    respond_n_times(&server, "m1", json!({"status": "RUNNING"}), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/info/m1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.wait_for_state("m1", &quick()).await.unwrap_err();

    assert!(matches!(
        err,
        ConformanceError::UnexpectedStatus {
            operation: "getModuleInfo",
            actual: 503,
            ..
        }
    ));
    assert_eq!(polls(&server).await, 2);
}

#[tokio::test]
async fn config_wait_defaults_drive_the_session() {
    let server = MockServer::start().await;
    let config = ClientConfig::new(server.uri()).with_wait_defaults(WaitDefaults {
        interval_ms: 10,
        timeout_ms: 2_000,
    });
    let options = config.wait_options();
    let client = ConformanceClient::new(config).unwrap();
    respond_n_times(&server, "m1", json!({"status": "RUNNING"}), 2).await;
    respond_always(&server, "m1", json!({"status": "FINISHED", "result": "REVIEW"})).await;

    let outcome = client.wait_for_state("m1", &options).await.unwrap();
    assert_eq!(outcome.result.as_deref(), Some("REVIEW"));
}

#[tokio::test]
async fn several_modules_in_parallel() {
    let (server, client) = setup().await;
    respond_n_times(&server, "a", json!({"status": "RUNNING"}), 2).await;
    respond_always(&server, "a", json!({"status": "FINISHED", "result": "PASSED"})).await;
    respond_always(&server, "b", json!({"status": "FINISHED", "result": "FAILED"})).await;

    let results = client.wait_for_modules(&["a", "b"], &quick()).await;

    assert_eq!(results[0].as_ref().unwrap().status, "FINISHED");
    assert!(matches!(results[1], Err(ConformanceError::ResultMismatch { .. })));
}

#[tokio::test]
async fn dropping_the_wait_stops_polling() {
    let (server, client) = setup().await;
    respond_always(&server, "m1", json!({"status": "RUNNING"})).await;

    let options = WaitOptions::default()
        .with_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_secs(30));
    let abandoned =
        tokio::time::timeout(Duration::from_millis(120), client.wait_for_state("m1", &options))
            .await;
    assert!(abandoned.is_err());

    // Let any request cancelled mid-flight settle before counting.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let seen = polls(&server).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(polls(&server).await, seen);
}
