//! Integration tests for the HTTP command surface.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use gatelock_controller::{DisabledAnnouncer, OrchestratorState, UnlockOrchestrator};
use gatelock_core::{Config, LineState, OutputLine};
use gatelock_hardware::mock::{MockPins, MockPinsHandle};
use gatelock_network::{
    ApiServer, ButtonPressResponse, MessageResponse, StatusResponse, router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

type Orchestrator = UnlockOrchestrator<MockPins, DisabledAnnouncer>;

fn setup() -> (Arc<Orchestrator>, MockPinsHandle) {
    let config = Config::default();
    let (pins, handle) = MockPins::new(&config.gpio);
    let orchestrator = UnlockOrchestrator::new(Arc::new(pins), DisabledAnnouncer, &config);
    (Arc::new(orchestrator), handle)
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_status_reports_running_message() {
    let (orchestrator, _handle) = setup();
    let app = router(orchestrator);

    let response = app.oneshot(request(Method::GET, "/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: StatusResponse = json_body(response).await;
    assert_eq!(body.message, "Gate locker is running");
    assert_eq!(body.backend.name, "mock");
    assert_eq!(body.controller.acknowledgement, OrchestratorState::Idle);
    assert_eq!(body.controller.relay, OrchestratorState::Idle);
    assert_eq!(body.controller.detections, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unlock_pulses_relay() {
    let (orchestrator, handle) = setup();
    let app = router(Arc::clone(&orchestrator));
    let start = Instant::now();

    let response = app.oneshot(request(Method::POST, "/unlock")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: MessageResponse = json_body(response).await;
    assert_eq!(body.message, "Unlock triggered");

    let relay = handle.history_for(OutputLine::Relay);
    assert_eq!(relay.len(), 2);
    assert_eq!(relay[0].state, LineState::High);
    assert_eq!(relay[1].at - start, Duration::from_millis(500));
    assert_eq!(orchestrator.status().relay_pulses, 1);
}

#[tokio::test(start_paused = true)]
async fn test_button_press_queues_synthetic_signal() {
    let (orchestrator, handle) = setup();
    let app = router(Arc::clone(&orchestrator));

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/buttonPress"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ButtonPressResponse = json_body(response).await;
    assert_eq!(body.pending_injections, 1);

    orchestrator.on_poll_tick(Instant::now()).await;
    assert_eq!(orchestrator.pending_injections(), 0);
    assert_eq!(handle.history_for(OutputLine::Acknowledge).len(), 2);

    let response = app.oneshot(request(Method::GET, "/status")).await.unwrap();
    let status: StatusResponse = json_body(response).await;
    assert_eq!(status.controller.detections, 1);
    assert!(status.controller.last_detection_at.is_some());
}

#[tokio::test]
async fn test_wrong_method_rejected() {
    let (orchestrator, _handle) = setup();
    let app = router(orchestrator);

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/unlock"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .oneshot(request(Method::GET, "/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_server_serves_until_cancelled() {
    let (orchestrator, _handle) = setup();
    let server = ApiServer::bind("127.0.0.1:0".parse().unwrap(), router(orchestrator))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let task = tokio::spawn(server.serve(shutdown.clone()));

    let body: StatusResponse = reqwest::get(format!("http://{addr}/status"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.message, "Gate locker is running");

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_bind_conflict_reported() {
    let (orchestrator, _handle) = setup();
    let first = ApiServer::bind("127.0.0.1:0".parse().unwrap(), router(Arc::clone(&orchestrator)))
        .await
        .unwrap();
    let addr = first.local_addr().unwrap();

    let error = ApiServer::bind(addr, router(orchestrator)).await.unwrap_err();
    assert!(matches!(error, gatelock_network::ApiError::Bind { .. }));
}
