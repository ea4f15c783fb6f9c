mod common;

use common::{MockTransport, client_with};
use openworkers_http_client::{Error, PendingRequest, RequestOptions, RequestState};
use serde_json::{Value, json};
use std::time::Duration;

#[tokio::test]
async fn test_slow_request_times_out() {
    let transport = MockTransport::with_delay(Duration::from_millis(500));
    transport.reply_json(200, &json!({"late": true}));
    let client = client_with(&transport);

    let result: Result<Value, Error> = client
        .get(
            "/slow",
            "",
            RequestOptions::new().with_timeout(Duration::from_millis(100)),
        )
        .await;

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "timeout 100");
}

#[tokio::test]
async fn test_fast_request_settles_normally() {
    let transport = MockTransport::with_delay(Duration::from_millis(10));
    transport.reply_json(200, &json!({"fast": true}));
    let client = client_with(&transport);

    let value: Value = client
        .get(
            "/fast",
            "",
            RequestOptions::new().with_timeout(Duration::from_secs(2)),
        )
        .await
        .unwrap();

    assert_eq!(value["fast"], true);
}

#[tokio::test]
async fn test_timeout_from_default_layer_applies_to_post() {
    let transport = MockTransport::with_delay(Duration::from_millis(400));
    let client = client_with(&transport);
    client.set_default_options(RequestOptions::new().with_timeout(Duration::from_millis(50)));

    let result: Result<Value, Error> = client
        .post("/slow", json!({"a": 1}), RequestOptions::new())
        .await;

    assert!(matches!(result, Err(Error::Timeout(t)) if t == Duration::from_millis(50)));
}

#[tokio::test]
async fn test_zero_timeout_disables_timer() {
    let transport = MockTransport::with_delay(Duration::from_millis(50));
    let client = client_with(&transport);

    let value: Value = client
        .get("/api", "", RequestOptions::new().with_timeout(Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_pending_request_tracks_state() {
    let mut pending = PendingRequest::start(Some(Duration::from_millis(20)));
    assert_eq!(pending.state(), RequestState::Pending);
    assert_eq!(pending.timeout(), Some(Duration::from_millis(20)));

    let result = pending
        .settle(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(1)
        })
        .await;
    assert!(matches!(result, Err(Error::Timeout(_))));
    assert_eq!(pending.state(), RequestState::Expired);

    let mut pending = PendingRequest::start(None);
    assert!(pending.timeout().is_none());
    assert_eq!(pending.settle(async { Ok("done") }).await.unwrap(), "done");
    assert_eq!(pending.state(), RequestState::Settled);
}

#[tokio::test]
async fn test_error_after_deadline_is_not_reported_as_timeout() {
    // Blocking inside the future makes it complete on its first poll, after
    // the deadline has already passed
    let mut pending = PendingRequest::start(Some(Duration::from_millis(10)));
    let result: Result<Value, Error> = pending
        .settle(async {
            std::thread::sleep(Duration::from_millis(30));
            Err(Error::Transport("connection reset".into()))
        })
        .await;

    assert!(matches!(result, Err(Error::Transport(ref m)) if m == "connection reset"));
    assert_eq!(pending.state(), RequestState::Settled);
}
