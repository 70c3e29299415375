use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use portal_core::{AttemptRequest, FailureReason, ProbeOutcome};
use portal_engine::{
    BackendOracleProbe, CancellationToken, OpaqueFetchProbe, ProbeSettings, ResourceLoadProbe,
    Strategy,
};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

struct HasQueryKey(&'static str);

impl Match for HasQueryKey {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn request(target: impl Into<String>, timeout_ms: u64) -> AttemptRequest {
    AttemptRequest {
        target: target.into(),
        timeout: Duration::from_millis(timeout_ms),
        backend_ping_url: None,
    }
}

fn closed_port_target() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn probe(strategy: &dyn Strategy, request: &AttemptRequest) -> ProbeOutcome {
    strategy
        .probe(request, &CancellationToken::new())
        .await
        .expect("no fault")
}

#[tokio::test]
async fn resource_load_succeeds_on_cache_busted_favicon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .and(HasQueryKey("_"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 64], "image/x-icon"))
        .expect(1)
        .mount(&server)
        .await;

    let strategy = ResourceLoadProbe::new(client(), ProbeSettings::default());
    let outcome = probe(&strategy, &request(server.uri(), 2000)).await;
    assert_eq!(outcome, ProbeOutcome::Success);
}

#[tokio::test]
async fn resource_load_treats_missing_resource_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let strategy = ResourceLoadProbe::new(client(), ProbeSettings::default());
    let outcome = probe(&strategy, &request(server.uri(), 2000)).await;
    assert_eq!(outcome, ProbeOutcome::Failure(FailureReason::HttpStatus(404)));
}

#[tokio::test]
async fn resource_load_rejects_html_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let strategy = ResourceLoadProbe::new(client(), ProbeSettings::default());
    let outcome = probe(&strategy, &request(server.uri(), 2000)).await;
    assert_eq!(
        outcome,
        ProbeOutcome::Failure(FailureReason::UnexpectedContentType(
            "text/html".to_string()
        ))
    );
}

#[tokio::test]
async fn resource_load_times_out_on_slow_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_raw(vec![1u8; 8], "image/png"),
        )
        .mount(&server)
        .await;

    let strategy = ResourceLoadProbe::new(client(), ProbeSettings::default());
    let started = Instant::now();
    let outcome = probe(&strategy, &request(server.uri(), 150)).await;

    assert_eq!(outcome, ProbeOutcome::Failure(FailureReason::Timeout));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(150));
    assert!(elapsed < Duration::from_millis(1500));
}

#[tokio::test]
async fn opaque_fetch_counts_any_status_as_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let strategy = OpaqueFetchProbe::new(client());
    let outcome = probe(&strategy, &request(server.uri(), 2000)).await;
    assert_eq!(outcome, ProbeOutcome::Success);
}

#[tokio::test]
async fn opaque_fetch_fails_on_refused_connection() {
    let strategy = OpaqueFetchProbe::new(client());
    let outcome = probe(&strategy, &request(closed_port_target(), 2000)).await;
    assert!(matches!(
        outcome,
        ProbeOutcome::Failure(FailureReason::Transport(_))
    ));
}

#[tokio::test]
async fn opaque_fetch_aborts_in_flight_request_on_timeout() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let strategy = OpaqueFetchProbe::new(client());
    let started = Instant::now();
    let outcome = probe(&strategy, &request(server.uri(), 100)).await;

    assert_eq!(outcome, ProbeOutcome::Failure(FailureReason::Timeout));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn invalid_target_is_a_failure_not_a_fault() {
    let strategy = OpaqueFetchProbe::new(client());
    let outcome = probe(&strategy, &request("ftp://files.local", 500)).await;
    assert!(matches!(
        outcome,
        ProbeOutcome::Failure(FailureReason::InvalidTarget(_))
    ));
}

async fn backend_with_body(body: &str) -> (MockServer, AttemptRequest) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(query_param("ip", "intranet.local"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(&server)
        .await;
    let request = AttemptRequest {
        backend_ping_url: Some(format!("{}/api/ping?ip=", server.uri())),
        ..request("intranet.local", 2000)
    };
    (server, request)
}

#[tokio::test]
async fn backend_alive_true_is_success() {
    let (_server, request) = backend_with_body(r#"{"alive": true}"#).await;
    let outcome = probe(&BackendOracleProbe::new(client()), &request).await;
    assert_eq!(outcome, ProbeOutcome::Success);
}

#[tokio::test]
async fn backend_alive_false_or_missing_is_failure() {
    for body in [r#"{"alive": false}"#, "{}"] {
        let (_server, request) = backend_with_body(body).await;
        let outcome = probe(&BackendOracleProbe::new(client()), &request).await;
        assert_eq!(outcome, ProbeOutcome::Failure(FailureReason::NotAlive), "{body}");
    }
}

#[tokio::test]
async fn backend_non_json_is_failure() {
    let (_server, request) = backend_with_body("pong").await;
    let outcome = probe(&BackendOracleProbe::new(client()), &request).await;
    assert!(matches!(
        outcome,
        ProbeOutcome::Failure(FailureReason::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn backend_reply_over_cap_is_failure() {
    let padding = " ".repeat(256);
    let (_server, request) = backend_with_body(&format!(r#"{{"alive": true}}{padding}"#)).await;
    let strategy = BackendOracleProbe::new(client()).with_max_reply_bytes(64);
    let outcome = probe(&strategy, &request).await;
    assert!(matches!(
        outcome,
        ProbeOutcome::Failure(FailureReason::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn backend_encodes_full_target_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(query_param("target", "http://10.0.0.7:8080/a b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"alive":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let request = AttemptRequest {
        backend_ping_url: Some(format!("{}/ping?target=", server.uri())),
        ..request("http://10.0.0.7:8080/a b", 2000)
    };
    let outcome = probe(&BackendOracleProbe::new(client()), &request).await;
    assert_eq!(outcome, ProbeOutcome::Success);
}

#[tokio::test]
async fn backend_without_url_fails_immediately() {
    let started = Instant::now();
    let outcome = probe(
        &BackendOracleProbe::new(client()),
        &request("intranet.local", 5000),
    )
    .await;
    assert_eq!(outcome, ProbeOutcome::Failure(FailureReason::NotConfigured));
    assert!(started.elapsed() < Duration::from_millis(500));
}
