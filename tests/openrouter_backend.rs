//! Integration tests: drive the OpenRouter client against a local stub of the
//! chat-completions endpoint and check how each answer surfaces.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::post,
};
use chillax::generation::{FailureKind, GenerationOutcome, GenerationRequest, generate};
use chillax::openrouter::OpenRouterClient;
use chillax::triage::{FAILURE_PREFIX, failure_reply};
use serde_json::{Value, json};

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> (StatusCode, &'static str) {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push((auth, request));
    (stub.status, stub.body)
}

/// Start a stub endpoint; returns its URL and the requests it received.
async fn stub_endpoint(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/v1/chat/completions", post(completions))
        .with_state(Stub {
            status,
            body,
            seen: Arc::clone(&seen),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}/api/v1/chat/completions"), seen)
}

fn client(endpoint: String) -> OpenRouterClient {
    OpenRouterClient::with_endpoint(
        "sk-test".to_string(),
        "google/gemini-2.0-flash-001".to_string(),
        endpoint,
    )
}

fn request() -> GenerationRequest {
    GenerationRequest {
        persona_prompt: "You are the Chillax Theme Expert.".to_string(),
        author_name: "ada".to_string(),
        query: "how do I hide the member list?".to_string(),
    }
}

#[tokio::test]
async fn success_returns_backend_text_verbatim() {
    let (endpoint, seen) = stub_endpoint(
        StatusCode::OK,
        r#"{"choices":[{"message":{"role":"assistant","content":"Use `.members_cdf { display: none; }`\n"}}]}"#,
    )
    .await;

    let outcome = generate(&client(endpoint), &request()).await;
    assert_eq!(
        outcome,
        GenerationOutcome::Success("Use `.members_cdf { display: none; }`\n".to_string())
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one backend call");
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], json!("google/gemini-2.0-flash-001"));
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "You are the Chillax Theme Expert."},
            {"role": "user", "content": "ada asks: how do I hide the member list?"}
        ])
    );
}

#[tokio::test]
async fn unauthorized_is_an_authentication_failure() {
    let (endpoint, _) = stub_endpoint(StatusCode::UNAUTHORIZED, "invalid api key").await;

    let GenerationOutcome::Failure { kind, detail } = generate(&client(endpoint), &request()).await
    else {
        panic!("expected failure");
    };
    assert_eq!(kind, FailureKind::Authentication);
    assert!(detail.contains("invalid api key"));
}

#[tokio::test]
async fn server_error_is_a_backend_failure() {
    let (endpoint, _) = stub_endpoint(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;

    let outcome = generate(&client(endpoint), &request()).await;
    assert!(matches!(
        outcome,
        GenerationOutcome::Failure {
            kind: FailureKind::Backend,
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_backend_failure() {
    let (endpoint, _) = stub_endpoint(StatusCode::OK, "this is not json").await;

    let outcome = generate(&client(endpoint), &request()).await;
    assert!(matches!(
        outcome,
        GenerationOutcome::Failure {
            kind: FailureKind::Backend,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_choices_are_a_backend_failure() {
    let (endpoint, _) = stub_endpoint(StatusCode::OK, r#"{"choices":[]}"#).await;

    let GenerationOutcome::Failure { kind, detail } = generate(&client(endpoint), &request()).await
    else {
        panic!("expected failure");
    };
    assert_eq!(kind, FailureKind::Backend);
    assert!(detail.contains("No choices"));
}

#[tokio::test]
async fn transport_error_becomes_an_apology() {
    // Bind and drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("free port")
        .port();
    let endpoint = format!("http://127.0.0.1:{port}/api/v1/chat/completions");

    let GenerationOutcome::Failure { kind, detail } = generate(&client(endpoint), &request()).await
    else {
        panic!("expected failure");
    };
    assert_eq!(kind, FailureKind::Unavailable);

    let reply = failure_reply(kind, &detail);
    assert!(reply.starts_with(FAILURE_PREFIX));
    assert!(reply.contains(&detail));
}
