//! Integration test: serve the health endpoint on a free port and GET /.

use std::time::Duration;

use chillax::health;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn health_endpoint_responds_with_static_text() {
    let listener = health::bind(0).await.expect("bind health listener");
    let port = listener.local_addr().expect("local_addr").port();
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(health::serve(listener, shutdown.clone()));

    let response = reqwest::get(format!("http://127.0.0.1:{port}/"))
        .await
        .expect("GET /");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.expect("body"),
        "Chillax Bot Status: Online 🟢"
    );

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stops after shutdown")
        .expect("server task");
}

#[tokio::test]
async fn health_endpoint_only_serves_root() {
    let listener = health::bind(0).await.expect("bind health listener");
    let port = listener.local_addr().expect("local_addr").port();
    let shutdown = CancellationToken::new();
    tokio::spawn(health::serve(listener, shutdown.clone()));

    let response = reqwest::get(format!("http://127.0.0.1:{port}/status"))
        .await
        .expect("GET /status");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    shutdown.cancel();
}
