//! Liveness endpoint for the hosting platform.

use std::net::SocketAddr;

use axum::{Router, http::StatusCode, routing::get};
use log::{error, info};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub const STATUS_TEXT: &str = "Chillax Bot Status: Online 🟢";

/// GET / → 200 with static text.
#[must_use]
pub fn router() -> Router {
    Router::new().route("/", get(|| async { (StatusCode::OK, STATUS_TEXT) }))
}

/// Bind the health listener on all interfaces.
///
/// # Errors
///
/// Returns an error if the port is unavailable.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Health endpoint listening on {addr}");
    Ok(listener)
}

/// Serve the health router until `shutdown` is cancelled.
pub async fn serve(listener: TcpListener, shutdown: CancellationToken) {
    let result = axum::serve(listener, router())
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    match result {
        Ok(()) => info!("Health endpoint stopped"),
        Err(e) => error!("Health endpoint failed: {e}"),
    }
}
