//! HTTP surface: the LINE webhook endpoint and a health check

use crate::bot::StockBot;
use crate::platforms::line::SIGNATURE_HEADER;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Path LINE delivers webhooks to
pub const CALLBACK_PATH: &str = "/callback";

#[derive(Clone)]
pub struct AppState {
    bot: StockBot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Build the application router
pub fn router(bot: StockBot) -> Router {
    Router::new()
        .route(CALLBACK_PATH, post(callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { bot })
}

/// Serve the router on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, bot: StockBot, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!(%address, "Webhook server listening");
    }

    axum::serve(listener, router(bot))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Webhook endpoint.
///
/// Answers 400 when the signature is missing or wrong. Once the signature
/// checks out the answer is always `200 OK`; downstream failures reach the
/// user as chat messages and are never reported to LINE, which would retry.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Rejecting webhook without signature header");
        return (StatusCode::BAD_REQUEST, "Missing signature");
    };

    match state.bot.handle_webhook(&body, signature).await {
        Ok(outcome) => {
            info!(
                messages = outcome.messages,
                replies_sent = outcome.replies_sent,
                replies_failed = outcome.replies_failed,
                "Webhook handled"
            );
            (StatusCode::OK, "OK")
        }
        Err(err) => {
            warn!(error = %err, "Rejecting webhook");
            (StatusCode::BAD_REQUEST, "Invalid signature")
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "stock-bot",
    })
}
