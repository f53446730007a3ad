//! Webhook receiver.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn, Instrument};

use crate::alert::{extract_alert_message, parse_alert_message};
use crate::broker::TradeRelay;
use crate::config::{ServerConfig, SignalConfig};
use crate::constants::server::HEALTH_PATH;
use crate::error::{error_response, ApiError};

pub struct AppState {
    pub relay: TradeRelay,
    pub signal: SignalConfig,
}

pub fn build_router(state: Arc<AppState>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(receive_webhook).fallback(method_not_allowed))
        .route(HEALTH_PATH, get(health_check))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: &ServerConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state, &config.webhook_path);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Listening on http://{}{}", addr, config.webhook_path);
    axum::serve(listener, app).await
}

async fn receive_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("webhook", %request_id);

    async move {
        match handle_alert(&state, &body).await {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => {
                error!("❌ Webhook failed ({}): {}", e.status_code(), e);
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn handle_alert(state: &AppState, body: &[u8]) -> Result<Value, ApiError> {
    info!("📨 Webhook received: {}", String::from_utf8_lossy(body));

    let message = extract_alert_message(body)?;
    let intent = parse_alert_message(&message, &state.signal.default_asset)?;
    info!("📈 Signal detected: {}", intent);

    if !intent.is_known_direction() {
        warn!(
            "⚠️ TYPE '{}' is neither BUY nor SELL, sending as 'down'",
            intent.direction
        );
    }
    if !state.signal.martingale_levels.is_empty() && !state.signal.is_martingale_level(intent.amount)
    {
        warn!(
            "⚠️ AMOUNT {} is not a configured martingale level {:?}, forwarding as-is",
            intent.amount, state.signal.martingale_levels
        );
    }

    let receipt = state.relay.execute(&intent).await?;
    info!(
        "✅ Trade opened: {} {} ${} (instrument {})",
        receipt.asset,
        receipt.direction.as_str(),
        receipt.amount,
        receipt.instrument_id
    );

    Ok(json!({"status": "success", "message": "Trade submitted"}))
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("💥 Panic while handling request: {}", detail);
    ApiError::Internal.into_response()
}
