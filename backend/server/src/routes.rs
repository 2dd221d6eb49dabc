use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct EchoRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct EchoResponse {
    pub message: String,
    pub timestamp: i64,
}

pub async fn ping_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "pong! 🏓".to_string(),
    })
}

pub async fn hello_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "hello! 👋".to_string(),
    })
}

pub async fn echo_handler(Json(request): Json<EchoRequest>) -> Json<EchoResponse> {
    Json(EchoResponse {
        message: format!("echo: {}", request.message),
        timestamp: Utc::now().timestamp_millis(),
    })
}

pub async fn reverse_handler(Json(request): Json<EchoRequest>) -> Json<EchoResponse> {
    Json(EchoResponse {
        message: format!("reversed: {}", reverse_message(&request.message)),
        timestamp: Utc::now().timestamp_millis(),
    })
}

/// Relays the forecast endpoint body as-is. The observed contract never
/// signals failure through the status code, only through the body prefix.
pub async fn weather_handler(State(state): State<Arc<AppState>>) -> String {
    let response = match state.http.get(&state.config.forecast_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Forecast fetch failed: {e}");
            return format!("Failed to connect to FastAPI: {e}");
        }
    };

    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Forecast body read failed: {e}");
            format!("Failed to connect to FastAPI: {e}")
        }
    }
}

fn reverse_message(message: &str) -> String {
    message.chars().rev().collect()
}
