//! # Prediction proxy
//!
//! Forwards model work to the remote ML service instead of exposing it.
//!
//!
//!
//! ## Contract
//! - `POST {PREDICT_URL}/predict` with the user's CSV and `selected_model`
//!   returns row-wise labels plus the echoed CSV content
//! - `POST {PREDICT_URL}/analyze` with the user's CSV (and optional
//!   `target_column`) returns a metrics bundle or an `{"error": ...}` object
//!
//!
//!
//! ## Proxy
//! We could expose the ML service directly to the front-end. But, the proxy
//! keeps the network story simple for minimal overhead.
//!
//! Specifically, the user talks to our backend which forwards their file to
//! the ML service and in turn returns the response back through our backend.
//!
//! The main drawback we can see would be the extra round trip between our
//! backend and the ML service. Given both run on the same machine, that trip
//! is magnitudes smaller than the user trip, and it buys one origin, one
//! timeout, and one error shape (`{"detail": ...}`) for every page.
//!
//! The timeout is generous (5 minutes by default) since a cold model load on
//! the ML side can take a while. A timed-out request is reported distinctly
//! from every other transport failure so the user can tell "slow" from
//! "down".
use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    error::AppError,
    files::model_exists,
    state::AppState,
    upload::{UPLOAD_OK, UploadedFile, read_form, save_upload},
    utils::is_csv_file,
};

#[derive(Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<i64>,
    #[serde(rename = "csvData")]
    pub csv_data: Vec<Vec<String>>,
}

#[derive(Serialize)]
pub struct UploadResult {
    pub filename: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub upload_result: UploadResult,
    pub ml_result: Value,
}

pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PredictResponse>, AppError> {
    let (file, fields) = read_form(multipart).await?;
    let file = file.ok_or(AppError::MalformedPayload)?;
    let selected_model = fields
        .get("selected_model")
        .ok_or(AppError::MalformedPayload)?;

    if !is_csv_file(&file.name, file.content_type.as_deref()) {
        return Err(AppError::NotCsv);
    }

    if !model_exists(&state.config.model_dir, selected_model) {
        warn!("Model file not found: {selected_model}");
        return Err(AppError::ModelNotFound(selected_model.clone()));
    }

    info!("Predicting with model: {selected_model}");

    let form = Form::new()
        .part("file", csv_part(&file)?)
        .text("selected_model", selected_model.clone());

    let url = format!("{}/predict", state.config.predict_url);
    let response = state
        .http
        .post(&url)
        .multipart(form)
        .timeout(state.config.predict_timeout)
        .send()
        .await
        .map_err(map_transport)?;

    if !response.status().is_success() {
        return Err(upstream_error(response).await);
    }

    let response: PredictResponse = response.json().await?;

    // Every data row must arrive with its label; a short or long label
    // array is rejected rather than rendered.
    let rows = response.csv_data.len().saturating_sub(1);
    if response.predictions.len() != rows {
        return Err(AppError::LabelMismatch {
            rows,
            labels: response.predictions.len(),
        });
    }

    Ok(Json(response))
}

pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (file, fields) = read_form(multipart).await?;
    let file = file.ok_or(AppError::MalformedPayload)?;

    if !is_csv_file(&file.name, file.content_type.as_deref()) {
        return Err(AppError::NotCsv);
    }

    save_upload(&state, &file).await?;

    let mut form = Form::new().part("file", csv_part(&file)?);
    if let Some(target_column) = fields.get("target_column") {
        form = form.text("target_column", target_column.clone());
    }

    info!("Analyzing uploaded file: {}", file.name);

    let url = format!("{}/analyze", state.config.predict_url);
    let response = state
        .http
        .post(&url)
        .multipart(form)
        .timeout(state.config.predict_timeout)
        .send()
        .await
        .map_err(map_transport)?;

    // A model-side failure is still a completed analysis from the page's
    // point of view: it renders the error string next to the upload result.
    let ml_result = if response.status().is_success() {
        response.json::<Value>().await?
    } else {
        let detail = detail_of(response).await;
        warn!("Analysis failed upstream: {detail}");
        json!({ "error": detail })
    };

    Ok(Json(AnalyzeResponse {
        upload_result: UploadResult {
            filename: file.name,
            status: UPLOAD_OK.to_string(),
        },
        ml_result,
    }))
}

fn csv_part(file: &UploadedFile) -> Result<Part, AppError> {
    let part = Part::bytes(file.bytes.to_vec())
        .file_name(file.name.clone())
        .mime_str("text/csv")?;

    Ok(part)
}

fn map_transport(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        warn!("Prediction request timed out");
        return AppError::PredictTimeout;
    }

    AppError::Upstream(e)
}

async fn upstream_error(response: reqwest::Response) -> AppError {
    let status = response.status();

    AppError::UpstreamStatus {
        status,
        detail: detail_of(response).await,
    }
}

/// Pulls the `detail` string out of an upstream error body, falling back to
/// a generic message when the body is not the expected shape.
async fn detail_of(response: reqwest::Response) -> String {
    let fallback = "Error processing prediction".to_string();

    let Ok(body) = response.text().await else {
        return fallback;
    };

    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) if !body.is_empty() => body,
        Err(_) => fallback,
    }
}
