use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Only CSV files are allowed. Please select a CSV file.")]
    NotCsv,

    #[error("Model file '{0}' not found")]
    ModelNotFound(String),

    #[error("Prediction request timed out")]
    PredictTimeout,

    #[error("Failed to reach prediction service: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("{detail}")]
    UpstreamStatus { status: StatusCode, detail: String },

    #[error("Prediction service returned {labels} labels for {rows} data rows")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("Internal error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedPayload | AppError::NotCsv => StatusCode::BAD_REQUEST,
            AppError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PredictTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) | AppError::LabelMismatch { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpstreamStatus { status, .. } => *status,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Error bodies mirror the shape the pages read: `{"detail": ...}`.
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
