//! Wire types and the HTTP client shared by the pages.
//!
//! Responses are decoded and validated here, at the boundary, so the state
//! machines behind it only ever see well-formed data or a typed
//! [`FlowError`].
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Bound on a prediction/analysis round trip.
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(300);

/// A file handle as the upload form sees it: declared name, declared MIME
/// type, raw content. No content-level validation happens client-side.
#[derive(Debug, Clone)]
pub struct CsvFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl CsvFile {
    pub fn is_csv(&self) -> bool {
        if self.mime.as_deref() == Some("text/csv") {
            return true;
        }

        self.name.to_lowercase().ends_with(".csv")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MlResult {
    Metrics {
        accuracy: f64,
        f1_score: f64,
        auc: f64,
        classification_report: Map<String, Value>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    pub upload_result: UploadResult,
    pub ml_result: MlResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<i64>,
    #[serde(rename = "csvData")]
    pub csv_data: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Only CSV files are allowed. Please select a CSV file.")]
    NotCsv,

    #[error("Upload timed out. The file might be too large or the connection is slow.")]
    TimedOut,

    #[error("{detail}")]
    Server { status: u16, detail: String },

    #[error("An unexpected error occurred: {0}")]
    Transport(reqwest::Error),

    #[error("Response carried {labels} labels for {rows} data rows")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("A submission is already in progress")]
    Busy,

    #[error("No file selected")]
    NoFile,

    #[error("No model selected")]
    NoModel,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    predict_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, PREDICT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, predict_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            predict_timeout,
        }
    }

    pub async fn files(&self) -> Result<Vec<FileInfo>, FlowError> {
        let response = self
            .http
            .get(format!("{}/api/files", self.base_url))
            .send()
            .await
            .map_err(map_transport)?;

        decode(checked(response).await?).await
    }

    pub async fn upload(&self, file: &CsvFile) -> Result<UploadResult, FlowError> {
        let form = Form::new().part("file", csv_part(file)?);
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(map_transport)?;

        decode(checked(response).await?).await
    }

    pub async fn analyze(
        &self,
        file: &CsvFile,
        target_column: Option<&str>,
    ) -> Result<AnalysisResult, FlowError> {
        let mut form = Form::new().part("file", csv_part(file)?);
        if let Some(column) = target_column {
            form = form.text("target_column", column.to_string());
        }

        let response = self
            .http
            .post(format!("{}/api/analyze", self.base_url))
            .multipart(form)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(map_transport)?;

        decode(checked(response).await?).await
    }

    pub async fn predict(
        &self,
        file: &CsvFile,
        selected_model: &str,
    ) -> Result<PredictResponse, FlowError> {
        let form = Form::new()
            .part("file", csv_part(file)?)
            .text("selected_model", selected_model.to_string());

        let response = self
            .http
            .post(format!("{}/api/predict", self.base_url))
            .multipart(form)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(map_transport)?;

        let response: PredictResponse = decode(checked(response).await?).await?;

        // Reject a label array that does not cover the data rows exactly;
        // no row is ever rendered without its label.
        let rows = response.csv_data.len().saturating_sub(1);
        if response.predictions.len() != rows {
            return Err(FlowError::LabelMismatch {
                rows,
                labels: response.predictions.len(),
            });
        }

        Ok(response)
    }

    pub async fn weather(&self) -> Result<String, FlowError> {
        let response = self
            .http
            .get(format!("{}/weather", self.base_url))
            .send()
            .await
            .map_err(map_transport)?;

        response.text().await.map_err(map_transport)
    }
}

fn csv_part(file: &CsvFile) -> Result<Part, FlowError> {
    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(file.mime.as_deref().unwrap_or("text/csv"))
        .map_err(FlowError::Transport)
}

fn map_transport(e: reqwest::Error) -> FlowError {
    if e.is_timeout() {
        return FlowError::TimedOut;
    }

    FlowError::Transport(e)
}

/// Turns an HTTP error status into [`FlowError::Server`] carrying the
/// backend's `detail` string verbatim.
async fn checked(response: reqwest::Response) -> Result<reqwest::Response, FlowError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.json::<Value>().await {
        Ok(body) => body
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or("An unexpected error occurred")
            .to_string(),
        Err(_) => "An unexpected error occurred".to_string(),
    };

    Err(FlowError::Server {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, FlowError> {
    response.json().await.map_err(map_transport)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ApiClient, CsvFile, FlowError, MlResult};

    fn sample_file() -> CsvFile {
        CsvFile {
            name: "data.csv".to_string(),
            mime: Some("text/csv".to_string()),
            bytes: b"a,b\n1,2\n".to_vec(),
        }
    }

    #[test]
    fn test_csv_detection() {
        assert!(sample_file().is_csv());

        let by_name = CsvFile {
            name: "DATA.CSV".to_string(),
            mime: Some("application/octet-stream".to_string()),
            bytes: Vec::new(),
        };
        assert!(by_name.is_csv());

        let neither = CsvFile {
            name: "data.xlsx".to_string(),
            mime: Some("application/vnd.ms-excel".to_string()),
            bytes: Vec::new(),
        };
        assert!(!neither.is_csv());
    }

    #[test]
    fn test_ml_result_decodes_both_shapes() {
        let metrics: MlResult = serde_json::from_str(
            r#"{"accuracy": 0.9, "f1_score": 0.8, "auc": 0.95, "classification_report": {}}"#,
        )
        .unwrap();
        assert!(matches!(metrics, MlResult::Metrics { .. }));

        let error: MlResult = serde_json::from_str(r#"{"error": "bad target column"}"#).unwrap();
        match error {
            MlResult::Error { error } => assert_eq!(error, "bad target column"),
            other => panic!("expected error variant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_other_transport_failures() {
        // An upstream that accepts the connection and never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let held = listener.accept();
            std::thread::sleep(Duration::from_secs(2));
            drop(held);
        });

        let client = ApiClient::with_timeout(format!("http://{addr}"), Duration::from_millis(200));
        match client.predict(&sample_file(), "model.joblib").await {
            Err(FlowError::TimedOut) => {}
            other => panic!("expected TimedOut, got {other:?}"),
        }

        // Nothing listens on a closed port: same call, different error.
        let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_millis(200));
        match client.predict(&sample_file(), "model.joblib").await {
            Err(FlowError::Transport(_)) => {}
            other => panic!("expected Transport, got {other:?}"),
        }
    }
}
