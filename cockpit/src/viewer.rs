//! Model-viewer page: pick a trained model, feed it a CSV, read the
//! pass/fail table.
use crate::{
    api::{ApiClient, CsvFile, FileInfo, FlowError, PredictResponse},
    table::PredictionTable,
};

#[derive(Debug, Default)]
pub struct ModelViewer {
    files: Vec<FileInfo>,
    selected: Option<String>,
    csv_name: Option<String>,
    table: Option<PredictionTable>,
    error: Option<String>,
}

impl ModelViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &ApiClient) {
        match client.files().await {
            Ok(files) => self.files = files,
            Err(_) => self.error = Some("Failed to load files".to_string()),
        }
    }

    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn csv_name(&self) -> Option<&str> {
        self.csv_name.as_deref()
    }

    pub fn table(&self) -> Option<&PredictionTable> {
        self.table.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clicking the selected model again deselects it; either way any
    /// loaded results are discarded.
    pub fn toggle_model(&mut self, path: &str) {
        if self.selected.as_deref() == Some(path) {
            self.selected = None;
        } else {
            self.selected = Some(path.to_string());
        }

        self.csv_name = None;
        self.table = None;
    }

    pub async fn upload_csv(&mut self, client: &ApiClient, file: CsvFile) {
        let Some(model) = self.selected.clone() else {
            self.error = Some(FlowError::NoModel.to_string());
            return;
        };

        self.csv_name = Some(file.name.clone());
        let outcome = client.predict(&file, &model).await;
        self.apply_prediction(outcome);
    }

    /// Folds a prediction outcome into the page state: a table on success,
    /// a visible error string on any failure.
    pub fn apply_prediction(&mut self, outcome: Result<PredictResponse, FlowError>) {
        match outcome {
            Ok(response) => {
                match PredictionTable::build(&response.csv_data, &response.predictions) {
                    Ok(table) => {
                        self.table = Some(table);
                        self.error = None;
                    }
                    Err(e) => {
                        self.table = None;
                        self.error = Some(format!("Prediction failed: {e}"));
                    }
                }
            }
            Err(FlowError::Server { detail, .. }) => {
                self.table = None;
                self.error = Some(format!("Prediction failed: {detail}"));
            }
            Err(e @ (FlowError::TimedOut | FlowError::LabelMismatch { .. })) => {
                self.table = None;
                self.error = Some(e.to_string());
            }
            Err(_) => {
                self.table = None;
                self.error = Some("An unexpected error occurred during prediction.".to_string());
            }
        }
    }
}
