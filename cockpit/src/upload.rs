//! The upload form: pick a CSV, send it off, land on a results view.
//!
//! One submission at a time. While a request is pending the trigger is
//! dead: a second submit is rejected without touching any state.
use crate::api::{AnalysisResult, ApiClient, CsvFile, FlowError, PredictResponse};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Rejected { code: u16, message: String },
    Uploading,
    Done { code: u16, message: String },
    Failed { code: u16, message: String },
}

/// Where a successful submission navigates, with the full response as
/// transient state. Dropped on navigation, never persisted.
#[derive(Debug)]
pub enum Navigation {
    Results(PredictResponse),
    Analysis(AnalysisResult),
}

#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<CsvFile>,
    status: FormStatus,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the candidate iff it identifies as CSV; otherwise clears any
    /// prior selection and records a 400-equivalent rejection.
    pub fn select_file(&mut self, candidate: CsvFile) -> bool {
        if candidate.is_csv() {
            self.file = Some(candidate);
            self.status = FormStatus::Idle;
            return true;
        }

        self.file = None;
        self.status = FormStatus::Rejected {
            code: 400,
            message: format!("Error: {}", FlowError::NotCsv),
        };
        false
    }

    pub fn selected_file(&self) -> Option<&CsvFile> {
        self.file.as_ref()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_uploading(&self) -> bool {
        self.status == FormStatus::Uploading
    }

    /// Sends the selected file to the prediction service under
    /// `selected_model`. Success navigates to the results view.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        selected_model: &str,
    ) -> Result<Navigation, FlowError> {
        let file = self.begin()?;

        match client.predict(&file, selected_model).await {
            Ok(response) => {
                self.status = FormStatus::Done {
                    code: 200,
                    message: "Prediction complete".to_string(),
                };
                Ok(Navigation::Results(response))
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Sends the selected file for a full train-and-evaluate pass. Success
    /// navigates to the analysis page carrying the metrics bundle.
    pub async fn submit_for_analysis(
        &mut self,
        client: &ApiClient,
        target_column: Option<&str>,
    ) -> Result<Navigation, FlowError> {
        let file = self.begin()?;

        match client.analyze(&file, target_column).await {
            Ok(result) => {
                self.status = FormStatus::Done {
                    code: 200,
                    message: format!(
                        "{} File: {}",
                        result.upload_result.status, result.upload_result.filename
                    ),
                };
                Ok(Navigation::Analysis(result))
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn begin(&mut self) -> Result<CsvFile, FlowError> {
        if self.is_uploading() {
            return Err(FlowError::Busy);
        }

        let Some(file) = self.file.clone() else {
            return Err(FlowError::NoFile);
        };

        self.status = FormStatus::Uploading;
        Ok(file)
    }

    fn fail(&mut self, e: &FlowError) {
        let code = match e {
            FlowError::Server { status, .. } => *status,
            _ => 500,
        };
        let message = match e {
            FlowError::TimedOut => e.to_string(),
            FlowError::Server { .. } => format!("Error: {e}"),
            _ => "An unexpected error occurred.".to_string(),
        };

        self.status = FormStatus::Failed { code, message };
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FormStatus, UploadForm};
    use crate::api::{ApiClient, CsvFile, FlowError};

    fn csv() -> CsvFile {
        CsvFile {
            name: "quality.csv".to_string(),
            mime: Some("text/csv".to_string()),
            bytes: b"a,b\n1,2\n".to_vec(),
        }
    }

    fn spreadsheet() -> CsvFile {
        CsvFile {
            name: "quality.xlsx".to_string(),
            mime: Some("application/vnd.ms-excel".to_string()),
            bytes: Vec::new(),
        }
    }

    #[test]
    fn test_select_accepts_csv() {
        let mut form = UploadForm::new();

        assert!(form.select_file(csv()));
        assert!(form.selected_file().is_some());
        assert_eq!(*form.status(), FormStatus::Idle);
    }

    #[test]
    fn test_reject_clears_prior_selection() {
        let mut form = UploadForm::new();
        form.select_file(csv());

        assert!(!form.select_file(spreadsheet()));
        assert!(form.selected_file().is_none());
        match form.status() {
            FormStatus::Rejected { code, message } => {
                assert_eq!(*code, 400);
                assert!(message.contains("Only CSV files"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_without_file_is_refused() {
        let mut form = UploadForm::new();
        let client = ApiClient::new("http://127.0.0.1:9");

        match form.submit(&client, "model.joblib").await {
            Err(FlowError::NoFile) => {}
            other => panic!("expected NoFile, got {other:?}"),
        }
        assert_eq!(*form.status(), FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_a_dead_trigger() {
        let mut form = UploadForm::new();
        form.select_file(csv());
        form.status = FormStatus::Uploading;

        let client = ApiClient::new("http://127.0.0.1:9");
        match form.submit(&client, "model.joblib").await {
            Err(FlowError::Busy) => {}
            other => panic!("expected Busy, got {other:?}"),
        }
        // The guard leaves the pending submission untouched.
        assert!(form.is_uploading());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_and_allows_retry() {
        let mut form = UploadForm::new();
        form.select_file(csv());

        let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_millis(200));
        assert!(form.submit(&client, "model.joblib").await.is_err());

        match form.status() {
            FormStatus::Failed { code, message } => {
                assert_eq!(*code, 500);
                assert!(!message.is_empty());
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // Not uploading anymore: the user can resubmit.
        assert!(!form.is_uploading());
    }
}
