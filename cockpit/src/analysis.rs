//! Analysis-result page: recomputes its view from the transient navigation
//! state, splitting the classification report into per-label rows and the
//! averaged summary rows.
use serde_json::Value;

use crate::api::{AnalysisResult, MlResult};

const SUMMARY_KEYS: [&str; 3] = ["accuracy", "macro avg", "weighted avg"];

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1_score: Option<f64>,
    pub support: Option<f64>,
}

#[derive(Debug)]
pub enum AnalysisView {
    /// No navigation state: the user landed here without uploading.
    Missing,
    Failed {
        filename: String,
        status: String,
        error: String,
    },
    Report {
        filename: String,
        status: String,
        accuracy: f64,
        f1_score: f64,
        auc: f64,
        labels: Vec<ReportRow>,
        summary: Vec<ReportRow>,
    },
}

impl AnalysisView {
    pub fn from_state(state: Option<&AnalysisResult>) -> Self {
        let Some(result) = state else {
            return AnalysisView::Missing;
        };

        match &result.ml_result {
            MlResult::Error { error } => AnalysisView::Failed {
                filename: result.upload_result.filename.clone(),
                status: result.upload_result.status.clone(),
                error: error.clone(),
            },
            MlResult::Metrics {
                accuracy,
                f1_score,
                auc,
                classification_report,
            } => {
                let mut labels = Vec::new();
                let mut summary = Vec::new();

                for (key, value) in classification_report {
                    // Plain-number entries (the report's own `accuracy`)
                    // duplicate the top-level metrics and are skipped.
                    let Some(row) = report_row(key, value) else {
                        continue;
                    };

                    if SUMMARY_KEYS.contains(&key.as_str()) {
                        summary.push(row);
                    } else {
                        labels.push(row);
                    }
                }

                AnalysisView::Report {
                    filename: result.upload_result.filename.clone(),
                    status: result.upload_result.status.clone(),
                    accuracy: *accuracy,
                    f1_score: *f1_score,
                    auc: *auc,
                    labels,
                    summary,
                }
            }
        }
    }
}

fn report_row(label: &str, value: &Value) -> Option<ReportRow> {
    let entry = value.as_object()?;

    Some(ReportRow {
        label: label.to_string(),
        precision: entry.get("precision").and_then(Value::as_f64),
        recall: entry.get("recall").and_then(Value::as_f64),
        f1_score: entry.get("f1-score").and_then(Value::as_f64),
        support: entry.get("support").and_then(Value::as_f64),
    })
}
