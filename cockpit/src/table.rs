//! Renders a predicted CSV into plain table data: header row out front,
//! every data row paired with its pass/fail label.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Pass,
    Fail,
}

impl RowStatus {
    /// Pass iff the label is exactly 1. Any other value, including
    /// out-of-range labels, renders as fail.
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            RowStatus::Pass
        } else {
            RowStatus::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Pass => "pass",
            RowStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub label: i64,
    pub status: RowStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("CSV content has no header row")]
    Empty,

    #[error("{labels} labels for {rows} data rows")]
    LabelMismatch { rows: usize, labels: usize },
}

impl PredictionTable {
    /// Row 0 of `csv` is the header; data row `i` is labeled by
    /// `predictions[i]`. A label array that does not cover the data rows
    /// exactly is refused outright.
    pub fn build(csv: &[Vec<String>], predictions: &[i64]) -> Result<Self, TableError> {
        let Some((headers, data)) = csv.split_first() else {
            return Err(TableError::Empty);
        };

        if predictions.len() != data.len() {
            return Err(TableError::LabelMismatch {
                rows: data.len(),
                labels: predictions.len(),
            });
        }

        let rows = data
            .iter()
            .zip(predictions)
            .map(|(cells, &label)| TableRow {
                cells: cells.clone(),
                label,
                status: RowStatus::from_label(label),
            })
            .collect();

        Ok(Self {
            headers: headers.clone(),
            rows,
        })
    }

    pub fn pass_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == RowStatus::Pass)
            .count()
    }
}
