use std::{path::Path, sync::Arc};

use axum::{Json, extract::State};
use serde::Serialize;
use walkdir::WalkDir;

use crate::{error::AppError, state::AppState};

const MODEL_EXTENSION: &str = "joblib";

#[derive(Serialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

pub async fn files_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileInfo>>, AppError> {
    Ok(Json(list_models(&state.config.model_dir)?))
}

/// Walks the model directory for trained `.joblib` artifacts. The listed
/// `path` is what the viewer later sends back as `selected_model`.
pub fn list_models(dir: &str) -> Result<Vec<FileInfo>, AppError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        files.push(FileInfo {
            name: stem.to_string(),
            path: path.display().to_string(),
            is_directory: false,
        });
    }

    Ok(files)
}

pub fn model_exists(dir: &str, selected_model: &str) -> bool {
    let path = Path::new(selected_model);

    path.is_file() && path.starts_with(dir)
}
