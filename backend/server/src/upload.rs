use std::{collections::HashMap, path::Path, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::info;

use crate::{error::AppError, state::AppState, utils::is_csv_file};

pub const UPLOAD_OK: &str = "File uploaded successfully";

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
}

pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Drains a multipart body into the one `file` part plus any plain text
/// fields. Later duplicate fields overwrite earlier ones.
pub async fn read_form(
    mut multipart: Multipart,
) -> Result<(Option<UploadedFile>, HashMap<String, String>), AppError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MalformedPayload)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or(AppError::MalformedPayload)?;
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|_| AppError::MalformedPayload)?;

            file = Some(UploadedFile {
                name: file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(|_| AppError::MalformedPayload)?;
            fields.insert(name, value);
        }
    }

    Ok((file, fields))
}

pub async fn save_upload(state: &AppState, file: &UploadedFile) -> Result<(), AppError> {
    let safe_name = Path::new(&file.name)
        .file_name()
        .ok_or(AppError::MalformedPayload)?;
    let dir = Path::new(&state.config.upload_dir);

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(safe_name), &file.bytes).await?;

    info!("File uploaded successfully: {}", file.name);

    Ok(())
}

pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (file, _fields) = read_form(multipart).await?;
    let file = file.ok_or(AppError::MalformedPayload)?;

    info!("Received file upload request: {}", file.name);

    if !is_csv_file(&file.name, file.content_type.as_deref()) {
        return Err(AppError::NotCsv);
    }

    save_upload(&state, &file).await?;

    Ok(Json(UploadResponse {
        status: UPLOAD_OK.to_string(),
        filename: file.name,
    }))
}
