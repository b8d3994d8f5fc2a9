use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::AuthUser;
use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Largest accepted image.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];
const ALLOWED_KINDS: &[&str] = &["covers", "avatars"];

/// Lowercased extension of an accepted image file name.
fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn upload_kind(value: Option<&str>) -> Result<&'static str, DomainError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok("covers"),
        Some(v) => ALLOWED_KINDS
            .iter()
            .copied()
            .find(|k| *k == v)
            .ok_or_else(|| DomainError::validation("Upload type must be covers or avatars")),
    }
}

/// Store a cover or avatar image and return its public URL.
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let ext = image_extension(&file_name)
                    .filter(|_| content_type.is_empty() || content_type.starts_with("image/"))
                    .ok_or_else(|| {
                        DomainError::validation(
                            "Only jpeg, jpg, png, gif and webp images are accepted",
                        )
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                image = Some((ext, data.to_vec()));
            }
            Some("type") => {
                kind = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let (ext, data) = image.ok_or_else(|| DomainError::validation("No image uploaded"))?;
    if data.is_empty() {
        return Err(DomainError::validation("Uploaded image is empty").into());
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(DomainError::validation("Image exceeds the 5 MB limit").into());
    }
    let kind = upload_kind(kind.as_deref())?;

    let dir = state.config.upload_dir.join(kind);
    let filename = format!("{}.{}", uuid::Uuid::new_v4(), ext);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| DomainError::Internal(format!("create {dir:?}: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| DomainError::Internal(format!("write {filename}: {e}")))?;

    tracing::info!("User {} uploaded {}/{} ({} bytes)", auth.id, kind, filename, data.len());

    Ok(Json(json!({
        "message": "Upload complete",
        "url": format!("/uploads/{kind}/{filename}"),
        "filename": filename,
    })))
}
