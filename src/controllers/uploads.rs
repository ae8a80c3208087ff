use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::blobs::UploadError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/uploads", post(upload_image))
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    filename: String,
    // Base64-encoded file contents
    data: String,
}

// POST /api/uploads
async fn upload_image(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<UploadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = general_purpose::STANDARD
        .decode(&req.data)
        .map_err(|_| ApiError::Validation("data must be valid base64".to_string()))?;

    let url = state
        .blobs
        .store(&req.filename, &bytes)
        .await
        .map_err(|e| match e {
            UploadError::UnsupportedType | UploadError::TooLarge => {
                ApiError::Validation(e.to_string())
            }
            UploadError::Io(io) => ApiError::Internal(io.into()),
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "url": url }))))
}
