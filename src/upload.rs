use crate::{
    auth::AdminOnly,
    error::{AppError, AppResult},
};
use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::env::var;

lazy_static::lazy_static! {
    // unsigned preset upload endpoint of the hosted media service
    static ref MEDIA_UPLOAD_URL: String =
        var("MEDIA_UPLOAD_URL").expect("MEDIA_UPLOAD_URL must be set for file uploads");
    static ref MEDIA_UPLOAD_PRESET: String =
        var("MEDIA_UPLOAD_PRESET").expect("MEDIA_UPLOAD_PRESET must be set for file uploads");
}

#[allow(unused_must_use)]
pub fn ensure_media_config_is_valid() {
    MEDIA_UPLOAD_URL.len();
    MEDIA_UPLOAD_PRESET.len();
}

/// Returns the sniffed mime type if the bytes look like something we are
/// willing to forward to the media host. The client-supplied content type
/// is never trusted.
fn allowed_media_type(data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    let mime = kind.mime_type();
    if mime.starts_with("image/") || mime == mime::APPLICATION_PDF.as_ref() {
        // infer hands back 'static strings for its known types
        Some(mime)
    } else {
        None
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: String,
}

#[derive(Deserialize)]
struct MediaHostResponse {
    secure_url: String,
}

async fn upload(AdminOnly: AdminOnly, mut multipart: Multipart) -> AppResult<Json<UploadResponse>> {
    let Some(field) = multipart.next_field().await? else {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "no file provided"));
    };

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let data = field.bytes().await?;

    if data.is_empty() {
        return Err(AppError::from(StatusCode::BAD_REQUEST, "empty file"));
    }

    let Some(mime_type) = allowed_media_type(&data) else {
        return Err(AppError::from(
            StatusCode::BAD_REQUEST,
            "only images and pdf files can be uploaded",
        ));
    };

    let part = reqwest::multipart::Part::bytes(data.to_vec())
        .file_name(file_name)
        .mime_str(mime_type)?;
    let form = reqwest::multipart::Form::new()
        .part("file", part)
        .text("upload_preset", MEDIA_UPLOAD_PRESET.clone());

    let response = reqwest::Client::new()
        .post(&*MEDIA_UPLOAD_URL)
        .multipart(form)
        .send()
        .await?;

    if !response.status().is_success() {
        tracing::error!(status = %response.status(), "media host rejected upload");
        return Err(AppError::from(
            StatusCode::BAD_GATEWAY,
            "media host rejected the upload",
        ));
    }

    let uploaded = response.json::<MediaHostResponse>().await?;

    Ok(Json(UploadResponse {
        url: uploaded.secure_url,
    }))
}

pub fn app() -> Router {
    Router::new().route("/", post(upload))
}

#[cfg(test)]
mod tests {
    use super::allowed_media_type;

    #[test]
    fn accepts_png() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(allowed_media_type(&png), Some("image/png"));
    }

    #[test]
    fn accepts_jpeg() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(allowed_media_type(&jpeg), Some("image/jpeg"));
    }

    #[test]
    fn accepts_pdf() {
        let pdf = b"%PDF-1.7 some document";
        assert_eq!(allowed_media_type(pdf), Some("application/pdf"));
    }

    #[test]
    fn rejects_executables_and_unknown_bytes() {
        let exe = [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];
        assert_eq!(allowed_media_type(&exe), None);
        assert_eq!(allowed_media_type(b"just some text"), None);
        assert_eq!(allowed_media_type(&[]), None);
    }
}
