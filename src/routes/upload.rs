//! Upload endpoints
//!
//! - PUT / - raw body upload, file name in the `File-Name` header
//! - POST / - multipart form upload, file in the `video` field
//!
//! Both persist the bytes in the content store and then bind the returned
//! reference to the caller's session.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::HeaderMap,
    response::Html,
};

use crate::error::{AppError, Result};
use crate::html::{render_index, VideoView};
use crate::state::AppState;
use crate::storage::StoredObject;

/// Header carrying the original file name of a raw upload
pub const FILE_NAME_HEADER: &str = "file-name";

/// Multipart field carrying the uploaded video
pub const VIDEO_FIELD: &str = "video";

/// PUT /
///
/// Responds with the plain-text reference.
pub async fn put_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(HeaderMap, String)> {
    let file_name = file_name_header(&headers);

    let mut response_headers = HeaderMap::new();
    let object = store_and_bind(&state, &mut response_headers, &body, &file_name).await?;

    Ok((response_headers, object.reference))
}

/// POST /
///
/// Responds with the index page playing the uploaded video.
pub async fn post_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(HeaderMap, Html<String>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Input(format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(AppError::Input(format!("Field '{}' carries no file", VIDEO_FIELD))),
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Input(format!("Failed to read file data: {}", e)))?;

        let mut response_headers = HeaderMap::new();
        let object = store_and_bind(&state, &mut response_headers, &data, &file_name).await?;

        let page = render_index(Some(VideoView {
            reference: &object.reference,
            display_name: &file_name,
        }));
        return Ok((response_headers, Html(page)));
    }

    tracing::warn!("No video field found in multipart upload");
    Err(AppError::Input(format!("No file provided. Use field name '{}'", VIDEO_FIELD)))
}

/// Persist the upload, then point the session at it
///
/// If binding fails the object stays on disk; it is content-addressed, so a
/// retry lands on the same file.
async fn store_and_bind(
    state: &AppState,
    response_headers: &mut HeaderMap,
    data: &[u8],
    file_name: &str,
) -> Result<StoredObject> {
    let object = state.content_store().persist(data, file_name).await?;
    state
        .sessions()
        .bind(response_headers, &object.reference, file_name)?;

    tracing::info!(
        reference = %object.reference,
        file_name = %file_name,
        size = data.len(),
        "Video uploaded"
    );

    Ok(object)
}

/// Original file name of a raw upload, percent-decoded when encoded
///
/// A missing header yields an empty name.
fn file_name_header(headers: &HeaderMap) -> String {
    let Some(value) = headers.get(FILE_NAME_HEADER) else {
        return String::new();
    };

    let raw = String::from_utf8_lossy(value.as_bytes());
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_file_name_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(file_name_header(&headers), "");

        headers.insert(FILE_NAME_HEADER, HeaderValue::from_static("clip.mp4"));
        assert_eq!(file_name_header(&headers), "clip.mp4");

        headers.insert(
            FILE_NAME_HEADER,
            HeaderValue::from_static("my%20holiday%20%C3%A9t%C3%A9.webm"),
        );
        assert_eq!(file_name_header(&headers), "my holiday été.webm");
    }
}
