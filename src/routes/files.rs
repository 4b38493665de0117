//! Stored object serving
//!
//! Streams uploaded videos from the content store by on-disk name. Range
//! requests are answered with partial content so players can seek.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::Response,
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::Result;
use crate::state::AppState;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new().route("/:file", get(serve_object))
}

/// Serve a stored object
async fn serve_object(
    State(state): State<AppState>,
    Path(file): Path<String>,
    request: Request,
) -> Result<Response> {
    let path = state.content_store().locate(&file).await?;
    let content_type = mime_guess::from_path(&file).first_or_octet_stream();

    let response = match ServeFile::new_with_mime(path, &content_type)
        .oneshot(request)
        .await
    {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        // Content-addressed, so the bytes behind a name never change
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        );
    }
    Ok(response)
}
