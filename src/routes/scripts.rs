//! Bundled script assets, embedded at compile time

use axum::{
    extract::Path,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Scripts shipped with the binary, keyed by path under `/scripts/`
const ASSETS: &[(&str, &str)] = &[(
    "components/upload-area.js",
    include_str!("../../scripts/components/upload-area.js"),
)];

/// Create the scripts router
pub fn router() -> Router<AppState> {
    Router::new().route("/*path", get(serve_script))
}

async fn serve_script(Path(path): Path<String>) -> Result<impl IntoResponse> {
    let (_, source) = ASSETS
        .iter()
        .find(|(name, _)| *name == path)
        .ok_or_else(|| AppError::NotFound(format!("Script '{}' not found", path)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        *source,
    ))
}
