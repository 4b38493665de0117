//! Page endpoints
//!
//! - GET / - index page
//! - GET /video - playback fragment for the session's current video

use axum::{extract::State, http::HeaderMap, response::Html};

use crate::error::Result;
use crate::html::{render_index, render_video, VideoView};
use crate::session::ResolveError;
use crate::state::AppState;

/// GET /
///
/// The player is filled in client-side from `/video`.
pub async fn index() -> Html<String> {
    Html(render_index(None))
}

/// GET /video
pub async fn video_partial(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    let binding = match state.sessions().resolve(&headers) {
        Ok(binding) => binding,
        Err(ResolveError::NotBound) => return Ok(Html(render_video(None))),
        Err(ResolveError::Session(e)) => return Err(e.into()),
    };

    Ok(Html(render_video(Some(VideoView {
        reference: &binding.reference,
        display_name: &binding.display_name,
    }))))
}
