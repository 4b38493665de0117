//! Route modules for Reel Server

pub mod files;
pub mod health;
pub mod pages;
pub mod scripts;
pub mod upload;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().storage.max_upload_bytes;

    Router::new()
        .route(
            "/",
            get(pages::index)
                .put(upload::put_video)
                .post(upload::post_video),
        )
        .route("/video", get(pages::video_partial))
        .route("/health", get(health::health_check))
        .nest("/uploads", files::router())
        .nest("/scripts", scripts::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
