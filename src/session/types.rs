//! Session binding types

use axum::http::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};

/// Browsers drop cookies larger than this
pub const MAX_COOKIE_SIZE: usize = 4096;

/// The video currently associated with a browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVideoBinding {
    /// Reference returned by the content store
    pub reference: String,

    /// File name the video was uploaded under, for display only
    pub display_name: String,
}

/// Errors reading or writing the session cookie
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to encode session: {0}")]
    Encode(String),

    #[error("Malformed session cookie: {0}")]
    Malformed(String),

    #[error("Session cookie signature mismatch")]
    InvalidSignature,

    #[error("Session cookie too large: {size} bytes (max: {max})")]
    CookieTooLarge { size: usize, max: usize },

    #[error("Invalid session cookie header: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// Outcome of looking up a session's binding
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Nothing has been uploaded in this session
    #[error("No video bound to this session")]
    NotBound,

    #[error(transparent)]
    Session(#[from] SessionError),
}
