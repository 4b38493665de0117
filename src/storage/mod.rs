//! Content-addressed storage for uploaded videos
//!
//! Objects are named by the SHA-256 digest of their bytes plus the extension
//! of the name they were uploaded under. There is no index; an object exists
//! if its file exists.

pub mod content_store;
pub mod types;

pub use content_store::{compute_hash, extension_of, ContentStore, LocalObjectStorage, ObjectStorage};
pub use types::*;
