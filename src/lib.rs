//! Reel Server Library
//!
//! Upload a video, store it under the hash of its content, and play back the
//! last upload of each browser session.
//!
//! # Modules
//!
//! - `storage`: content-addressed object store
//! - `session`: signed-cookie binding of a session to its current video
//! - `routes`: HTTP endpoints and router assembly
//! - `html`: page and fragment rendering

pub mod config;
pub mod error;
pub mod html;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
