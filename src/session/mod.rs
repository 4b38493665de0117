//! Session-scoped "current video" tracking
//!
//! Each browser session remembers the last video it uploaded through a signed
//! cookie carrying a `SessionVideoBinding`.

pub mod codec;
pub mod tracker;
pub mod types;

pub use codec::CookieSigner;
pub use tracker::SessionTracker;
pub use types::*;
