//! Content store types

// ============================================================================
// Constants
// ============================================================================

/// Length of a hex-encoded SHA-256 digest
pub const IDENTIFIER_LEN: usize = 64;

// ============================================================================
// Stored Object
// ============================================================================

/// A persisted upload, addressed by the digest of its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Hex-encoded SHA-256 digest of the content
    pub identifier: String,

    /// Extension taken from the suggested name, including the leading dot
    /// (empty when the name has none)
    pub extension: String,

    /// `<root>/<identifier><extension>`
    pub reference: String,
}

impl StoredObject {
    /// Name of the object inside the storage root
    pub fn file_name(&self) -> String {
        format!("{}{}", self.identifier, self.extension)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the content store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create storage directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write object {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read object {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),
}
