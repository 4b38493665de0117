//! Content Store
//!
//! Persists uploads under the SHA-256 digest of their bytes so identical
//! content always lands on the same reference. Storage goes through the
//! `ObjectStorage` trait; the local filesystem backend is the production one.

use std::future::Future;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::types::{StorageError, StoredObject, IDENTIFIER_LEN};

// ============================================================================
// Object Storage Trait
// ============================================================================

/// Trait for object storage backends
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create the storage root and any missing parents
    async fn ensure_root(&self) -> Result<(), StorageError>;

    /// Check whether an object with this name is already stored
    async fn object_exists(&self, name: &str) -> bool;

    /// Store an object under `name`, replacing any existing one
    async fn write_object(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Filesystem path of an object, for backends that keep objects as files
    fn local_path(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

// ============================================================================
// Content Store (Main Implementation)
// ============================================================================

/// Content-addressed store with a pluggable backend
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<ContentStoreInner>,
}

struct ContentStoreInner {
    /// Root as it appears in references, without a trailing slash
    root: String,

    /// Storage backend
    backend: Box<dyn ObjectStorage>,
}

impl ContentStore {
    /// Create with local filesystem storage rooted at `root`
    pub fn with_local_storage(root: impl Into<String>) -> Self {
        let root = root.into();
        let backend = LocalObjectStorage::new(PathBuf::from(&root));
        Self::with_backend(root, backend)
    }

    /// Create with a custom backend; `root` is only used to build references
    pub fn with_backend(root: impl Into<String>, backend: impl ObjectStorage + 'static) -> Self {
        let root = root.into();
        Self {
            inner: Arc::new(ContentStoreInner {
                root: root.trim_end_matches('/').to_string(),
                backend: Box::new(backend),
            }),
        }
    }

    /// Storage root used as the reference prefix
    pub fn root(&self) -> &str {
        &self.inner.root
    }

    /// Persist `content` and return its content-derived reference
    ///
    /// Identical bytes always produce the same reference whatever the
    /// suggested name, as long as the extension matches. The write is skipped
    /// when the object already exists.
    pub async fn persist(
        &self,
        content: &[u8],
        suggested_name: &str,
    ) -> Result<StoredObject, StorageError> {
        let identifier = compute_hash(content);
        let extension = extension_of(suggested_name).to_string();
        let object = StoredObject {
            reference: format!("{}/{}{}", self.inner.root, identifier, extension),
            identifier,
            extension,
        };
        let name = object.file_name();

        self.inner.backend.ensure_root().await?;

        // Racing identical uploads may both get here; the bytes are the same.
        if self.inner.backend.object_exists(&name).await {
            tracing::debug!(
                reference = %object.reference,
                "Object already stored, skipping write"
            );
            return Ok(object);
        }

        self.inner.backend.write_object(&name, content).await?;

        tracing::info!(
            reference = %object.reference,
            size = content.len(),
            "Stored object"
        );

        Ok(object)
    }

    /// Path of a stored object by its on-disk name (`<identifier><extension>`)
    ///
    /// Callers stream from the returned path instead of loading the object.
    pub async fn locate(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        if !is_object_name(file_name) {
            return Err(StorageError::InvalidName(file_name.to_string()));
        }
        if !self.inner.backend.object_exists(file_name).await {
            return Err(StorageError::NotFound(file_name.to_string()));
        }
        self.inner
            .backend
            .local_path(file_name)
            .ok_or_else(|| StorageError::Read {
                name: file_name.to_string(),
                source: io::Error::new(ErrorKind::Unsupported, "backend has no local files"),
            })
    }
}

// ============================================================================
// Local Filesystem Storage
// ============================================================================

/// Local filesystem object storage
pub struct LocalObjectStorage {
    base_path: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn object_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.base_path.to_string_lossy().to_string(),
                source,
            })
    }

    async fn object_exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.object_path(name))
            .await
            .unwrap_or(false)
    }

    async fn write_object(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = self.temp_path(name);
        write_aside(&temp_path, &self.object_path(name), |mut file| async move {
            file.write_all(data).await?;
            file.flush().await
        })
        .await
        .map_err(|source| StorageError::Write {
            name: name.to_string(),
            source,
        })
    }

    fn local_path(&self, name: &str) -> Option<PathBuf> {
        Some(self.object_path(name))
    }
}

/// Fill `temp_path` with `write`, then rename it over `dest`
///
/// Readers never see a partial object. On any failure the temp file is
/// removed, whether the write or the rename failed.
async fn write_aside<F, Fut>(temp_path: &Path, dest: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(tokio::fs::File) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let result = async move {
        let file = tokio::fs::File::create(temp_path).await?;
        write(file).await?;
        tokio::fs::rename(temp_path, dest).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(temp_path).await;
    }
    result
}

// ============================================================================
// Helpers
// ============================================================================

/// Compute SHA-256 hash of data
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Extension of the final path component, from its last `.` onward
///
/// Returns an empty string when there is no dot. Both `/` and `\` end a
/// directory part, and directory parts are ignored, so the result never
/// contains a separator.
pub fn extension_of(name: &str) -> &str {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Whether `name` looks like `<64 lowercase hex><extension>`
fn is_object_name(name: &str) -> bool {
    if name.len() < IDENTIFIER_LEN || !name.is_char_boundary(IDENTIFIER_LEN) {
        return false;
    }
    let (identifier, extension) = name.split_at(IDENTIFIER_LEN);
    identifier
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        && (extension.is_empty() || extension.starts_with('.'))
        && !extension.contains(|c| c == '/' || c == '\\')
}

// ============================================================================
// Tests
// ============================================================================
