//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use mediahook_core::{ArtifactPayload, DerivedArtifact};
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Content length mismatch for {key}: declared {declared} bytes, wrote {actual} bytes")]
    LengthMismatch {
        key: String,
        declared: u64,
        actual: u64,
    },

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object body returned by [`Storage::get_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// The handlers read their source object and publish derived artifacts through
/// this trait only, so any backend (S3, local filesystem, in-memory for tests)
/// can be swapped in.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Download an object as a stream of chunks
    async fn get_stream(&self, bucket: &str, key: &str) -> StorageResult<ByteStream>;

    /// Download an object fully into memory
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let mut stream = self.get_stream(bucket, key).await?;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }

    /// Publish a derived artifact to `artifact.bucket`/`artifact.key`.
    ///
    /// The content type is sent only when the artifact carries one.
    async fn put(&self, artifact: &DerivedArtifact) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Load an artifact payload into memory and check it against the declared length.
pub async fn read_payload(artifact: &DerivedArtifact) -> StorageResult<Bytes> {
    let data = match &artifact.payload {
        ArtifactPayload::Buffer(bytes) => bytes.clone(),
        ArtifactPayload::File(path) => Bytes::from(tokio::fs::read(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?),
    };

    if data.len() as u64 != artifact.content_length {
        return Err(StorageError::LengthMismatch {
            key: artifact.key.clone(),
            declared: artifact.content_length,
            actual: data.len() as u64,
        });
    }

    Ok(data)
}
