//! In-memory storage for tests

use crate::keys::validate_key;
use crate::traits::{read_payload, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use mediahook_core::{DerivedArtifact, PublishedArtifact};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock storage implementation that stores objects in memory
///
/// Every successful `put` is recorded in order, and a failure can be injected
/// on the Nth `put` call (1-based) to exercise fail-fast publishing.
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<(String, String), Bytes>>>,
    published: Arc<Mutex<Vec<PublishedArtifact>>>,
    put_calls: Arc<Mutex<usize>>,
    fail_on_put: Option<usize>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th call to `put` (1-based) with an upload error.
    pub fn failing_on_put(n: usize) -> Self {
        Self {
            fail_on_put: Some(n),
            ..Self::default()
        }
    }

    /// Set an object in the mock storage
    pub fn set_object(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    /// Get object data (for test assertions)
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Successful puts, in call order
    pub fn published(&self) -> Vec<PublishedArtifact> {
        self.published.lock().unwrap().clone()
    }

    /// Number of `put` calls, including failed ones
    pub fn put_calls(&self) -> usize {
        *self.put_calls.lock().unwrap()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn get_stream(&self, bucket: &str, key: &str) -> StorageResult<ByteStream> {
        validate_key(bucket, key)?;
        let data = self
            .object(bucket, key)
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))?;

        // Emit in small chunks so consumers exercise their streaming path.
        let chunks: Vec<Result<Bytes, StorageError>> = data
            .chunks(1024)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn put(&self, artifact: &DerivedArtifact) -> StorageResult<()> {
        let call = {
            let mut calls = self.put_calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        if self.fail_on_put == Some(call) {
            return Err(StorageError::UploadFailed(format!(
                "injected failure on put #{} ({})",
                call, artifact.key
            )));
        }

        validate_key(&artifact.bucket, &artifact.key)?;
        let data = read_payload(artifact).await?;
        self.set_object(&artifact.bucket, &artifact.key, data);
        self.published
            .lock()
            .unwrap()
            .push(PublishedArtifact::from(artifact));
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
