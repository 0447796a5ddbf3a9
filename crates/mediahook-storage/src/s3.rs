use crate::traits::{read_payload, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use mediahook_core::{ArtifactPayload, DerivedArtifact};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMultipartOptions, PutOptions,
    PutPayload, Result as ObjectResult, WriteMultipart,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// S3 storage implementation
///
/// The notification names the source bucket and configuration names the
/// destination bucket, so one client is built per bucket on first use.
#[derive(Clone)]
pub struct S3Storage {
    stores: Arc<Mutex<HashMap<String, Arc<AmazonS3>>>>,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> Self {
        S3Storage {
            stores: Arc::new(Mutex::new(HashMap::new())),
            region,
            endpoint_url,
        }
    }

    /// Client for `bucket`, built from environment credentials on first use.
    fn store(&self, bucket: &str) -> StorageResult<Arc<AmazonS3>> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| StorageError::BackendError("S3 client cache poisoned".to_string()))?;

        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = Arc::new(
            builder
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?,
        );
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

/// Upload parts allowed in flight while streaming a scratch file.
const MAX_PART_CONCURRENCY: usize = 4;

/// Object path for `key`, kept byte-for-byte (unicode, `%` and `[]` included).
fn location(key: &str) -> StorageResult<Path> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("empty key".to_string()));
    }
    Path::parse(key).map_err(|e| StorageError::InvalidKey(e.to_string()))
}

fn content_type_attributes(artifact: &DerivedArtifact) -> Attributes {
    let mut attributes = Attributes::new();
    if let Some(ref content_type) = artifact.content_type {
        attributes.insert(Attribute::ContentType, content_type.clone().into());
    }
    attributes
}

/// Stream a file into `location` as a multipart upload.
///
/// The upload is aborted when reading fails or the file length differs from
/// `declared`, so no partial object is left behind.
async fn stream_file(
    store: &dyn ObjectStore,
    location: &Path,
    source: &std::path::Path,
    declared: u64,
    attributes: Attributes,
) -> StorageResult<u64> {
    let file = tokio::fs::File::open(source).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to open {}: {}", source.display(), e))
    })?;

    let opts = PutMultipartOptions {
        attributes,
        ..Default::default()
    };
    let upload = store
        .put_multipart_opts(location, opts)
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
    let mut writer = WriteMultipart::new(upload);

    let mut reader = tokio_util::io::ReaderStream::new(file);
    let mut written = 0u64;
    while let Some(chunk) = reader.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = writer.abort().await;
                return Err(StorageError::UploadFailed(format!(
                    "Failed to read {}: {}",
                    source.display(),
                    e
                )));
            }
        };
        if let Err(e) = writer.wait_for_capacity(MAX_PART_CONCURRENCY).await {
            let _ = writer.abort().await;
            return Err(StorageError::UploadFailed(e.to_string()));
        }
        written += chunk.len() as u64;
        writer.put(chunk);
    }

    if written != declared {
        let _ = writer.abort().await;
        return Err(StorageError::LengthMismatch {
            key: location.to_string(),
            declared,
            actual: written,
        });
    }

    writer
        .finish()
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
    Ok(written)
}

#[async_trait]
impl Storage for S3Storage {
    async fn get_stream(&self, bucket: &str, key: &str) -> StorageResult<ByteStream> {
        let start = std::time::Instant::now();
        let store = self.store(bucket)?;
        let location = location(key)?;

        let result: ObjectResult<_> = store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => {
                StorageError::NotFound(format!("{}/{}", bucket, key))
            }
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bucket = bucket.to_string();
        let key = key.to_string();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        });

        Ok(Box::pin(stream))
    }

    async fn put(&self, artifact: &DerivedArtifact) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let store = self.store(&artifact.bucket)?;
        let location = location(&artifact.key)?;
        let attributes = content_type_attributes(artifact);

        let result = match &artifact.payload {
            ArtifactPayload::Buffer(_) => {
                let data = read_payload(artifact).await?;
                let size = data.len() as u64;
                let opts = PutOptions {
                    attributes,
                    ..Default::default()
                };
                let result: ObjectResult<_> = store
                    .put_opts(&location, PutPayload::from(data), opts)
                    .await;
                result
                    .map(|_| size)
                    .map_err(|e| StorageError::UploadFailed(e.to_string()))
            }
            ArtifactPayload::File(path) => {
                stream_file(
                    &*store,
                    &location,
                    path,
                    artifact.content_length,
                    attributes,
                )
                .await
            }
        };

        let size = result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %artifact.bucket,
                key = %artifact.key,
                size_bytes = artifact.content_length,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            e
        })?;

        tracing::info!(
            bucket = %artifact.bucket,
            key = %artifact.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
