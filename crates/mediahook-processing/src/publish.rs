use mediahook_core::{DerivedArtifact, PublishedArtifact};
use mediahook_storage::Storage;

use crate::error::PipelineError;

/// Write one artifact to the destination store.
///
/// Failures are returned immediately; callers stop at the first one.
pub async fn publish(
    storage: &dyn Storage,
    artifact: &DerivedArtifact,
) -> Result<PublishedArtifact, PipelineError> {
    tracing::info!(
        bucket = %artifact.bucket,
        key = %artifact.key,
        size_bytes = artifact.content_length,
        content_type = artifact.content_type.as_deref().unwrap_or(""),
        "Writing to: {}/{}",
        artifact.bucket,
        artifact.key
    );

    storage.put(artifact).await.map_err(|source| {
        tracing::error!(
            error = %source,
            bucket = %artifact.bucket,
            key = %artifact.key,
            "Publish failed"
        );
        PipelineError::Publish {
            bucket: artifact.bucket.clone(),
            key: artifact.key.clone(),
            source,
        }
    })?;

    Ok(PublishedArtifact::from(artifact))
}
