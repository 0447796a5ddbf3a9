use mediahook_core::naming::{resolve_image, thumbnail_key};
use mediahook_core::{DerivedArtifact, ImageConfig, PipelineOutcome, SkipReason, SourceReference};
use mediahook_storage::Storage;
use std::sync::Arc;

use super::transformer::ThumbnailTransformer;
use crate::error::PipelineError;
use crate::publish::publish;

/// Thumbnail handler body: one source image in, one thumbnail out.
#[derive(Clone)]
pub struct ImagePipeline {
    storage: Arc<dyn Storage>,
    config: ImageConfig,
}

impl ImagePipeline {
    pub fn new(storage: Arc<dyn Storage>, config: ImageConfig) -> Self {
        Self { storage, config }
    }

    #[tracing::instrument(skip(self), fields(bucket = %source.bucket, key = %source.key))]
    pub async fn run(&self, source: &SourceReference) -> Result<PipelineOutcome, PipelineError> {
        let resolved = match resolve_image(&source.key) {
            Ok(resolved) => resolved,
            Err(reason) => {
                match &reason {
                    SkipReason::NoExtension { key } => {
                        tracing::info!(key = %key, "Unable to infer image type for key")
                    }
                    SkipReason::UnrecognizedType { key, extension } => {
                        tracing::info!(key = %key, extension = %extension, "Skipping non-image")
                    }
                }
                return Ok(PipelineOutcome::Skipped(reason));
            }
        };

        let start = std::time::Instant::now();
        let data = self
            .storage
            .get(&source.bucket, &source.key)
            .await
            .map_err(|e| PipelineError::Fetch {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: e,
            })?;

        let thumbnail =
            ThumbnailTransformer::resize(&data, resolved.media_type, self.config.thumbnail_size)?;

        let artifact = DerivedArtifact::from_buffer(
            self.config.destination_bucket.as_str(),
            thumbnail_key(&self.config.thumbnail_prefix, &source.key),
            resolved.media_type.mime_type(),
            thumbnail,
        );
        let published = publish(self.storage.as_ref(), &artifact).await?;

        tracing::info!(
            source_size_bytes = data.len(),
            size_bytes = published.content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Successfully resized {} and uploaded to {}/{}",
            source,
            published.bucket,
            published.key
        );

        Ok(PipelineOutcome::Published {
            artifacts: vec![published],
        })
    }
}
