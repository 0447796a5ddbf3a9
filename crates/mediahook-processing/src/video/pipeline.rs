use mediahook_core::naming::{resolve_video, segment_key};
use mediahook_core::{DerivedArtifact, PipelineOutcome, SegmentConfig, SourceReference};
use mediahook_storage::Storage;
use std::sync::Arc;

use super::encoder::{EncodeJob, Encoder};
use super::segments::collect_segments;
use crate::error::PipelineError;
use crate::publish::publish;
use crate::scratch::ScratchArena;

/// HLS handler body: one source video in, a manifest and its segments out.
#[derive(Clone)]
pub struct SegmentPipeline {
    storage: Arc<dyn Storage>,
    encoder: Arc<dyn Encoder>,
    config: SegmentConfig,
}

impl SegmentPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        encoder: Arc<dyn Encoder>,
        config: SegmentConfig,
    ) -> Self {
        Self {
            storage,
            encoder,
            config,
        }
    }

    /// Stage the source, segment it and publish every output.
    ///
    /// Publishing stops at the first failed upload; artifacts already written
    /// stay in the destination.
    #[tracing::instrument(skip(self), fields(bucket = %source.bucket, key = %source.key))]
    pub async fn run(
        &self,
        source: &SourceReference,
        invocation_id: &str,
    ) -> Result<PipelineOutcome, PipelineError> {
        let resolved = match resolve_video(&source.key, &self.config.video_allowed_extensions) {
            Ok(resolved) => resolved,
            Err(reason) => {
                tracing::warn!(reason = ?reason, "Skipping unsupported video");
                return Ok(PipelineOutcome::Skipped(reason));
            }
        };

        let arena = ScratchArena::allocate(&self.config.scratch_dir, invocation_id)?;

        let body = self
            .storage
            .get_stream(&source.bucket, &source.key)
            .await
            .map_err(|e| PipelineError::Fetch {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: e,
            })?;

        let input_name = format!("{}.{}", resolved.base_name, resolved.extension);
        let (input, input_len) = arena.persist(&input_name, source, body).await?;

        let job = EncodeJob {
            input,
            output_dir: arena.path().to_path_buf(),
            base_name: resolved.base_name.clone(),
        };

        let start = std::time::Instant::now();
        tracing::info!(size_bytes = input_len, "Video encoding start");
        self.encoder.segment(&job).await?;
        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video encoding completed"
        );

        let files = collect_segments(arena.path(), &resolved.base_name, &input_name).await?;
        if files.is_empty() {
            tracing::warn!(base_name = %resolved.base_name, "Encoder produced no HLS files");
        }

        let mut artifacts = Vec::with_capacity(files.len());
        for file in &files {
            tracing::info!(name = %file.name, size_bytes = file.len, "Found file: {}", file.name);
            let artifact = DerivedArtifact::from_file(
                self.config.destination_bucket.as_str(),
                segment_key(&self.config.destination_folder, &file.name),
                &file.path,
                file.len,
            );
            artifacts.push(publish(self.storage.as_ref(), &artifact).await?);
        }

        if let Err(e) = arena.release() {
            tracing::warn!(error = %e, "Failed to remove scratch directory");
        }

        tracing::info!(count = artifacts.len(), "Published HLS output for {}", source);
        Ok(PipelineOutcome::Published { artifacts })
    }
}
