use mediahook_core::Config;
use mediahook_processing::{FFmpegEncoder, ImagePipeline, SegmentPipeline};
use mediahook_storage::{create_storage, Storage};
use std::sync::Arc;

/// Process-wide state built once per cold start.
#[derive(Clone)]
pub struct HandlerState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
}

impl HandlerState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }

    /// Load configuration, install tracing and connect the object store.
    pub async fn bootstrap() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        config.validate()?;
        mediahook_infra::init_telemetry(config.log_format())?;

        tracing::info!(
            environment = %config.environment(),
            storage_backend = %config.storage_backend(),
            region = config.s3_region().unwrap_or(""),
            "Configuration loaded"
        );

        let storage = create_storage(config.storage()).await?;
        Ok(Self::new(config, storage))
    }

    pub fn image_pipeline(&self) -> ImagePipeline {
        ImagePipeline::new(Arc::clone(&self.storage), self.config.image().clone())
    }

    pub fn segment_pipeline(&self) -> SegmentPipeline {
        let segment = self.config.segment();
        tracing::debug!(
            ffmpeg = %segment.encoder_path.display(),
            resolution = %segment.target_resolution,
            "Using ffmpeg encoder"
        );
        SegmentPipeline::new(
            Arc::clone(&self.storage),
            Arc::new(FFmpegEncoder::from_config(segment)),
            segment.clone(),
        )
    }
}
