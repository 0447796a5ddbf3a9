use mediahook_processing::{ImagePipeline, PipelineError, SegmentPipeline};
use tracing::Instrument;
use uuid::Uuid;

use crate::event::S3Notification;

/// Thumbnail invocation. Returns `"ok"` when a thumbnail was written and an
/// empty body when the key was skipped.
pub async fn handle_image(
    pipeline: &ImagePipeline,
    notification: S3Notification,
    request_id: &str,
) -> Result<String, PipelineError> {
    let span = tracing::info_span!("image_resizer", request_id = %request_id);
    async {
        let source = notification.first_source()?;
        let outcome = pipeline.run(&source).await?;
        Ok::<_, PipelineError>(outcome.response_body().to_string())
    }
    .instrument(span)
    .await
    .inspect_err(log_failure)
}

/// HLS invocation. Scratch files live under a directory named after the
/// request id.
pub async fn handle_video(
    pipeline: &SegmentPipeline,
    notification: S3Notification,
    request_id: &str,
) -> Result<String, PipelineError> {
    let invocation_id = if request_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        request_id.to_string()
    };

    let span = tracing::info_span!("segments_creator", request_id = %invocation_id);
    async {
        let source = notification.first_source()?;
        let outcome = pipeline.run(&source, &invocation_id).await?;
        Ok::<_, PipelineError>(outcome.response_body().to_string())
    }
    .instrument(span)
    .await
    .inspect_err(log_failure)
}

fn log_failure(error: &PipelineError) {
    tracing::error!(error = %error, code = error.error_code(), "Invocation failed");
}
