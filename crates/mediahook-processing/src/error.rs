use mediahook_storage::StorageError;
use std::time::Duration;

/// Failures that abort an invocation.
///
/// Unrecognized source types are not errors; they surface as
/// [`PipelineOutcome::Skipped`](mediahook_core::PipelineOutcome::Skipped).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        source: StorageError,
    },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to publish {bucket}/{key}: {source}")]
    Publish {
        bucket: String,
        key: String,
        source: StorageError,
    },

    #[error("Failed to start encoder {path}: {source}")]
    EncoderUnavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("Encoder exited with {status}: {stderr}")]
    EncoderFailure { status: String, stderr: String },

    #[error("Encoder timed out after {}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("Scratch IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl PipelineError {
    /// Machine-readable error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "FETCH_ERROR",
            PipelineError::Decode(_) => "DECODE_ERROR",
            PipelineError::Encode(_) => "ENCODE_ERROR",
            PipelineError::Publish { .. } => "PUBLISH_ERROR",
            PipelineError::EncoderUnavailable { .. } => "ENCODER_UNAVAILABLE",
            PipelineError::EncoderFailure { .. } => "ENCODER_FAILURE",
            PipelineError::Timeout { .. } => "TIMEOUT_ERROR",
            PipelineError::Io(_) => "IO_ERROR",
            PipelineError::InvalidEvent(_) => "INVALID_EVENT",
        }
    }
}
