//! Mediahook Processing Library
//!
//! The two handler pipelines and their collaborators:
//! - Thumbnail pipeline: fetch → decode → fit to bounds → re-encode → publish
//! - HLS segment pipeline: fetch → stage in scratch → ffmpeg → enumerate → publish

pub mod error;
pub mod publish;
pub mod scratch;

#[cfg(feature = "image")]
pub mod image;
#[cfg(feature = "video")]
pub mod video;

// Re-export commonly used types
pub use error::PipelineError;
pub use publish::publish;
pub use scratch::ScratchArena;

#[cfg(feature = "image")]
pub use self::image::{ImagePipeline, ThumbnailTransformer};
#[cfg(feature = "video")]
pub use self::video::{collect_segments, EncodeJob, Encoder, FFmpegEncoder, SegmentPipeline};
