pub mod encoder;
pub mod pipeline;
pub mod segments;

pub use encoder::{hls_args, EncodeJob, Encoder, FFmpegEncoder};
pub use pipeline::SegmentPipeline;
pub use segments::{collect_segments, select_segments};
