//! Fixed names and defaults shared by both handlers.

/// Prefix prepended to the source key to form the thumbnail key.
pub const THUMBNAIL_PREFIX: &str = "resized-";

/// Thumbnail bounding box (width and height).
pub const THUMBNAIL_SIZE: u32 = 223;

pub const MANIFEST_EXTENSION: &str = "m3u8";
pub const SEGMENT_EXTENSION: &str = "ts";

pub const JPEG_MIME: &str = "image/jpeg";
pub const PNG_MIME: &str = "image/png";

pub const DEFAULT_DESTINATION_FOLDER: &str = "hls";
pub const DEFAULT_FFMPEG_PATH: &str = "/opt/bin/ffmpeg";
pub const DEFAULT_HLS_RESOLUTION: &str = "1080x720";
pub const DEFAULT_HLS_SEGMENT_DURATION: u64 = 10;
pub const DEFAULT_ENCODER_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_VIDEO_EXTENSIONS: &str = "mp4,mov,m4v,mkv,webm,avi";
