//! Configuration module
//!
//! Environment-driven settings for the storage backend, the thumbnail handler
//! and the HLS segment handler.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DESTINATION_FOLDER, DEFAULT_ENCODER_TIMEOUT_SECS, DEFAULT_FFMPEG_PATH,
    DEFAULT_HLS_RESOLUTION, DEFAULT_HLS_SEGMENT_DURATION, DEFAULT_VIDEO_EXTENSIONS,
    THUMBNAIL_PREFIX, THUMBNAIL_SIZE,
};
use crate::models::Resolution;
use crate::storage_types::StorageBackend;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Object store connection settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<PathBuf>,
}

/// Thumbnail handler settings
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub destination_bucket: String,
    pub thumbnail_prefix: String,
    pub thumbnail_size: Resolution,
}

/// HLS segment handler settings
#[derive(Clone, Debug)]
pub struct SegmentConfig {
    pub destination_bucket: String,
    pub destination_folder: String,
    pub scratch_dir: PathBuf,
    pub encoder_path: PathBuf,
    pub target_resolution: Resolution,
    pub segment_duration_seconds: u64,
    pub encoder_timeout: Duration,
    /// Empty means every extension is handed to the encoder.
    pub video_allowed_extensions: Vec<String>,
}

/// Settings shared by both handler binaries
#[derive(Clone, Debug)]
pub struct HandlerConfig {
    pub environment: String,
    pub log_format: LogFormat,
    pub storage: StorageConfig,
    pub image: ImageConfig,
    pub segment: SegmentConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<HandlerConfig>);

impl Config {
    fn as_handler(&self) -> &HandlerConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = HandlerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_handler().validate()
    }

    pub fn environment(&self) -> &str {
        &self.as_handler().environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_handler().log_format
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.as_handler().storage
    }

    pub fn image(&self) -> &ImageConfig {
        &self.as_handler().image
    }

    pub fn segment(&self) -> &SegmentConfig {
        &self.as_handler().segment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_handler().storage.backend
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_handler().storage.s3_region.as_deref()
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl HandlerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = env::var("LOG_FORMAT")
            .map(|v| LogFormat::from_env_value(&v))
            .unwrap_or_default();

        let backend = match optional_env("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_region: optional_env("S3_REGION").or_else(|| optional_env("AWS_REGION")),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            local_storage_path: optional_env("LOCAL_STORAGE_PATH").map(PathBuf::from),
        };

        let destination_bucket = env::var("DESTINATION_BUCKET")
            .map_err(|_| anyhow::anyhow!("DESTINATION_BUCKET must be set"))?;

        let thumbnail_size = env::var("THUMBNAIL_SIZE")
            .unwrap_or_else(|_| format!("{}x{}", THUMBNAIL_SIZE, THUMBNAIL_SIZE))
            .parse::<Resolution>()
            .map_err(|e| anyhow::anyhow!("THUMBNAIL_SIZE: {}", e))?;

        let image = ImageConfig {
            destination_bucket: destination_bucket.clone(),
            thumbnail_prefix: env::var("THUMBNAIL_PREFIX")
                .unwrap_or_else(|_| THUMBNAIL_PREFIX.to_string()),
            thumbnail_size,
        };

        let target_resolution = env::var("HLS_RESOLUTION")
            .unwrap_or_else(|_| DEFAULT_HLS_RESOLUTION.to_string())
            .parse::<Resolution>()
            .map_err(|e| anyhow::anyhow!("HLS_RESOLUTION: {}", e))?;

        let segment = SegmentConfig {
            destination_bucket,
            destination_folder: env::var("DESTINATION_FOLDER")
                .unwrap_or_else(|_| DEFAULT_DESTINATION_FOLDER.to_string()),
            scratch_dir: optional_env("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            encoder_path: PathBuf::from(
                env::var("FFMPEG_PATH").unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            ),
            target_resolution,
            segment_duration_seconds: env::var("HLS_SEGMENT_DURATION")
                .unwrap_or_else(|_| DEFAULT_HLS_SEGMENT_DURATION.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HLS_SEGMENT_DURATION must be a valid number"))?,
            encoder_timeout: Duration::from_secs(
                env::var("ENCODER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_ENCODER_TIMEOUT_SECS.to_string())
                    .parse()
                    .map_err(|_| anyhow::anyhow!("ENCODER_TIMEOUT_SECS must be a valid number"))?,
            ),
            video_allowed_extensions: parse_list(
                &env::var("VIDEO_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_VIDEO_EXTENSIONS.to_string()),
            ),
        };

        Ok(HandlerConfig {
            environment,
            log_format,
            storage,
            image,
            segment,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.image.destination_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("DESTINATION_BUCKET must not be empty"));
        }

        if self.image.thumbnail_size.is_empty() {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_SIZE must have a non-zero width and height"
            ));
        }

        if self.segment.target_resolution.is_empty() {
            return Err(anyhow::anyhow!(
                "HLS_RESOLUTION must have a non-zero width and height"
            ));
        }

        if self.segment.segment_duration_seconds == 0 {
            return Err(anyhow::anyhow!("HLS_SEGMENT_DURATION must be greater than 0"));
        }

        if self.segment.encoder_timeout.is_zero() {
            return Err(anyhow::anyhow!("ENCODER_TIMEOUT_SECS must be greater than 0"));
        }

        if self.storage.backend == StorageBackend::Local
            && self.storage.local_storage_path.is_none()
        {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HandlerConfig {
        HandlerConfig {
            environment: "test".to_string(),
            log_format: LogFormat::Text,
            storage: StorageConfig {
                backend: StorageBackend::S3,
                s3_region: Some("ap-northeast-2".to_string()),
                s3_endpoint: None,
                local_storage_path: None,
            },
            image: ImageConfig {
                destination_bucket: "thumbs".to_string(),
                thumbnail_prefix: THUMBNAIL_PREFIX.to_string(),
                thumbnail_size: Resolution::new(THUMBNAIL_SIZE, THUMBNAIL_SIZE),
            },
            segment: SegmentConfig {
                destination_bucket: "thumbs".to_string(),
                destination_folder: "hls".to_string(),
                scratch_dir: env::temp_dir(),
                encoder_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
                target_resolution: Resolution::new(1080, 720),
                segment_duration_seconds: 10,
                encoder_timeout: Duration::from_secs(600),
                video_allowed_extensions: parse_list(DEFAULT_VIDEO_EXTENSIONS),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_bucket() {
        let mut config = sample();
        config.image.destination_bucket = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_segment_duration_and_timeout() {
        let mut config = sample();
        config.segment.segment_duration_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.segment.encoder_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut config = sample();
        config.storage.backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.storage.local_storage_path = Some(env::temp_dir());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(parse_list("mp4, mov,,"), vec!["mp4", "mov"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value("text"), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value("other"), LogFormat::Text);
    }
}
