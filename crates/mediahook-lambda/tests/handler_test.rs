use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mediahook_core::{
    Config, HandlerConfig, ImageConfig, LogFormat, Resolution, SegmentConfig, StorageBackend,
    StorageConfig,
};
use mediahook_lambda::{handle_image, handle_video, HandlerState, S3Notification};
use mediahook_processing::{EncodeJob, Encoder, PipelineError, SegmentPipeline};
use mediahook_storage::MockStorage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn config(scratch: &Path) -> Config {
    Config(Box::new(HandlerConfig {
        environment: "test".to_string(),
        log_format: LogFormat::Text,
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(scratch.to_path_buf()),
        },
        image: ImageConfig {
            destination_bucket: "media-out".to_string(),
            thumbnail_prefix: "resized-".to_string(),
            thumbnail_size: Resolution::new(223, 223),
        },
        segment: SegmentConfig {
            destination_bucket: "media-out".to_string(),
            destination_folder: "hls".to_string(),
            scratch_dir: scratch.to_path_buf(),
            encoder_path: PathBuf::from("/opt/bin/ffmpeg"),
            target_resolution: Resolution::new(1080, 720),
            segment_duration_seconds: 10,
            encoder_timeout: Duration::from_secs(60),
            video_allowed_extensions: vec!["mp4".to_string()],
        },
    }))
}

fn notification(bucket: &str, key: &str) -> S3Notification {
    serde_json::from_value(serde_json::json!({
        "Records": [{
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key, "size": 10 }
            }
        }]
    }))
    .unwrap()
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 90, 200])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}

struct OneSegmentEncoder;

#[async_trait]
impl Encoder for OneSegmentEncoder {
    async fn segment(&self, job: &EncodeJob) -> Result<(), PipelineError> {
        std::fs::write(job.output_dir.join(format!("{}_000.ts", job.base_name)), b"ts")?;
        std::fs::write(job.output_dir.join(format!("{}.m3u8", job.base_name)), b"#EXTM3U\n")?;
        Ok(())
    }
}

#[tokio::test]
async fn test_image_handler_decodes_key_and_returns_ok() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = MockStorage::new();
    storage.set_object("uploads", "holiday photo (1).jpg", jpeg(640, 480));
    let state = HandlerState::new(config(scratch.path()), Arc::new(storage.clone()));

    let body = handle_image(
        &state.image_pipeline(),
        notification("uploads", "holiday+photo+%281%29.jpg"),
        "req-1",
    )
    .await
    .unwrap();

    assert_eq!(body, "ok");
    assert!(storage
        .object("media-out", "resized-holiday photo (1).jpg")
        .is_some());
}

#[tokio::test]
async fn test_image_handler_skip_returns_empty_body() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = MockStorage::new();
    let state = HandlerState::new(config(scratch.path()), Arc::new(storage.clone()));

    let body = handle_image(&state.image_pipeline(), notification("uploads", "clip.mp4"), "req-2")
        .await
        .unwrap();

    assert_eq!(body, "");
    assert_eq!(storage.put_calls(), 0);
}

#[tokio::test]
async fn test_image_handler_rejects_empty_notification() {
    let scratch = tempfile::tempdir().unwrap();
    let state = HandlerState::new(config(scratch.path()), Arc::new(MockStorage::new()));
    let empty: S3Notification = serde_json::from_str(r#"{ "Records": [] }"#).unwrap();

    let result = handle_image(&state.image_pipeline(), empty, "req-3").await;
    assert!(matches!(result, Err(PipelineError::InvalidEvent(_))));
}

#[tokio::test]
async fn test_video_handler_publishes_hls() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = MockStorage::new();
    storage.set_object("uploads", "talks/intro v2.mp4", vec![0u8; 2048]);
    let state = HandlerState::new(config(scratch.path()), Arc::new(storage.clone()));
    let pipeline = SegmentPipeline::new(
        Arc::clone(&state.storage),
        Arc::new(OneSegmentEncoder),
        state.config.segment().clone(),
    );

    let body = handle_video(&pipeline, notification("uploads", "talks/intro+v2.mp4"), "")
        .await
        .unwrap();

    assert_eq!(body, "ok");
    let keys: Vec<String> = storage.published().into_iter().map(|a| a.key).collect();
    assert_eq!(keys, vec!["hls/intro v2_000.ts", "hls/intro v2.m3u8"]);
}

#[tokio::test]
async fn test_video_handler_skips_unlisted_extension() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = MockStorage::new();
    let state = HandlerState::new(config(scratch.path()), Arc::new(storage.clone()));

    let body = handle_video(
        &state.segment_pipeline(),
        notification("uploads", "slides.pdf"),
        "req-4",
    )
    .await
    .unwrap();

    assert_eq!(body, "");
    assert_eq!(storage.put_calls(), 0);
}
