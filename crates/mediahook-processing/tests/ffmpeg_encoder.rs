//! Runs `FFmpegEncoder` against shell scripts standing in for ffmpeg.
#![cfg(unix)]

use mediahook_core::{Resolution, SegmentConfig, SourceReference};
use mediahook_processing::{EncodeJob, Encoder, FFmpegEncoder, PipelineError, SegmentPipeline};
use mediahook_storage::MockStorage;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// A script still open for writing in one test can be inherited by a child
// forked in another, which makes exec fail with ETXTBSY.
static SPAWN_LOCK: Mutex<()> = Mutex::const_new(());

const HD: Resolution = Resolution::new(1080, 720);
const TIMEOUT: Duration = Duration::from_secs(30);

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Records its arguments, then writes one segment and the playlist.
const SEGMENTING_SCRIPT: &str = r#"
printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
eval manifest=\${$#}
segment=$(printf '%s' "${10}" | sed 's/%03d/000/')
printf 'segment' > "$segment"
printf '#EXTM3U\n#EXT-X-ENDLIST\n' > "$manifest"
"#;

fn job(dir: &Path) -> EncodeJob {
    EncodeJob {
        input: dir.join("clip.mp4"),
        output_dir: dir.to_path_buf(),
        base_name: "clip".to_string(),
    }
}

#[tokio::test]
async fn test_passes_hls_arguments() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let _guard = SPAWN_LOCK.lock().await;
    let script = write_script(bin.path(), SEGMENTING_SCRIPT);

    let encoder = FFmpegEncoder::new(&script, Resolution::new(640, 360), 6, TIMEOUT);
    encoder.segment(&job(work.path())).await.unwrap();

    let args = std::fs::read_to_string(bin.path().join("args.txt")).unwrap();
    let args: Vec<&str> = args.lines().collect();
    let input = work.path().join("clip.mp4");
    let pattern = work.path().join("clip_%03d.ts");
    let manifest = work.path().join("clip.m3u8");
    assert_eq!(
        args,
        vec![
            "-i",
            input.to_str().unwrap(),
            "-s",
            "640x360",
            "-hls_time",
            "6",
            "-hls_list_size",
            "0",
            "-hls_segment_filename",
            pattern.to_str().unwrap(),
            "-f",
            "hls",
            manifest.to_str().unwrap(),
        ]
    );
    assert!(work.path().join("clip_000.ts").exists());
    assert!(manifest.exists());
}

#[tokio::test]
async fn test_nonzero_exit_is_encoder_failure() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let _guard = SPAWN_LOCK.lock().await;
    let script = write_script(bin.path(), "echo 'moov atom not found' >&2\nexit 3");

    let encoder = FFmpegEncoder::new(&script, HD, 10, TIMEOUT);
    let result = encoder.segment(&job(work.path())).await;

    match result {
        Err(PipelineError::EncoderFailure { status, stderr }) => {
            assert!(status.contains('3'), "status was {}", status);
            assert_eq!(stderr, "moov atom not found");
        }
        other => panic!("expected encoder failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_kills_encoder() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let _guard = SPAWN_LOCK.lock().await;
    let script = write_script(bin.path(), "exec sleep 30");

    let encoder = FFmpegEncoder::new(&script, HD, 10, Duration::from_millis(200));
    let start = Instant::now();
    let result = encoder.segment(&job(work.path())).await;

    assert!(matches!(result, Err(PipelineError::Timeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_missing_binary_is_reported() {
    let work = tempfile::tempdir().unwrap();
    let _guard = SPAWN_LOCK.lock().await;
    let encoder = FFmpegEncoder::new(
        work.path().join("no-such-ffmpeg"),
        Resolution::new(1080, 720),
        10,
        Duration::from_secs(5),
    );

    let result = encoder.segment(&job(work.path())).await;
    assert!(matches!(result, Err(PipelineError::EncoderUnavailable { .. })));
}

#[tokio::test]
async fn test_pipeline_with_script_encoder() {
    let bin = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let _guard = SPAWN_LOCK.lock().await;
    let script = write_script(bin.path(), SEGMENTING_SCRIPT);

    let config = SegmentConfig {
        destination_bucket: "media-out".to_string(),
        destination_folder: "streams/".to_string(),
        scratch_dir: scratch.path().to_path_buf(),
        encoder_path: script,
        target_resolution: Resolution::new(1080, 720),
        segment_duration_seconds: 10,
        encoder_timeout: Duration::from_secs(30),
        video_allowed_extensions: Vec::new(),
    };
    let storage = MockStorage::new();
    storage.set_object("media-in", "raw/clip.final.mkv", vec![9u8; 3000]);

    let pipeline = SegmentPipeline::new(
        Arc::new(storage.clone()),
        Arc::new(FFmpegEncoder::from_config(&config)),
        config,
    );
    let outcome = pipeline
        .run(&SourceReference::new("media-in", "raw/clip.final.mkv"), "req-e2e")
        .await
        .unwrap();

    let keys: Vec<&str> = outcome.artifacts().iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["streams/clip_000.ts", "streams/clip.m3u8"]);
    assert_eq!(
        storage.object("media-out", "streams/clip_000.ts").unwrap(),
        "segment"
    );
}
