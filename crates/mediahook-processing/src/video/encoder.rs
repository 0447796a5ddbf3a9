use async_trait::async_trait;
use mediahook_core::{Resolution, SegmentConfig};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::PipelineError;

/// Bytes of encoder stderr kept in [`PipelineError::EncoderFailure`].
const STDERR_TAIL_BYTES: usize = 4096;

/// One segmentation run.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Staged source file
    pub input: PathBuf,
    /// Directory receiving the manifest and segments
    pub output_dir: PathBuf,
    /// Base name shared by the manifest and every segment
    pub base_name: String,
}

/// Turns a staged video into an HLS manifest plus media segments.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn segment(&self, job: &EncodeJob) -> Result<(), PipelineError>;
}

/// Argument vector for an HLS VOD encode.
///
/// Writes `{output_dir}/{base}.m3u8` and `{output_dir}/{base}_NNN.ts`, keeping
/// every segment in the playlist.
pub fn hls_args(
    job: &EncodeJob,
    resolution: Resolution,
    segment_duration_seconds: u64,
) -> Vec<String> {
    let segment_pattern = job.output_dir.join(format!("{}_%03d.ts", job.base_name));
    let manifest = job.output_dir.join(format!("{}.m3u8", job.base_name));

    vec![
        "-i".to_string(),
        job.input.to_string_lossy().into_owned(),
        "-s".to_string(),
        resolution.to_string(),
        "-hls_time".to_string(),
        segment_duration_seconds.to_string(),
        "-hls_list_size".to_string(),
        "0".to_string(),
        "-hls_segment_filename".to_string(),
        segment_pattern.to_string_lossy().into_owned(),
        "-f".to_string(),
        "hls".to_string(),
        manifest.to_string_lossy().into_owned(),
    ]
}

/// Runs an external `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FFmpegEncoder {
    ffmpeg_path: PathBuf,
    resolution: Resolution,
    segment_duration_seconds: u64,
    timeout: Duration,
}

impl FFmpegEncoder {
    pub fn new(
        ffmpeg_path: impl Into<PathBuf>,
        resolution: Resolution,
        segment_duration_seconds: u64,
        timeout: Duration,
    ) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            resolution,
            segment_duration_seconds,
            timeout,
        }
    }

    pub fn from_config(config: &SegmentConfig) -> Self {
        Self::new(
            &config.encoder_path,
            config.target_resolution,
            config.segment_duration_seconds,
            config.encoder_timeout,
        )
    }
}

#[async_trait]
impl Encoder for FFmpegEncoder {
    async fn segment(&self, job: &EncodeJob) -> Result<(), PipelineError> {
        let args = hls_args(job, self.resolution, self.segment_duration_seconds);
        tracing::debug!(ffmpeg = %self.ffmpeg_path.display(), args = ?args, "Spawning encoder");

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PipelineError::EncoderUnavailable {
                path: self.ffmpeg_path.display().to_string(),
                source: e,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    input = %job.input.display(),
                    "Encoder timed out, killing process"
                );
                return Err(PipelineError::Timeout {
                    after: self.timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            tracing::error!(status = %output.status, stderr = %stderr, "Encoder failed");
            return Err(PipelineError::EncoderFailure {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim_end();
    if text.len() <= STDERR_TAIL_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hls_args() {
        let job = EncodeJob {
            input: PathBuf::from("/tmp/req-1/clip.mp4"),
            output_dir: PathBuf::from("/tmp/req-1"),
            base_name: "clip".to_string(),
        };

        let args = hls_args(&job, Resolution::new(1080, 720), 10);

        assert_eq!(
            args,
            vec![
                "-i",
                "/tmp/req-1/clip.mp4",
                "-s",
                "1080x720",
                "-hls_time",
                "10",
                "-hls_list_size",
                "0",
                "-hls_segment_filename",
                "/tmp/req-1/clip_%03d.ts",
                "-f",
                "hls",
                "/tmp/req-1/clip.m3u8",
            ]
        );
    }

    #[test]
    fn test_stderr_tail_keeps_end() {
        let long = format!("{}last line\n", "x".repeat(STDERR_TAIL_BYTES * 2));
        let tail = stderr_tail(long.as_bytes());
        assert_eq!(tail.len(), STDERR_TAIL_BYTES);
        assert!(tail.ends_with("last line"));
        assert_eq!(stderr_tail(b"short\n"), "short");
    }
}
