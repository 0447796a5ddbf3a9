use bytes::Bytes;
use serde::Serialize;
use std::path::PathBuf;

use crate::naming;

/// Where the bytes of an artifact come from.
#[derive(Debug, Clone)]
pub enum ArtifactPayload {
    /// Encoded output held in memory (thumbnails).
    Buffer(Bytes),
    /// A file in the scratch directory (HLS manifest and segments).
    File(PathBuf),
}

/// An object about to be published to the destination store.
#[derive(Debug, Clone)]
pub struct DerivedArtifact {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub payload: ArtifactPayload,
    pub content_length: u64,
}

impl DerivedArtifact {
    pub fn from_buffer(
        bucket: impl Into<String>,
        key: impl Into<String>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Self {
        let content_length = data.len() as u64;
        Self {
            bucket: bucket.into(),
            key: key.into(),
            content_type: content_type.map(String::from),
            payload: ArtifactPayload::Buffer(data),
            content_length,
        }
    }

    pub fn from_file(
        bucket: impl Into<String>,
        key: impl Into<String>,
        path: impl Into<PathBuf>,
        content_length: u64,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            content_type: None,
            payload: ArtifactPayload::File(path.into()),
            content_length,
        }
    }
}

/// A file the encoder left in the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFile {
    pub name: String,
    pub base_name: String,
    pub extension: String,
    pub path: PathBuf,
    pub len: u64,
}

impl ScratchFile {
    /// Split `name` into base name and extension with the key naming rules.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, len: u64) -> Self {
        let name = name.into();
        Self {
            base_name: naming::base_name(&name).to_string(),
            extension: naming::extension(&name).to_string(),
            name,
            path: path.into(),
            len,
        }
    }

    /// Whether this file is the manifest or a media segment of `video_base_name`.
    pub fn is_output_of(&self, video_base_name: &str) -> bool {
        naming::is_segment_candidate(&self.base_name, &self.extension, video_base_name)
    }
}

/// Record of an object that was written to the destination store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub content_length: u64,
}

impl From<&DerivedArtifact> for PublishedArtifact {
    fn from(artifact: &DerivedArtifact) -> Self {
        Self {
            bucket: artifact.bucket.clone(),
            key: artifact.key.clone(),
            content_type: artifact.content_type.clone(),
            content_length: artifact.content_length,
        }
    }
}

/// Why an invocation finished without publishing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The key has no `.` to take an extension from.
    NoExtension { key: String },
    /// The extension is not in the allow-list for this handler.
    UnrecognizedType { key: String, extension: String },
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Published { artifacts: Vec<PublishedArtifact> },
    Skipped(SkipReason),
}

impl PipelineOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, PipelineOutcome::Skipped(_))
    }

    pub fn artifacts(&self) -> &[PublishedArtifact] {
        match self {
            PipelineOutcome::Published { artifacts } => artifacts,
            PipelineOutcome::Skipped(_) => &[],
        }
    }

    /// Response body returned to the function runtime: `"ok"` or empty.
    pub fn response_body(&self) -> &'static str {
        match self {
            PipelineOutcome::Published { .. } => "ok",
            PipelineOutcome::Skipped(_) => "",
        }
    }
}
