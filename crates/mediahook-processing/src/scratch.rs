//! Per-invocation scratch space for the segment pipeline.

use futures::StreamExt;
use mediahook_core::SourceReference;
use mediahook_storage::ByteStream;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use crate::error::PipelineError;

/// A private directory under the configured scratch root.
///
/// Every invocation gets its own directory, so warm reuse of the execution
/// environment never sees files from an earlier run. The directory is removed
/// on [`ScratchArena::release`] or when the arena is dropped.
#[derive(Debug)]
pub struct ScratchArena {
    dir: TempDir,
}

impl ScratchArena {
    /// Create a directory named `{invocation_id}-XXXXXX` inside `root`.
    pub fn allocate(root: &Path, invocation_id: &str) -> Result<Self, PipelineError> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", sanitize_prefix(invocation_id)))
            .tempdir_in(root)?;

        tracing::debug!(path = %dir.path().display(), "Allocated scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Stream an object body into `file_name`, replacing any previous file.
    ///
    /// Returns the path and the number of bytes written.
    pub async fn persist(
        &self,
        file_name: &str,
        source: &SourceReference,
        mut body: ByteStream,
    ) -> Result<(PathBuf, u64), PipelineError> {
        let path = self.dir.path().join(file_name);
        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| PipelineError::Fetch {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: e,
            })?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = written,
            "Persisted source object to scratch"
        );
        Ok((path, written))
    }

    /// Remove the directory and everything in it.
    pub fn release(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

fn sanitize_prefix(invocation_id: &str) -> String {
    let cleaned: String = invocation_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(64)
        .collect();
    if cleaned.is_empty() {
        "invocation".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;
    use mediahook_storage::StorageError;

    fn body(chunks: Vec<Result<Bytes, StorageError>>) -> ByteStream {
        Box::pin(stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_arenas_are_isolated_and_removed() {
        let root = tempfile::tempdir().unwrap();
        let first = ScratchArena::allocate(root.path(), "req-1").unwrap();
        let second = ScratchArena::allocate(root.path(), "req-1").unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("req-1-"));

        let path = first.path().to_path_buf();
        first.release().unwrap();
        assert!(!path.exists());
        assert!(second.path().exists());
    }

    #[tokio::test]
    async fn test_persist_streams_chunks() {
        let root = tempfile::tempdir().unwrap();
        let arena = ScratchArena::allocate(root.path(), "req").unwrap();
        let source = SourceReference::new("src", "clip.mp4");

        let (path, len) = arena
            .persist(
                "clip.mp4",
                &source,
                body(vec![Ok(Bytes::from_static(b"abc")), Ok(Bytes::from_static(b"def"))]),
            )
            .await
            .unwrap();

        assert_eq!(len, 6);
        assert_eq!(std::fs::read(path).unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn test_persist_surfaces_stream_error_as_fetch() {
        let root = tempfile::tempdir().unwrap();
        let arena = ScratchArena::allocate(root.path(), "req").unwrap();
        let source = SourceReference::new("src", "clip.mp4");

        let result = arena
            .persist(
                "clip.mp4",
                &source,
                body(vec![
                    Ok(Bytes::from_static(b"abc")),
                    Err(StorageError::DownloadFailed("reset".to_string())),
                ]),
            )
            .await;

        assert!(matches!(result, Err(PipelineError::Fetch { .. })));
    }

    #[test]
    fn test_sanitize_prefix() {
        assert_eq!(sanitize_prefix("8f3e-12ab"), "8f3e-12ab");
        assert_eq!(sanitize_prefix("../../x"), "x");
        assert_eq!(sanitize_prefix(""), "invocation");
    }
}
