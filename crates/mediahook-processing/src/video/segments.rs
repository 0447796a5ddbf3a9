use mediahook_core::constants::MANIFEST_EXTENSION;
use mediahook_core::naming::segment_index;
use mediahook_core::ScratchFile;
use std::path::Path;

use crate::error::PipelineError;

/// Keep the encoder outputs for `video_base_name` and order them for upload.
///
/// Media segments go first by numeric suffix, the manifest last, so a reader
/// that sees the playlist can already fetch every segment it lists. `exclude`
/// names the staged input, which may itself look like a segment.
pub fn select_segments(
    files: Vec<ScratchFile>,
    video_base_name: &str,
    exclude: &str,
) -> Vec<ScratchFile> {
    let mut selected: Vec<ScratchFile> = files
        .into_iter()
        .filter(|file| file.name != exclude && file.is_output_of(video_base_name))
        .collect();

    selected.sort_by(|a, b| {
        let key = |file: &ScratchFile| {
            (
                file.extension == MANIFEST_EXTENSION,
                segment_index(&file.name).unwrap_or(u32::MAX),
            )
        };
        key(a).cmp(&key(b)).then_with(|| a.name.cmp(&b.name))
    });
    selected
}

/// List regular files directly inside `dir` and select the HLS outputs.
///
/// The listing is not recursive. Entries whose names are not valid UTF-8 are
/// ignored.
pub async fn collect_segments(
    dir: &Path,
    video_base_name: &str,
    exclude: &str,
) -> Result<Vec<ScratchFile>, PipelineError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        files.push(ScratchFile::new(name, entry.path(), metadata.len()));
    }

    Ok(select_segments(files, video_base_name, exclude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> ScratchFile {
        ScratchFile::new(name, PathBuf::from("/scratch").join(name), 1)
    }

    fn names(files: &[ScratchFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_filter_and_order() {
        let files = vec![
            file("vid.m3u8"),
            file("vid_010.ts"),
            file("vid.mp4"),
            file("other_001.ts"),
            file("vid_002.ts"),
            file("vid_001.ts"),
        ];

        let selected = select_segments(files, "vid", "vid.mp4");
        assert_eq!(
            names(&selected),
            vec!["vid_001.ts", "vid_002.ts", "vid_010.ts", "vid.m3u8"]
        );
    }

    #[test]
    fn test_prefix_match_admits_longer_names() {
        let files = vec![file("video_000.ts"), file("vid_000.ts")];
        let selected = select_segments(files, "vid", "vid.mp4");
        assert_eq!(names(&selected), vec!["vid_000.ts", "video_000.ts"]);
    }

    #[test]
    fn test_staged_input_is_excluded() {
        let files = vec![file("rec.ts"), file("rec_000.ts"), file("rec.m3u8")];
        let selected = select_segments(files, "rec", "rec.ts");
        assert_eq!(names(&selected), vec!["rec_000.ts", "rec.m3u8"]);
    }

    #[tokio::test]
    async fn test_collect_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"source").unwrap();
        std::fs::write(dir.path().join("clip_000.ts"), b"seg0").unwrap();
        std::fs::write(dir.path().join("clip.m3u8"), b"#EXTM3U\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/clip_001.ts"), b"seg1").unwrap();

        let selected = collect_segments(dir.path(), "clip", "clip.mp4").await.unwrap();
        assert_eq!(names(&selected), vec!["clip_000.ts", "clip.m3u8"]);
        assert_eq!(selected[0].len, 4);
        assert_eq!(selected[1].path, dir.path().join("clip.m3u8"));
    }
}
