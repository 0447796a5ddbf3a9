//! Key and type resolution.
//!
//! Maps a source object key to the identity of the artifacts derived from it.
//! Two splitting rules are in play and both are intentional:
//!
//! - the **extension** is everything after the *last* `.`
//! - the **base name** is everything before the *first* `.` of the file name
//!
//! so `my.video.mp4` has base name `my` and extension `mp4`. Scratch files
//! written by the encoder are classified with the same two functions, which
//! keeps the publish filter consistent with the names handed to the encoder.

use crate::constants::{MANIFEST_EXTENSION, SEGMENT_EXTENSION};
use crate::models::{MediaType, ResolvedKey, SkipReason};

/// Final `/`-delimited segment of an object key.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// First `.`-delimited segment of a file name.
pub fn base_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Substring after the last `.`; the whole name when there is no `.`.
pub fn extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Extension of a whole key for the image path, `None` when the key has no `.`.
pub fn image_extension(key: &str) -> Option<&str> {
    key.rfind('.').map(|idx| &key[idx + 1..])
}

/// Resolve an image key.
///
/// Only `jpg`, `jpeg` and `png` (exact case) are recognized; everything else is
/// reported as a skip, never as an error.
pub fn resolve_image(key: &str) -> Result<ResolvedKey, SkipReason> {
    let extension = image_extension(key).ok_or_else(|| SkipReason::NoExtension {
        key: key.to_string(),
    })?;

    let media_type =
        MediaType::from_image_extension(extension).ok_or_else(|| SkipReason::UnrecognizedType {
            key: key.to_string(),
            extension: extension.to_string(),
        })?;

    Ok(ResolvedKey {
        base_name: base_name(file_name(key)).to_string(),
        extension: extension.to_string(),
        media_type,
    })
}

/// Resolve a video key.
///
/// The allow-list match ignores ASCII case (`IMG_0001.MOV` passes `mov`). An
/// empty `allowed_extensions` list accepts any extension. Either way the
/// extension is handed to the encoder verbatim.
pub fn resolve_video(key: &str, allowed_extensions: &[String]) -> Result<ResolvedKey, SkipReason> {
    let name = file_name(key);
    let extension = extension(name);

    if !allowed_extensions.is_empty()
        && !allowed_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    {
        return Err(SkipReason::UnrecognizedType {
            key: key.to_string(),
            extension: extension.to_string(),
        });
    }

    Ok(ResolvedKey {
        base_name: base_name(name).to_string(),
        extension: extension.to_string(),
        media_type: MediaType::Video,
    })
}

/// Destination key of a thumbnail: plain prefix concatenation, path segments kept.
pub fn thumbnail_key(prefix: &str, source_key: &str) -> String {
    format!("{}{}", prefix, source_key)
}

/// Destination key of an HLS artifact inside the destination folder.
pub fn segment_key(folder: &str, file_name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", folder, file_name)
    }
}

/// Whether a file split into `(base_name, extension)` belongs to the HLS
/// output of `video_base_name`.
pub fn is_segment_candidate(base_name: &str, extension: &str, video_base_name: &str) -> bool {
    (extension == MANIFEST_EXTENSION || extension == SEGMENT_EXTENSION)
        && base_name.starts_with(video_base_name)
}

/// Numeric suffix of a media segment name such as `clip_007.ts`.
pub fn segment_index(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(SEGMENT_EXTENSION)?.strip_suffix('.')?;
    let (_, index) = stem.rsplit_once('_')?;
    index.parse().ok()
}
