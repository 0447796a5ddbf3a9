use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{JPEG_MIME, PNG_MIME};

/// The object that triggered an invocation.
///
/// `key` is already URL-decoded and may contain spaces or non-ASCII characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    pub bucket: String,
    pub key: String,
}

impl SourceReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Display for SourceReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Media type inferred from the trailing filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpg,
    Jpeg,
    Png,
    Video,
}

impl MediaType {
    /// Map an image extension to its media type. The match is case-sensitive.
    pub fn from_image_extension(extension: &str) -> Option<Self> {
        match extension {
            "jpg" => Some(MediaType::Jpg),
            "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            _ => None,
        }
    }

    /// Content type sent with the published object. Video artifacts carry none.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            MediaType::Jpg | MediaType::Jpeg => Some(JPEG_MIME),
            MediaType::Png => Some(PNG_MIME),
            MediaType::Video => None,
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, MediaType::Video)
    }
}

/// Identity derived from an object key: `(base_name, extension, media_type)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub base_name: String,
    pub extension: String,
    pub media_type: MediaType,
}

/// A `WxH` pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl FromStr for Resolution {
    type Err = anyhow::Error;

    /// Parse dimensions from string format: "WxH"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow::anyhow!("Invalid resolution format '{}'. Expected: WxH", s))?;

        let width = width
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width: {}", width))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height: {}", height))?;

        Ok(Resolution { width, height })
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}
