use bytes::Bytes;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use mediahook_core::{MediaType, Resolution};
use std::io::Cursor;

use super::resize::ThumbnailResize;
use crate::error::PipelineError;

/// Decodes, scales and re-encodes a single image.
pub struct ThumbnailTransformer;

impl ThumbnailTransformer {
    /// Output format for a resolved media type. `jpg` and `jpeg` share one encoder.
    pub fn output_format(media_type: MediaType) -> Option<ImageFormat> {
        match media_type {
            MediaType::Jpg | MediaType::Jpeg => Some(ImageFormat::Jpeg),
            MediaType::Png => Some(ImageFormat::Png),
            MediaType::Video => None,
        }
    }

    /// Scale `data` to fit within `bounds` and encode it as `media_type`.
    ///
    /// The decoder sniffs the actual content; the encoder follows the key's
    /// extension.
    pub fn resize(
        data: &[u8],
        media_type: MediaType,
        bounds: Resolution,
    ) -> Result<Bytes, PipelineError> {
        let format = Self::output_format(media_type).ok_or_else(|| {
            PipelineError::Encode(format!("{:?} is not an image type", media_type))
        })?;

        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| PipelineError::Decode(e.to_string()))?;

        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = ThumbnailResize::fit_within(orig_width, orig_height, bounds);
        let filter = ThumbnailResize::select_filter(orig_width, orig_height, width, height);

        tracing::debug!(
            orig_width = orig_width,
            orig_height = orig_height,
            width = width,
            height = height,
            filter = ?filter,
            "Resizing image"
        );

        let mut resized = img.resize_exact(width, height, filter);

        // The JPEG encoder takes 8-bit gray or RGB only.
        if format == ImageFormat::Jpeg
            && !matches!(resized.color(), ColorType::L8 | ColorType::Rgb8)
        {
            resized = DynamicImage::ImageRgb8(resized.to_rgb8());
        }

        let mut buffer = Vec::with_capacity((width * height * 3) as usize);
        resized
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }
}
