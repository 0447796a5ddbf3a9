use image::imageops::FilterType;
use mediahook_core::Resolution;

/// Fit-within-bounds scaling for thumbnails
pub struct ThumbnailResize;

impl ThumbnailResize {
    /// Largest size with the source aspect ratio that fits inside `bounds`.
    ///
    /// Sources smaller than the bounds are scaled up, so one side always
    /// touches the bound. Neither side drops below 1px.
    pub fn fit_within(orig_width: u32, orig_height: u32, bounds: Resolution) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width, orig_height);
        }

        let scale = f64::min(
            bounds.width as f64 / orig_width as f64,
            bounds.height as f64 / orig_height as f64,
        );

        let width = ((orig_width as f64 * scale).round() as u32).clamp(1, bounds.width.max(1));
        let height = ((orig_height as f64 * scale).round() as u32).clamp(1, bounds.height.max(1));
        (width, height)
    }

    /// Select optimal filter based on scale factor
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let scale_x = orig_width as f32 / new_width.max(1) as f32;
        let scale_y = orig_height as f32 / new_height.max(1) as f32;
        let max_scale = scale_x.max(scale_y);

        if max_scale > 2.0 {
            FilterType::Triangle // Fast for large downscaling
        } else if max_scale > 1.5 {
            FilterType::CatmullRom // Good balance
        } else {
            FilterType::Lanczos3 // Best quality for small changes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Resolution = Resolution::new(223, 223);

    #[test]
    fn test_fit_landscape() {
        assert_eq!(ThumbnailResize::fit_within(4000, 3000, BOUNDS), (223, 167));
    }

    #[test]
    fn test_fit_portrait() {
        assert_eq!(ThumbnailResize::fit_within(1080, 1920, BOUNDS), (125, 223));
    }

    #[test]
    fn test_fit_square_and_upscale() {
        assert_eq!(ThumbnailResize::fit_within(500, 500, BOUNDS), (223, 223));
        assert_eq!(ThumbnailResize::fit_within(100, 40, BOUNDS), (223, 89));
    }

    #[test]
    fn test_fit_extreme_aspect_keeps_one_pixel() {
        assert_eq!(ThumbnailResize::fit_within(10000, 10, BOUNDS), (223, 1));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(
            ThumbnailResize::select_filter(4000, 3000, 223, 167),
            FilterType::Triangle
        );
        assert_eq!(
            ThumbnailResize::select_filter(400, 400, 223, 223),
            FilterType::CatmullRom
        );
        assert_eq!(
            ThumbnailResize::select_filter(250, 250, 223, 223),
            FilterType::Lanczos3
        );
    }
}
