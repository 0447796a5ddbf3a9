pub mod pipeline;
pub mod resize;
pub mod transformer;

pub use pipeline::ImagePipeline;
pub use resize::ThumbnailResize;
pub use transformer::ThumbnailTransformer;
