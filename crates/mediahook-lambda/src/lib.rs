//! Function entry points for the thumbnail and HLS segment handlers.
//!
//! Each binary in `src/bin` decodes an object-created notification and runs
//! one pipeline from `mediahook-processing` against it.

pub mod event;
pub mod handler;
pub mod state;

pub use event::S3Notification;
pub use handler::{handle_image, handle_video};
pub use state::HandlerState;
