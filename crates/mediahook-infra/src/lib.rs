//! Mediahook Infrastructure Library
//!
//! Shared process-level plumbing for the handler binaries:
//! - Telemetry initialization (tracing subscriber)

pub mod telemetry;

// Re-export commonly used types
pub use telemetry::init_telemetry;
