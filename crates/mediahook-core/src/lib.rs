//! Mediahook Core Library
//!
//! This crate provides the configuration, data model and key naming rules
//! shared by the thumbnail and HLS segment handlers.

pub mod config;
pub mod constants;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, HandlerConfig, ImageConfig, LogFormat, SegmentConfig, StorageConfig};
pub use models::{
    ArtifactPayload, DerivedArtifact, MediaType, PipelineOutcome, PublishedArtifact, Resolution,
    ResolvedKey, ScratchFile, SkipReason, SourceReference,
};
pub use storage_types::StorageBackend;
