//! Data model shared by the handlers.

pub mod artifact;
pub mod media;

pub use artifact::{
    ArtifactPayload, DerivedArtifact, PipelineOutcome, PublishedArtifact, ScratchFile, SkipReason,
};
pub use media::{MediaType, Resolution, ResolvedKey, SourceReference};
