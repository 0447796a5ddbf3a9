//! Mediahook Storage Library
//!
//! This crate provides the object store collaborator used by both handlers:
//! the Storage trait and implementations for S3 and the local filesystem.
//!
//! # Addressing
//!
//! Every operation is addressed by `(bucket, key)`. Keys are used verbatim on
//! S3. The local backend maps them to `{base_path}/{bucket}/{key}` and rejects
//! keys containing `..` or a leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediahook_core::StorageBackend;
#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{read_payload, ByteStream, Storage, StorageError, StorageResult};
