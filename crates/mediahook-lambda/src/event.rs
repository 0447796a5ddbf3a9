//! Object-created notification payload.
//!
//! Only the fields the handlers read are modelled; everything else in the
//! record is ignored on deserialization.

use mediahook_core::SourceReference;
use mediahook_processing::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// URL-encoded key, `+` standing for a space
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3EventRecord {
    pub fn source(&self) -> Result<SourceReference, PipelineError> {
        Ok(SourceReference::new(
            self.s3.bucket.name.clone(),
            decode_key(&self.s3.object.key)?,
        ))
    }
}

impl S3Notification {
    /// Source object of the first record.
    ///
    /// A notification normally carries exactly one record; extra records are
    /// logged and ignored.
    pub fn first_source(&self) -> Result<SourceReference, PipelineError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| PipelineError::InvalidEvent("notification has no records".to_string()))?;

        if self.records.len() > 1 {
            tracing::warn!(
                records = self.records.len(),
                "Notification carries multiple records, processing the first only"
            );
        }

        record.source()
    }
}

/// Decode a notification key: `+` becomes a space, then percent-escapes are resolved.
pub fn decode_key(raw: &str) -> Result<String, PipelineError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| {
            PipelineError::InvalidEvent(format!("key '{}' is not valid UTF-8: {}", raw, e))
        })
}
