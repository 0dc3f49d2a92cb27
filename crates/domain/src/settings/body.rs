use serde::{Deserialize, Serialize};

use crate::value_objects::LargeFileTier;

/// Settings slice of the body mutator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMutationSettings {
    /// Delete one random array element or object key
    #[serde(default)]
    pub random_remove: bool,

    /// Force a random content type from the catalog
    #[serde(default)]
    pub random_content_type: bool,

    /// Charset label to put on the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_scheme: Option<String>,

    /// Replace the body with generated text of this many megabytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_payload_mb: Option<f64>,

    /// Generate an on-disk file of this tier and answer with a download link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_file_size_tier: Option<LargeFileTier>,

    /// Claim gzip content encoding for an uncompressed body
    #[serde(default)]
    pub fake_compression: bool,
}
