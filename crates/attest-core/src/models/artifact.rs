use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// MIME type of every document this system produces.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered document: the bytes plus what delivery needs to describe them.
///
/// Produced exactly once per request; ownership passes from the renderer to
/// delivery, which is the sole writer of the stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub size: u64,
    pub content_type: String,
}

impl RenderedArtifact {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            bytes,
            size,
            content_type: PDF_CONTENT_TYPE.to_string(),
        }
    }
}

/// A time-limited read capability for exactly one stored object.
///
/// Never persisted by this system; only handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedDocumentLink {
    pub uri: String,
    pub expires_at: Timestamp,
}
