use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// An uploaded resume, held only for the duration of one interaction.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// First page of a resume, rendered and ready to attach to a model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded) JPEG bytes.
    pub data: String,
}

impl ImagePayload {
    pub fn jpeg(data: String) -> Self {
        Self {
            mime_type: JPEG_MIME_TYPE.to_string(),
            data,
        }
    }
}
