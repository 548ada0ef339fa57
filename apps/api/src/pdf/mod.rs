//! PDF-to-Image conversion: first page of an uploaded resume → JPEG payload.
//!
//! The pipeline is `render` (poppler's `pdftoppm`, page one only) followed by
//! `encode` (PNG → JPEG → base64). Encoding is CPU-bound and runs inside
//! `tokio::task::spawn_blocking`.
//!
//! `InteractionController` holds the converter as `Arc<dyn DocumentConverter>`
//! so tests can swap in a stub.

pub mod encode;
pub mod render;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::models::{ImagePayload, ResumeDocument};

const PDF_MAGIC: &[u8] = b"%PDF-";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("the uploaded file is not a PDF document")]
    NotPdf,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start rasterizer '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rasterizer exited with {status}: {stderr}")]
    Rasterizer { status: String, stderr: String },

    #[error("rasterizer produced no image for the first page")]
    MissingOutput,

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("encoding task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, document: &ResumeDocument) -> Result<ImagePayload, ConversionError>;
}

/// Converter backed by the `pdftoppm` binary from poppler.
#[derive(Debug, Clone)]
pub struct PdftoppmConverter {
    binary: PathBuf,
    dpi: u32,
    jpeg_quality: u8,
}

impl PdftoppmConverter {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32, jpeg_quality: u8) -> Self {
        Self {
            binary: binary.into(),
            dpi,
            jpeg_quality,
        }
    }
}

#[async_trait]
impl DocumentConverter for PdftoppmConverter {
    async fn convert(&self, document: &ResumeDocument) -> Result<ImagePayload, ConversionError> {
        check_pdf_header(&document.bytes)?;

        let png = render::render_first_page(&self.binary, self.dpi, &document.bytes).await?;
        debug!(
            "Rendered first page of '{}' ({} bytes PDF -> {} bytes PNG)",
            document.filename,
            document.len(),
            png.len()
        );

        let quality = self.jpeg_quality;
        let payload = tokio::task::spawn_blocking(move || encode::png_to_payload(&png, quality))
            .await
            .map_err(|e| ConversionError::Task(e.to_string()))??;

        debug!("Encoded image payload: {} base64 chars", payload.data.len());
        Ok(payload)
    }
}

/// Rejects input that cannot be a PDF before any process is spawned.
pub fn check_pdf_header(bytes: &[u8]) -> Result<(), ConversionError> {
    if bytes.is_empty() {
        return Err(ConversionError::Empty);
    }
    // Some generators emit a BOM or whitespace ahead of the header.
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    if body[start..].starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(ConversionError::NotPdf)
    }
}
