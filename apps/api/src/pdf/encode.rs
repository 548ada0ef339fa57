use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::models::ImagePayload;
use crate::pdf::ConversionError;

/// Decodes a rendered PNG page and wraps it as a base64 JPEG payload.
pub fn png_to_payload(png: &[u8], quality: u8) -> Result<ImagePayload, ConversionError> {
    let page = image::load_from_memory_with_format(png, ImageFormat::Png)?;
    let jpeg = encode_jpeg(&page, quality)?;
    Ok(ImagePayload::jpeg(STANDARD.encode(jpeg)))
}

/// JPEG has no alpha channel; the page is flattened to RGB first.
pub fn encode_jpeg(page: &DynamicImage, quality: u8) -> Result<Vec<u8>, ConversionError> {
    let rgb = page.to_rgb8();
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}
