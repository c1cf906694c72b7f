//! QR code generation for short URLs.
//!
//! Codes are rendered as grayscale PNGs and embedded in JSON responses as
//! base64 data URIs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use thiserror::Error;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// QR code rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Minimum width and height of the PNG in pixels.
    pub size: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self { size: 256 }
    }
}

/// Renders `data` as a QR code PNG.
pub fn generate_png(data: &str, options: &QrOptions) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(options.size, options.size)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;

    Ok(buffer.into_inner())
}

/// Renders `data` as a QR code PNG wrapped in a `data:image/png;base64,` URI.
pub fn png_data_uri(data: &str, options: &QrOptions) -> Result<String, QrError> {
    let png = generate_png(data, options)?;
    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png)))
}
