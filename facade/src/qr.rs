//! # QR Code
//!
//! Renders offer and verification URIs as QR code images for the harness.

use std::io::Cursor;

use anyhow::{Context, Result};
use base64ct::{Base64, Encoding};
use qrcode::QrCode;

/// Encode `text` as a PNG QR code, returned as a `data:image/png;base64,...`
/// URL.
///
/// # Errors
///
/// Returns an error if `text` is too long for a QR code or the image cannot
/// be encoded.
pub fn data_url(text: &str) -> Result<String> {
    let qr_code = QrCode::new(text).context("failed to create QR code")?;

    // write image to buffer
    let img_buf = qr_code.render::<image::Luma<u8>>().build();
    let mut buffer: Vec<u8> = Vec::new();
    let mut writer = Cursor::new(&mut buffer);
    img_buf.write_to(&mut writer, image::ImageFormat::Png).context("failed to encode QR code")?;

    // base64 encode image
    Ok(format!("data:image/png;base64,{}", Base64::encode_string(buffer.as_slice())))
}
