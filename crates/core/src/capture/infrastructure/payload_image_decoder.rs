//! Image decoders for request payloads.
//!
//! Both decoders share one validation routine: size limit, JPEG/PNG only,
//! dimension bounds read from the header, then a full decode and conversion
//! to 3-channel BGR for the scorer.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{ImageFormat, ImageReader};

use crate::capture::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::shared::constants::{MAX_IMAGE_BYTES, MAX_IMAGE_DIMENSION, MIN_IMAGE_DIMENSION};
use crate::shared::face_image::{ChannelOrder, FaceImage};

/// Decodes payloads that are already raw JPEG/PNG bytes (e.g. file contents).
#[derive(Clone, Copy, Debug, Default)]
pub struct RawImageDecoder;

impl ImageDecoder for RawImageDecoder {
    fn decode(&self, payload: &[u8]) -> Result<FaceImage, DecodeError> {
        decode_image_bytes(payload)
    }
}

/// Decodes base64 text as sent by browser capture widgets, tolerating a
/// `data:` URI prefix, HTML-escaped characters, line breaks and missing
/// padding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64ImageDecoder;

impl ImageDecoder for Base64ImageDecoder {
    fn decode(&self, payload: &[u8]) -> Result<FaceImage, DecodeError> {
        let text = String::from_utf8_lossy(payload);
        let bytes = general_purpose::STANDARD.decode(normalize_base64(&text))?;
        decode_image_bytes(&bytes)
    }
}

fn normalize_base64(payload: &str) -> String {
    let body = payload.split_once(',').map_or(payload, |(_, rest)| rest);
    let unescaped = body
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
        .replace("&#x2B;", "+")
        .replace("&#43;", "+")
        .replace("&#x3D;", "=")
        .replace("&#61;", "=");

    let mut cleaned: String = unescaped.chars().filter(|c| !c.is_whitespace()).collect();
    let missing = cleaned.len() % 4;
    if missing != 0 {
        cleaned.extend(std::iter::repeat('=').take(4 - missing));
    }
    cleaned
}

pub fn decode_image_bytes(bytes: &[u8]) -> Result<FaceImage, DecodeError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(DecodeError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(DecodeError::UnsupportedFormat);
    }

    // Header only; pixel data is not touched until the bounds pass.
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(DecodeError::Unreadable)?;
    let bounds = MIN_IMAGE_DIMENSION..=MAX_IMAGE_DIMENSION;
    if !bounds.contains(&width) || !bounds.contains(&height) {
        return Err(DecodeError::DimensionsOutOfRange {
            width,
            height,
            min: MIN_IMAGE_DIMENSION,
            max: MAX_IMAGE_DIMENSION,
        });
    }

    let decoded = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(DecodeError::Unreadable)?;
    let rgb = decoded.to_rgb8().into_raw();
    Ok(FaceImage::new(rgb, width, height, ChannelOrder::Rgb).into_order(ChannelOrder::Bgr))
}
