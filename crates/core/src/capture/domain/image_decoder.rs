use thiserror::Error;

use crate::shared::face_image::FaceImage;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("unsupported image format (supported: JPEG, PNG)")]
    UnsupportedFormat,
    #[error("image data could not be read: {0}")]
    Unreadable(#[source] image::ImageError),
    #[error("image is {width}x{height}; each side must be between {min} and {max} pixels")]
    DimensionsOutOfRange {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },
}

/// Domain interface for turning a request payload into pixels the scorer
/// accepts.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, payload: &[u8]) -> Result<FaceImage, DecodeError>;
}
