use image::{DynamicImage, ImageFormat};

use crate::error::FaceAwareError;

/// Decode encoded image bytes (PNG, JPEG or WebP) for display.
pub fn decode_image(input: &[u8]) -> Result<DynamicImage, FaceAwareError> {
    let format = detect_format(input)?;
    let decoded = image::load_from_memory_with_format(input, format)
        .map_err(|e| FaceAwareError::DecodeError(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(FaceAwareError::ZeroDimensions);
    }
    Ok(decoded)
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, FaceAwareError> {
    image::guess_format(input).map_err(|e| FaceAwareError::DecodeError(e.to_string()))
}
