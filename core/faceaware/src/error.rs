use thiserror::Error;

/// Error type returned by faceaware operations.
#[derive(Debug, Error)]
pub enum FaceAwareError {
    /// The input bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// The image or the viewport has a zero extent.
    #[error("image or viewport dimensions are zero")]
    ZeroDimensions,

    /// There is no face to frame; display the image as is.
    #[error("no faces to frame")]
    NoFaces,

    /// The detector model could not be read or parsed.
    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),
}
