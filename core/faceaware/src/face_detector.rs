use image::DynamicImage;

use crate::geometry::FaceBox;

/// Bounding box of a detected face, in the detector's own coordinate system.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the left edge (pixels).
    pub x: f64,
    /// Y coordinate of the edge nearest the origin (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Where a detector puts `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateOrigin {
    /// Raster convention: `y` grows downward.
    #[default]
    TopLeft,
    /// Vision-framework convention: `y` grows upward.
    BottomLeft,
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug in a platform vision framework, ONNX model,
/// dlib, or anything else, and pass it to
/// [`crate::FaceAwareView::detector`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;

    /// Coordinate system of the boxes returned by [`FaceDetector::detect`].
    fn origin(&self) -> CoordinateOrigin {
        CoordinateOrigin::TopLeft
    }
}

/// Run `detector` over `image` and normalize the results to top-left boxes.
pub fn detect_faces(detector: &dyn FaceDetector, image: &DynamicImage) -> Vec<FaceBox> {
    let gray = image::imageops::grayscale(image);
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let origin = detector.origin();
    let faces: Vec<FaceBox> = detector
        .detect(gray.as_raw(), width, height)
        .iter()
        .map(|bounds| FaceBox::from_bounds(bounds, origin, height as f64))
        .collect();

    if faces.is_empty() {
        log::debug!("no faces found in {width}x{height} image");
    } else {
        log::debug!("found {} face(s) in {width}x{height} image", faces.len());
    }
    faces
}
