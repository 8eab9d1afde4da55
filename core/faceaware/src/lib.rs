//! Face-aware aspect-fill for image display surfaces.
//!
//! Given a bitmap and a viewport, faces are detected with a pluggable
//! [`FaceDetector`] and the image is scaled and offset so the faces stay in
//! view. Results are either rendered into the backing layer of a
//! [`FaceAwareView`] or delivered as a cropped bitmap.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use faceaware::{decode_image, FaceAwareView, FaceBounds, FaceDetector, Size};
//!
//! struct MyDetector;
//! impl FaceDetector for MyDetector {
//!     fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Vec<FaceBounds> {
//!         vec![]
//!     }
//! }
//!
//! let image = decode_image(&std::fs::read("photo.jpg").unwrap()).unwrap();
//! let view = FaceAwareView::new(Size::new(320.0, 240.0)).detector(Arc::new(MyDetector));
//! view.set_image(Some(Arc::new(image)), true, None).wait().unwrap();
//! if let Some(layer) = view.layer() {
//!     println!("layer frame: {:?}", layer.frame());
//! }
//! ```
#![warn(missing_docs)]

mod crop;
mod decode;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod geometry;
/// Debug outline drawing.
pub mod overlay;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod view;

/// Aspect crop for the callback delivery path.
pub use crop::{aspect_crop, aspect_crop_region, CropRegion};
/// Decoding of encoded input images.
pub use decode::decode_image;
/// Error type returned by faceaware operations.
pub use error::FaceAwareError;
/// Face detection trait, raw detector output and its coordinate convention.
pub use face_detector::{detect_faces, CoordinateOrigin, FaceBounds, FaceDetector};
/// Face-aware placement geometry.
pub use geometry::{
    centered, compute, BoundingUnion, DisplayTransform, FaceBox, Size, VERTICAL_BIAS,
};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model.
pub use rustface_backend::{DetectionAccuracy, DetectionSettings, RustfaceDetector};
/// Display surface with a face-aware backing layer.
pub use view::{Completion, FaceAwareView, ImageLayer, LayerFrame, Task, LAYER_NAME};
