use std::path::Path;

use crate::error::FaceAwareError;
use crate::face_detector::{FaceBounds, FaceDetector};

/// Speed/recall trade-off for the SeetaFace cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionAccuracy {
    /// Coarse pyramid and stride. Fast enough for per-assignment detection.
    #[default]
    Low,
    /// Fine pyramid and stride. Finds smaller faces at several times the cost.
    High,
}

/// Tuning knobs passed to the rustface detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// Smallest face side, in pixels, that the cascade looks for.
    pub min_face_size: u32,
    /// Minimum classifier score for a window to count as a face.
    pub score_thresh: f64,
    /// Downscale step between pyramid levels, in `(0, 1)`.
    pub pyramid_scale_factor: f32,
    /// Sliding window stride `(x, y)` in pixels.
    pub slide_window_step: (u32, u32),
}

impl DetectionSettings {
    /// Settings for the given accuracy preset.
    pub fn for_accuracy(accuracy: DetectionAccuracy) -> Self {
        match accuracy {
            DetectionAccuracy::Low => Self {
                min_face_size: 20,
                score_thresh: 2.0,
                pyramid_scale_factor: 0.8,
                slide_window_step: (4, 4),
            },
            DetectionAccuracy::High => Self {
                min_face_size: 12,
                score_thresh: 2.0,
                pyramid_scale_factor: 0.9,
                slide_window_step: (2, 2),
            },
        }
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self::for_accuracy(DetectionAccuracy::default())
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is supplied by the caller, e.g. `seeta_fd_frontal_v1.0.bin`
/// from the SeetaFace distribution.
pub struct RustfaceDetector {
    model: rustface::Model,
    settings: DetectionSettings,
}

impl RustfaceDetector {
    /// Load a SeetaFace model from its serialized bytes.
    pub fn from_model_bytes(data: &[u8]) -> Result<Self, FaceAwareError> {
        let model = rustface::read_model(std::io::Cursor::new(data))
            .map_err(|e| FaceAwareError::ModelLoad(e.to_string()))?;
        Ok(Self {
            model,
            settings: DetectionSettings::default(),
        })
    }

    /// Load a SeetaFace model from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FaceAwareError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| FaceAwareError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_model_bytes(&data)
    }

    /// Replace the detection settings.
    pub fn settings(mut self, settings: DetectionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use the settings of an accuracy preset.
    pub fn accuracy(self, accuracy: DetectionAccuracy) -> Self {
        self.settings(DetectionSettings::for_accuracy(accuracy))
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let settings = &self.settings;
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(settings.min_face_size);
        detector.set_score_thresh(settings.score_thresh);
        detector.set_pyramid_scale_factor(settings.pyramid_scale_factor);
        detector.set_slide_window_step(settings.slide_window_step.0, settings.slide_window_step.1);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
