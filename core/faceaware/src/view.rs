use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use image::DynamicImage;

use crate::crop::aspect_crop;
use crate::face_detector::{detect_faces, FaceDetector};
use crate::geometry::{centered, compute, BoundingUnion, DisplayTransform, FaceBox, Size};
use crate::overlay::draw_face_outlines;

/// Name given to the backing layer that renders the face-aware placement.
pub const LAYER_NAME: &str = "AspectFillFaceAware";

/// Callback invoked after every image assignment has been applied.
pub type Completion = Arc<dyn Fn() + Send + Sync>;

/// Position and size of the backing layer relative to the view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerFrame {
    /// Horizontal position, zero or negative.
    pub x: f64,
    /// Vertical position, zero or negative.
    pub y: f64,
    /// Scaled image width.
    pub width: f64,
    /// Scaled image height.
    pub height: f64,
}

impl From<DisplayTransform> for LayerFrame {
    fn from(transform: DisplayTransform) -> Self {
        Self {
            x: transform.offset_x,
            y: transform.offset_y,
            width: transform.scaled_width,
            height: transform.scaled_height,
        }
    }
}

/// Sublayer holding the scaled, offset image while face-aware mode is on.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    name: &'static str,
    contents: Option<Arc<DynamicImage>>,
    frame: LayerFrame,
}

impl ImageLayer {
    fn new() -> Self {
        Self {
            name: LAYER_NAME,
            contents: None,
            frame: LayerFrame::default(),
        }
    }

    /// Always [`LAYER_NAME`].
    pub fn name(&self) -> &str {
        self.name
    }

    /// Image rendered into the layer, with the debug outline if enabled.
    pub fn contents(&self) -> Option<&Arc<DynamicImage>> {
        self.contents.as_ref()
    }

    /// Placement of the layer inside the view.
    pub fn frame(&self) -> LayerFrame {
        self.frame
    }
}

/// Handle to the work started by an image assignment.
///
/// Assignments that complete synchronously hold no thread.
#[derive(Debug)]
#[must_use = "dropping a Task detaches it; call `wait` to block until it finishes"]
pub struct Task(Option<JoinHandle<()>>);

impl Task {
    fn done() -> Self {
        Self(None)
    }

    /// Block until the assignment, including its callback, has run.
    pub fn wait(self) -> thread::Result<()> {
        match self.0 {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

struct ViewState {
    image: Option<Arc<DynamicImage>>,
    bounds: Size,
    debug_face_aware: bool,
    layer: Option<ImageLayer>,
    completion: Option<Completion>,
}

/// An image display surface with face-aware aspect-fill.
///
/// Cloning yields another handle to the same view. Each assignment runs
/// detection on its own thread; a later assignment does not cancel an
/// earlier one, and whichever finishes last wins.
#[derive(Clone)]
pub struct FaceAwareView {
    state: Arc<Mutex<ViewState>>,
    detector: Option<Arc<dyn FaceDetector>>,
}

impl FaceAwareView {
    /// Create an empty view with the given viewport size.
    pub fn new(bounds: Size) -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState {
                image: None,
                bounds,
                debug_face_aware: false,
                layer: None,
                completion: None,
            })),
            detector: None,
        }
    }

    /// Set the face detector. Without one every assignment falls back to
    /// plain display.
    pub fn detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Enable or disable the debug outline (default: false).
    pub fn debug_outline(self, enable: bool) -> Self {
        self.set_debug_face_aware(enable);
        self
    }

    /// Whether the debug outline is enabled.
    pub fn debug_face_aware(&self) -> bool {
        self.lock().debug_face_aware
    }

    /// Outline detected faces in red on subsequent assignments.
    pub fn set_debug_face_aware(&self, enable: bool) {
        self.lock().debug_face_aware = enable;
    }

    /// Whether face-aware mode is active, i.e. the backing layer exists.
    pub fn focus_on_faces(&self) -> bool {
        self.lock().layer.is_some()
    }

    /// Re-assign the current image with face-aware mode switched on or off.
    pub fn set_focus_on_faces(&self, enable: bool) -> Task {
        let (image, completion) = {
            let mut state = self.lock();
            (state.image.take(), state.completion.clone())
        };
        self.set_image(image, enable, completion)
    }

    /// The image currently displayed.
    pub fn image(&self) -> Option<Arc<DynamicImage>> {
        self.lock().image.clone()
    }

    /// The viewport size.
    pub fn bounds(&self) -> Size {
        self.lock().bounds
    }

    /// Resize the viewport. Takes effect on the next assignment.
    pub fn set_bounds(&self, bounds: Size) {
        self.lock().bounds = bounds;
    }

    /// Snapshot of the backing layer, if face-aware mode is active.
    pub fn layer(&self) -> Option<ImageLayer> {
        self.lock().layer.clone()
    }

    /// Assign `image`, framing its faces when `focus_on_faces` is set.
    ///
    /// `completion` replaces any previously stored callback and runs once the
    /// assignment has been applied. Focusing on a missing image is a no-op.
    pub fn set_image(
        &self,
        image: Option<Arc<DynamicImage>>,
        focus_on_faces: bool,
        completion: Option<Completion>,
    ) -> Task {
        self.lock().completion = completion;

        if !focus_on_faces {
            remove_image_layer(&self.state, image);
            return Task::done();
        }
        let Some(image) = image else {
            return Task::done();
        };
        let Some(detector) = self.detector.clone() else {
            log::debug!("no face detector configured, displaying image as is");
            remove_image_layer(&self.state, Some(image));
            return Task::done();
        };

        let state = Arc::clone(&self.state);
        Task(Some(thread::spawn(move || {
            let faces = detect_faces(detector.as_ref(), &image);
            let (bounds, debug) = {
                let state = lock(&state);
                (state.bounds, state.debug_face_aware)
            };
            let image_size = Size::of_pixels(image.width(), image.height());
            match compute(&faces, image_size, bounds) {
                Ok(transform) => apply_face_detection(&state, image, &faces, transform, debug),
                Err(err) => {
                    log::debug!("displaying image without face framing: {err}");
                    remove_image_layer(&state, Some(image));
                }
            }
        })))
    }

    /// Crop `image` to the viewport aspect around its faces and hand the
    /// result to `callback`. The face union is kept whole whenever it fits.
    ///
    /// Images without faces are cropped around their center. The callback
    /// receives `None` when there is no image or either size is zero.
    pub fn cropped_image<F>(&self, image: Option<Arc<DynamicImage>>, callback: F) -> Task
    where
        F: FnOnce(Option<DynamicImage>) + Send + 'static,
    {
        let Some(image) = image else {
            callback(None);
            return Task::done();
        };
        let detector = self.detector.clone();
        let state = Arc::clone(&self.state);

        Task(Some(thread::spawn(move || {
            let faces = detector
                .map(|detector| detect_faces(detector.as_ref(), &image))
                .unwrap_or_default();
            let bounds = lock(&state).bounds;
            let image_size = Size::of_pixels(image.width(), image.height());
            let union = BoundingUnion::from_faces(&faces).map(|union| union.rect());

            let cropped = compute(&faces, image_size, bounds)
                .or_else(|_| centered(image_size, bounds))
                .ok()
                .and_then(|transform| aspect_crop(&image, &transform, bounds, union.as_ref()));
            callback(cropped);
        })))
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_face_detection(
    state: &Mutex<ViewState>,
    image: Arc<DynamicImage>,
    faces: &[FaceBox],
    transform: DisplayTransform,
    debug: bool,
) {
    let contents = if debug {
        Arc::new(draw_face_outlines(&image, faces))
    } else {
        image
    };

    let completion = {
        let mut state = lock(state);
        state.image = Some(Arc::clone(&contents));
        let layer = state.layer.get_or_insert_with(ImageLayer::new);
        layer.contents = Some(contents);
        layer.frame = transform.into();
        log::trace!("{} frame set to {:?}", LAYER_NAME, layer.frame);
        state.completion.clone()
    };

    if let Some(completion) = completion {
        completion();
    }
}

fn remove_image_layer(state: &Mutex<ViewState>, image: Option<Arc<DynamicImage>>) {
    let completion = {
        let mut state = lock(state);
        if state.layer.take().is_some() {
            log::trace!("removed {} layer", LAYER_NAME);
        }
        state.image = image;
        state.completion.clone()
    };

    if let Some(completion) = completion {
        completion();
    }
}
