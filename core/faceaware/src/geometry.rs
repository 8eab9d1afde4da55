use crate::error::FaceAwareError;
use crate::face_detector::{CoordinateOrigin, FaceBounds};

/// Fraction of the viewport height kept *below* the face union when the
/// image has to be scrolled vertically. The union center lands at
/// `1.0 - VERTICAL_BIAS` of the viewport height from the top.
pub const VERTICAL_BIAS: f64 = 0.618;

/// Width and height in pixels (image) or points (viewport).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size from its two extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of an image in pixels.
    pub fn of_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// `true` when either extent is zero, negative or NaN.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// A detected face in image pixel space, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl FaceBox {
    /// Create a face box from top-left coordinates.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize raw detector output to top-left coordinates.
    ///
    /// Bottom-left boxes are flipped with `y' = image_height - y - height`.
    pub fn from_bounds(bounds: &FaceBounds, origin: CoordinateOrigin, image_height: f64) -> Self {
        let y = match origin {
            CoordinateOrigin::TopLeft => bounds.y,
            CoordinateOrigin::BottomLeft => image_height - bounds.y - bounds.height,
        };
        Self::new(bounds.x, y, bounds.width, bounds.height)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Smallest rectangle enclosing every face of a detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingUnion {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl BoundingUnion {
    /// Fold `faces` with a component-wise min/max. `None` when empty.
    pub fn from_faces(faces: &[FaceBox]) -> Option<Self> {
        let (first, rest) = faces.split_first()?;
        let seed = Self {
            left: first.x,
            top: first.y,
            right: first.right(),
            bottom: first.bottom(),
        };
        Some(rest.iter().fold(seed, |union, face| Self {
            left: union.left.min(face.x),
            top: union.top.min(face.y),
            right: union.right.max(face.right()),
            bottom: union.bottom.max(face.bottom()),
        }))
    }

    /// The union as a face-sized box.
    pub fn rect(&self) -> FaceBox {
        FaceBox::new(
            self.left,
            self.top,
            self.right - self.left,
            self.bottom - self.top,
        )
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Placement of a uniformly scaled copy of the source image behind a
/// fixed-size viewport.
///
/// Offsets are the translation applied to the image layer, so they are
/// zero or negative: the viewport sees image content starting at
/// `(-offset_x, -offset_y)` in scaled coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    /// Horizontal layer translation.
    pub offset_x: f64,
    /// Vertical layer translation.
    pub offset_y: f64,
    /// Width of the scaled image.
    pub scaled_width: f64,
    /// Height of the scaled image.
    pub scaled_height: f64,
}

impl DisplayTransform {
    /// Ratio between scaled and source pixels.
    pub fn scale(&self, image: Size) -> f64 {
        self.scaled_width / image.width
    }

    /// The part of the source image visible through `viewport`, as
    /// `(x, y, width, height)` in source pixels.
    pub fn visible_region(&self, image: Size, viewport: Size) -> FaceBox {
        let scale = self.scale(image);
        FaceBox::new(
            -self.offset_x / scale,
            -self.offset_y / scale,
            viewport.width / scale,
            viewport.height / scale,
        )
    }
}

/// Compute the aspect-fill placement that keeps `faces` inside `viewport`.
///
/// A relatively wider image is fitted to the viewport height and scrolled
/// horizontally to center the face union. Otherwise the image is fitted to
/// the viewport width and scrolled vertically so the union center sits at
/// `1.0 - VERTICAL_BIAS` of the viewport height. Both offsets are clamped so
/// the viewport never leaves the image.
pub fn compute(
    faces: &[FaceBox],
    image: Size,
    viewport: Size,
) -> Result<DisplayTransform, FaceAwareError> {
    if image.is_empty() || viewport.is_empty() {
        return Err(FaceAwareError::ZeroDimensions);
    }
    let union = BoundingUnion::from_faces(faces).ok_or(FaceAwareError::NoFaces)?;
    let (center_x, center_y) = union.center();

    let transform = if image.aspect() > viewport.aspect() {
        let scale = viewport.height / image.height;
        let scaled_width = image.width * scale;
        let offset_x = clamp_offset(
            center_x * scale - viewport.width * 0.5,
            scaled_width - viewport.width,
        );
        DisplayTransform {
            offset_x: -offset_x,
            offset_y: 0.0,
            scaled_width,
            scaled_height: viewport.height,
        }
    } else {
        let scale = viewport.width / image.width;
        let scaled_height = image.height * scale;
        let offset_y = clamp_offset(
            center_y * scale - viewport.height * (1.0 - VERTICAL_BIAS),
            scaled_height - viewport.height,
        );
        DisplayTransform {
            offset_x: 0.0,
            offset_y: -offset_y,
            scaled_width: viewport.width,
            scaled_height,
        }
    };

    log::debug!(
        "framed {} face(s): union {:?} -> {:?}",
        faces.len(),
        union.rect(),
        transform
    );
    Ok(transform)
}

/// Plain aspect-fill placement with the image centered in the viewport.
pub fn centered(image: Size, viewport: Size) -> Result<DisplayTransform, FaceAwareError> {
    let whole = FaceBox::new(0.0, 0.0, image.width, image.height);
    if image.is_empty() || viewport.is_empty() {
        return Err(FaceAwareError::ZeroDimensions);
    }
    if image.aspect() > viewport.aspect() {
        compute(&[whole], image, viewport)
    } else {
        // Vertical scrolling is biased upward, so center explicitly.
        let scale = viewport.width / image.width;
        let scaled_height = image.height * scale;
        Ok(DisplayTransform {
            offset_x: 0.0,
            offset_y: -(scaled_height - viewport.height) / 2.0,
            scaled_width: viewport.width,
            scaled_height,
        })
    }
}

fn clamp_offset(offset: f64, max: f64) -> f64 {
    offset.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn bottom_left_bounds_are_flipped() {
        let bounds = FaceBounds {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            confidence: 1.0,
        };
        let face = FaceBox::from_bounds(&bounds, CoordinateOrigin::BottomLeft, 100.0);
        assert_eq!(face, FaceBox::new(10.0, 40.0, 30.0, 40.0));

        let face = FaceBox::from_bounds(&bounds, CoordinateOrigin::TopLeft, 100.0);
        assert_eq!(face, FaceBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn union_of_single_face_is_that_face() {
        let face = FaceBox::new(5.0, 6.0, 7.0, 8.0);
        let union = BoundingUnion::from_faces(&[face]).unwrap();
        assert_eq!(union.rect(), face);
        assert_eq!(union.center(), (8.5, 10.0));
    }

    #[test]
    fn union_spans_all_faces() {
        let faces = [
            FaceBox::new(10.0, 50.0, 20.0, 20.0),
            FaceBox::new(100.0, 10.0, 30.0, 30.0),
            FaceBox::new(40.0, 80.0, 10.0, 40.0),
        ];
        let union = BoundingUnion::from_faces(&faces).unwrap();
        assert_eq!(union.rect(), FaceBox::new(10.0, 10.0, 120.0, 110.0));
    }

    #[test]
    fn union_of_nothing_is_none() {
        assert!(BoundingUnion::from_faces(&[]).is_none());
    }

    #[test]
    fn no_faces_is_an_error() {
        let result = compute(&[], Size::new(100.0, 100.0), Size::new(50.0, 50.0));
        assert!(matches!(result, Err(FaceAwareError::NoFaces)));
    }

    #[test]
    fn zero_viewport_is_an_error() {
        let face = FaceBox::new(0.0, 0.0, 10.0, 10.0);
        let result = compute(&[face], Size::new(100.0, 100.0), Size::new(0.0, 50.0));
        assert!(matches!(result, Err(FaceAwareError::ZeroDimensions)));
    }

    #[test]
    fn face_filling_image_gives_zero_offset() {
        let face = FaceBox::new(0.0, 0.0, 1000.0, 1000.0);
        let t = compute(&[face], Size::new(1000.0, 1000.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_x, 0.0);
        assert_close(t.offset_y, 0.0);
        assert_close(t.scaled_width, 100.0);
        assert_close(t.scaled_height, 100.0);
    }

    #[test]
    fn wide_image_centers_union_horizontally() {
        // 400x100 into 100x100: scale 1, face center at x=300.
        let face = FaceBox::new(280.0, 30.0, 40.0, 40.0);
        let t = compute(&[face], Size::new(400.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.scaled_width, 400.0);
        assert_close(t.scaled_height, 100.0);
        assert_close(t.offset_x, -250.0);
        assert_close(t.offset_y, 0.0);
    }

    #[test]
    fn wide_image_clamps_to_edges() {
        let left = FaceBox::new(0.0, 30.0, 10.0, 10.0);
        let t = compute(&[left], Size::new(400.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_x, 0.0);

        let right = FaceBox::new(390.0, 30.0, 10.0, 10.0);
        let t = compute(&[right], Size::new(400.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_x, -300.0);
    }

    #[test]
    fn tall_image_places_union_above_center() {
        // 1000x3000 into 100x100: scale 0.1, face center at 150 scaled.
        let face = FaceBox::new(400.0, 1400.0, 200.0, 200.0);
        let viewport = Size::new(100.0, 100.0);
        let t = compute(&[face], Size::new(1000.0, 3000.0), viewport).unwrap();
        assert_close(t.scaled_width, 100.0);
        assert_close(t.scaled_height, 300.0);
        assert_close(t.offset_y, -(150.0 - 100.0 * (1.0 - VERTICAL_BIAS)));
        // union center sits at 38.2% of the viewport height
        let center_in_viewport = 150.0 + t.offset_y;
        assert_close(center_in_viewport / viewport.height, 1.0 - VERTICAL_BIAS);
    }

    #[test]
    fn tall_image_clamps_to_bottom() {
        let face = FaceBox::new(400.0, 2900.0, 100.0, 100.0);
        let t = compute(&[face], Size::new(1000.0, 3000.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_y, -200.0);
        assert!(t.offset_y + t.scaled_height >= 100.0);
    }

    #[test]
    fn upper_cluster_pulls_window_up() {
        let faces = [
            FaceBox::new(100.0, 100.0, 100.0, 100.0),
            FaceBox::new(350.0, 250.0, 120.0, 150.0),
        ];
        let image = Size::new(600.0, 1800.0);
        let viewport = Size::new(300.0, 300.0);
        let t = compute(&faces, image, viewport).unwrap();

        let centered_offset = -(t.scaled_height - viewport.height) / 2.0;
        assert!(t.offset_y > centered_offset);

        let visible = t.visible_region(image, viewport);
        let union = BoundingUnion::from_faces(&faces).unwrap().rect();
        assert!(visible.y <= union.y);
        assert!(visible.bottom() >= union.bottom());
    }

    #[test]
    fn centered_splits_slack_evenly() {
        let t = centered(Size::new(100.0, 300.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_y, -100.0);
        let t = centered(Size::new(300.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        assert_close(t.offset_x, -100.0);
    }

    #[test]
    fn visible_region_maps_back_to_source_pixels() {
        let t = DisplayTransform {
            offset_x: -25.0,
            offset_y: 0.0,
            scaled_width: 200.0,
            scaled_height: 50.0,
        };
        let region = t.visible_region(Size::new(400.0, 100.0), Size::new(50.0, 50.0));
        assert_eq!(region, FaceBox::new(50.0, 0.0, 100.0, 100.0));
    }

    fn face_strategy() -> impl Strategy<Value = FaceBox> {
        (0.0..900.0f64, 0.0..900.0f64, 1.0..100.0f64, 1.0..100.0f64)
            .prop_map(|(x, y, w, h)| FaceBox::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn union_ignores_face_order(mut faces in prop::collection::vec(face_strategy(), 1..12)) {
            let forward = BoundingUnion::from_faces(&faces).unwrap();
            faces.reverse();
            let reversed = BoundingUnion::from_faces(&faces).unwrap();
            let mid = faces.len() / 2;
            faces.rotate_left(mid);
            let rotated = BoundingUnion::from_faces(&faces).unwrap();
            prop_assert_eq!(forward, reversed);
            prop_assert_eq!(forward, rotated);
        }

        #[test]
        fn viewport_stays_inside_scaled_image(
            faces in prop::collection::vec(face_strategy(), 1..6),
            vw in 10.0..500.0f64,
            vh in 10.0..500.0f64,
        ) {
            let t = compute(&faces, Size::new(1000.0, 1000.0), Size::new(vw, vh)).unwrap();
            prop_assert!(t.offset_x <= 0.0 && t.offset_y <= 0.0);
            prop_assert!(t.offset_x + t.scaled_width >= vw - 1e-9);
            prop_assert!(t.offset_y + t.scaled_height >= vh - 1e-9);
        }
    }
}
