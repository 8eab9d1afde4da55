use image::DynamicImage;

use crate::geometry::{DisplayTransform, FaceBox, Size};

/// Crop region within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge (pixels).
    pub x: u32,
    /// Top edge (pixels).
    pub y: u32,
    /// Width (pixels).
    pub width: u32,
    /// Height (pixels).
    pub height: u32,
}

/// Calculate the pixel region that matches `viewport`'s aspect ratio.
///
/// The crop is anchored on `focus` (normally the face union) or, without
/// one, on the center of the window described by `transform`. The image is
/// first cut down to a square on its shorter side around the anchor, and the
/// square is then trimmed to the viewport aspect around the same anchor.
/// Both cuts are clamped to the image, so a focus that fits inside the final
/// region is always kept whole.
pub fn aspect_crop_region(
    source_width: u32,
    source_height: u32,
    transform: &DisplayTransform,
    viewport: Size,
    focus: Option<&FaceBox>,
) -> Option<CropRegion> {
    if source_width == 0 || source_height == 0 || viewport.is_empty() {
        return None;
    }

    let (anchor_x, anchor_y) = match focus {
        Some(focus) => (focus.x + focus.width / 2.0, focus.y + focus.height / 2.0),
        None => {
            let window =
                transform.visible_region(Size::of_pixels(source_width, source_height), viewport);
            (window.x + window.width / 2.0, window.y + window.height / 2.0)
        }
    };

    // Square on the shorter side
    let side = source_width.min(source_height);
    let square_x = clamp_to(anchor_x - side as f64 / 2.0, 0, source_width - side);
    let square_y = clamp_to(anchor_y - side as f64 / 2.0, 0, source_height - side);

    let aspect = viewport.aspect();
    let region = if aspect >= 1.0 {
        // Landscape: keep the full width, trim the height
        let height = ((side as f64 / aspect).round() as u32).clamp(1, side);
        let y = clamp_to(anchor_y - height as f64 / 2.0, square_y, square_y + side - height);
        CropRegion {
            x: square_x,
            y,
            width: side,
            height,
        }
    } else {
        // Portrait: keep the full height, trim the width
        let width = ((side as f64 * aspect).round() as u32).clamp(1, side);
        let x = clamp_to(anchor_x - width as f64 / 2.0, square_x, square_x + side - width);
        CropRegion {
            x,
            y: square_y,
            width,
            height: side,
        }
    };
    Some(region)
}

/// Crop `image` to the viewport aspect ratio around `focus`, or around the
/// window described by `transform` when there is none. Returns `None` for an
/// empty image or viewport.
pub fn aspect_crop(
    image: &DynamicImage,
    transform: &DisplayTransform,
    viewport: Size,
    focus: Option<&FaceBox>,
) -> Option<DynamicImage> {
    let CropRegion {
        x,
        y,
        width,
        height,
    } = aspect_crop_region(image.width(), image.height(), transform, viewport, focus)?;
    Some(image.crop_imm(x, y, width, height))
}

fn clamp_to(value: f64, low: u32, high: u32) -> u32 {
    value.round().max(low as f64).min(high as f64) as u32
}
