use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::geometry::FaceBox;

/// Stroke color of the debug outline.
pub const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Stroke width of the debug outline, in pixels.
pub const OUTLINE_WIDTH: u32 = 3;

/// Copy `image` and stroke a red outline just inside each face box.
pub fn draw_face_outlines(image: &DynamicImage, faces: &[FaceBox]) -> DynamicImage {
    let mut canvas: RgbaImage = image.to_rgba8();
    for face in faces {
        stroke_face(&mut canvas, face);
    }
    DynamicImage::ImageRgba8(canvas)
}

fn stroke_face(canvas: &mut RgbaImage, face: &FaceBox) {
    // Edges pushed more than a stroke past the canvas stay off it, which keeps
    // every coordinate small enough for `Rect` arithmetic.
    let margin = OUTLINE_WIDTH as i64;
    let (left, right) = span(face.x, face.width, canvas.width(), margin);
    let (top, bottom) = span(face.y, face.height, canvas.height(), margin);

    for inset in 0..margin {
        let (w, h) = (right - left - 2 * inset, bottom - top - 2 * inset);
        if w <= 0 || h <= 0 {
            break;
        }
        let rect =
            Rect::at((left + inset) as i32, (top + inset) as i32).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, OUTLINE_COLOR);
    }
}

/// Start and exclusive end of a face edge pair, clamped to `margin` pixels
/// outside `0..extent`.
fn span(start: f64, length: f64, extent: u32, margin: i64) -> (i64, i64) {
    let start = start.round();
    let end = start + length.round().max(0.0);
    let clamp = |v: f64| (v as i64).clamp(-margin, extent as i64 + margin);
    (clamp(start), clamp(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gray_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, image::Rgb([128, 128, 128])))
    }

    #[test]
    fn outline_is_three_pixels_wide() {
        let face = FaceBox::new(10.0, 10.0, 20.0, 20.0);
        let outlined = draw_face_outlines(&gray_image(), &[face]).to_rgba8();

        for inset in 0..3 {
            assert_eq!(outlined.get_pixel(10 + inset, 20), &OUTLINE_COLOR);
            assert_eq!(outlined.get_pixel(29 - inset, 20), &OUTLINE_COLOR);
        }
        assert_eq!(outlined.get_pixel(13, 20), &Rgba([128, 128, 128, 255]));
        assert_eq!(outlined.get_pixel(9, 20), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn source_image_is_untouched() {
        let image = gray_image();
        let _ = draw_face_outlines(&image, &[FaceBox::new(0.0, 0.0, 5.0, 5.0)]);
        assert_eq!(image.to_rgba8().get_pixel(0, 0), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn degenerate_and_offscreen_faces_are_ignored_safely() {
        let faces = [
            FaceBox::new(5.0, 5.0, 0.0, 10.0),
            FaceBox::new(-20.0, -20.0, 10.0, 10.0),
            FaceBox::new(35.0, 35.0, 30.0, 30.0),
        ];
        let outlined = draw_face_outlines(&gray_image(), &faces);
        assert_eq!((outlined.width(), outlined.height()), (40, 40));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let faces = [
            FaceBox::new(f64::MAX, f64::MAX, 10.0, 10.0),
            FaceBox::new(i32::MAX as f64 - 1.0, 0.0, 10.0, 10.0),
            FaceBox::new(f64::MIN, f64::MIN, f64::MAX, f64::MAX),
        ];
        let outlined = draw_face_outlines(&gray_image(), &faces).to_rgba8();
        assert_eq!(outlined.get_pixel(39, 0), &Rgba([128, 128, 128, 255]));
        assert_eq!(outlined.get_pixel(20, 20), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn partly_offscreen_face_keeps_visible_edges() {
        let face = FaceBox::new(-100.0, 10.0, 120.0, 10.0);
        let outlined = draw_face_outlines(&gray_image(), &[face]).to_rgba8();
        // Right edge at x = 19, left edge far off the canvas
        assert_eq!(outlined.get_pixel(19, 15), &OUTLINE_COLOR);
        assert_eq!(outlined.get_pixel(0, 15), &Rgba([128, 128, 128, 255]));
        // Top edge crosses the canvas
        assert_eq!(outlined.get_pixel(0, 10), &OUTLINE_COLOR);
    }
}
