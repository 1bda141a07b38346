use crate::classify::{Classification, classify};
use crate::detection::FaceSignal;
use image::{Rgba, RgbaImage};
use imageproc::drawing;

const CLASSIFIED: Rgba<u8> = Rgba([0, 255, 0, 255]);
const INSUFFICIENT: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Outlines every face: green when classified, red when it fell back.
pub fn draw_face_bounds(img: &mut RgbaImage, faces: &[FaceSignal]) {
    for face in faces.iter().filter(|f| f.bounding_box.edges_fit_i32()) {
        let color = match classify(face) {
            Classification::Category(_) => CLASSIFIED,
            Classification::InsufficientData => INSUFFICIENT,
        };
        drawing::draw_hollow_rect_mut(img, face.bounding_box.into(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::rect::Rect;

    #[test]
    fn test_outline_colors() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        let faces = [
            FaceSignal::new(Rect::from_tl(2, 2, 10, 10), Some(0.9), Some(0.9), Some(0.9)),
            FaceSignal::new(Rect::from_tl(20, 20, 10, 10), Some(0.9), None, Some(0.9)),
        ];

        draw_face_bounds(&mut img, &faces);

        assert_eq!(*img.get_pixel(2, 2), CLASSIFIED);
        assert_eq!(*img.get_pixel(11, 2), CLASSIFIED);
        assert_eq!(*img.get_pixel(20, 29), INSUFFICIENT);
        // interiors untouched
        assert_eq!(*img.get_pixel(6, 6), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(25, 25), Rgba([0, 0, 0, 255]));
    }
}
