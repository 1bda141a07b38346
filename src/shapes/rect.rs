use super::point::PointF32;
use serde::Deserialize;

/// Axis-aligned face bounds in image pixel coordinates.
///
/// Detectors may report faces that hang over the image edge, so the
/// top-left corner is signed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct Rect {
    // top-left corner
    #[serde(rename = "left")]
    pub x: i32,
    #[serde(rename = "top")]
    pub y: i32,
    #[serde(rename = "width")]
    pub w: u32,
    #[serde(rename = "height")]
    pub h: u32,
}

impl From<Rect> for imageproc::rect::Rect {
    fn from(r: Rect) -> imageproc::rect::Rect {
        imageproc::rect::Rect::at(r.x, r.y).of_size(r.w.max(1), r.h.max(1))
    }
}

impl Rect {
    pub fn from_tl(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> i64 {
        self.x as i64
    }
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }
    pub fn top(&self) -> i64 {
        self.y as i64
    }
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    pub fn center(&self) -> PointF32 {
        PointF32 {
            x: self.x as f32 + self.w as f32 / 2.,
            y: self.y as f32 + self.h as f32 / 2.,
        }
    }

    /// True when the right and bottom edges are representable as `i32`.
    pub fn edges_fit_i32(&self) -> bool {
        i32::try_from(self.right()).is_ok() && i32::try_from(self.bottom()).is_ok()
    }

    /// True when any part of the rect lands on a `width` x `height` canvas.
    pub fn intersects_canvas(&self, width: u32, height: u32) -> bool {
        self.right() > 0
            && self.bottom() > 0
            && self.left() < width as i64
            && self.top() < height as i64
    }
}
