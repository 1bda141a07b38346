use crate::shapes::rect::Rect;

/// Where a scaled emoji lands on the canvas. May extend past any edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl DrawRect {
    pub fn right(&self) -> i64 {
        self.x + self.w as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h as i64
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The part of the rect that lands on a `width` x `height` canvas.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<DrawRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = self.right().min(width as i64);
        let bottom = self.bottom().min(height as i64);

        if left >= right || top >= bottom {
            return None;
        }

        Some(DrawRect {
            x: left,
            y: top,
            w: (right - left) as u32,
            h: (bottom - top) as u32,
        })
    }
}

/// Sizes the emoji to the face bounds times `scale`, centered on the face.
pub fn draw_rect(face: &Rect, scale: f32) -> DrawRect {
    let w = (face.w as f32 * scale).round() as u32;
    let h = (face.h as f32 * scale).round() as u32;
    let center = face.center();

    DrawRect {
        x: (center.x - w as f32 / 2.).round() as i64,
        y: (center.y - h as f32 / 2.).round() as i64,
        w,
        h,
    }
}
