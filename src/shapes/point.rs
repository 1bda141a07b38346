#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointF32 {
    pub x: f32,
    pub y: f32,
}

impl PointF32 {
    pub fn new(x: f32, y: f32) -> PointF32 {
        PointF32 { x, y }
    }
}
