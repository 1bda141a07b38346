use crate::shapes::rect::Rect;
use anyhow::{Error, Result};
use image::DynamicImage;
use serde::Deserialize;

pub mod recorded;

/// Expression signals for one detected face.
///
/// A `None` probability means the detector was not confident enough to
/// report it. It is never treated as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaceSignal {
    pub bounding_box: Rect,
    #[serde(default)]
    pub left_eye_open_probability: Option<f32>,
    #[serde(default)]
    pub right_eye_open_probability: Option<f32>,
    #[serde(default)]
    pub smiling_probability: Option<f32>,
}

impl FaceSignal {
    pub fn new(
        bounding_box: Rect,
        smiling: Option<f32>,
        left_eye_open: Option<f32>,
        right_eye_open: Option<f32>,
    ) -> Self {
        Self {
            bounding_box,
            left_eye_open_probability: left_eye_open,
            right_eye_open_probability: right_eye_open,
            smiling_probability: smiling,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bounding_box.w == 0 || self.bounding_box.h == 0 {
            return Err(Error::msg(format!(
                "Face bounding box must have a positive size, got {:?}",
                self.bounding_box
            )));
        }
        if !self.bounding_box.edges_fit_i32() {
            return Err(Error::msg(format!(
                "Face bounding box {:?} extends past the coordinate range",
                self.bounding_box
            )));
        }

        for (name, p) in [
            ("left_eye_open_probability", self.left_eye_open_probability),
            ("right_eye_open_probability", self.right_eye_open_probability),
            ("smiling_probability", self.smiling_probability),
        ] {
            if let Some(p) = p {
                if !(0. ..=1.).contains(&p) {
                    return Err(Error::msg(format!("{name} must be within [0, 1], got {p}")));
                }
            }
        }

        Ok(())
    }
}

/// Source of face signals for an image.
///
/// Zero faces is a successful detection. Errors are reserved for the
/// detector itself failing.
pub trait Detector {
    fn detect(&self, img: &DynamicImage) -> Result<Vec<FaceSignal>>;
}
