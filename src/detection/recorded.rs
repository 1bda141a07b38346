use super::{Detector, FaceSignal};
use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Replays face signals captured from an external face detector.
///
/// Recordings are JSON:
///
/// ```json
/// {"faces": [{"bounding_box": {"left": 75, "top": 75, "width": 50, "height": 50},
///             "smiling_probability": 0.9,
///             "left_eye_open_probability": 0.8,
///             "right_eye_open_probability": null}]}
/// ```
///
/// Probabilities that are `null` or missing are absent.
#[derive(Debug, Clone)]
pub struct RecordedDetector {
    faces: Vec<FaceSignal>,
}

#[derive(Debug, Deserialize)]
struct Recording {
    faces: Vec<FaceSignal>,
}

impl RecordedDetector {
    pub fn new(faces: Vec<FaceSignal>) -> Result<Self> {
        for (idx, face) in faces.iter().enumerate() {
            face.validate().with_context(|| format!("Invalid face #{idx}"))?;
        }

        Ok(Self { faces })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let recording: Recording = serde_json::from_str(json)?;
        Self::new(recording.faces)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read face recording {path:?}"))?;
        let detector = Self::from_json(&json)
            .with_context(|| format!("Failed to parse face recording {path:?}"))?;
        debug!("Loaded {} recorded faces from {path:?}", detector.faces.len());

        Ok(detector)
    }
}

impl Detector for RecordedDetector {
    fn detect(&self, img: &DynamicImage) -> Result<Vec<FaceSignal>> {
        let (width, height) = img.dimensions();
        for face in self.faces.iter() {
            if !face.bounding_box.intersects_canvas(width, height) {
                warn!(
                    "Recorded face {:?} lies outside the {width}x{height} image",
                    face.bounding_box
                );
            }
        }

        Ok(self.faces.clone())
    }
}
