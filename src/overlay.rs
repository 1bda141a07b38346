use crate::assets::{AssetLookup, EmojiAsset};
use crate::classify::{Classification, classify};
use crate::detection::FaceSignal;
use anyhow::{Error, Result};
use image::{ColorType, DynamicImage, Rgba, RgbaImage, imageops};
use placement::DrawRect;
use tracing::{Level, debug, span, trace, warn};

pub mod outline;
pub mod placement;

// Larger targets are sampled over their visible region instead of resized whole.
const MAX_TARGET_TO_CANVAS: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No faces were supplied. The image is returned unmodified.
    NoFaceDetected,
    Composed { drawn: usize, fallbacks: usize },
}

/// One emoji drawn onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the face in the input sequence.
    pub face: usize,
    pub classification: Classification,
    pub draw: DrawRect,
}

#[derive(Debug, Clone)]
pub struct Composition<I = RgbaImage> {
    pub image: I,
    pub outcome: Outcome,
    pub placements: Vec<Placement>,
}

impl<I> Composition<I> {
    pub fn is_no_face_detected(&self) -> bool {
        self.outcome == Outcome::NoFaceDetected
    }

    fn map_image<J>(self, f: impl FnOnce(I) -> J) -> Composition<J> {
        Composition {
            image: f(self.image),
            outcome: self.outcome,
            placements: self.placements,
        }
    }
}

/// Draws emoji over every face of a photo.
///
/// Each call to [`Compositor::compose`] works on its own copy of the base
/// image, so one compositor can be shared across threads.
pub struct Compositor<'a, L: AssetLookup> {
    assets: &'a L,
    fallback: &'a EmojiAsset,
    scale: f32,
    trace: bool,
}

impl<'a, L: AssetLookup> Compositor<'a, L> {
    pub fn new(assets: &'a L, fallback: &'a EmojiAsset) -> Self {
        Self {
            assets,
            fallback,
            scale: 1.,
            trace: false,
        }
    }

    /// Multiplier applied to face bounds when sizing the emoji.
    pub fn with_scale(mut self, scale: f32) -> Result<Self> {
        if !scale.is_finite() || scale <= 0. {
            return Err(Error::msg(format!("Scale must be a positive number, got {scale}")));
        }

        self.scale = scale;
        Ok(self)
    }

    /// Outline each face's bounding box after drawing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn compose(&self, base: &RgbaImage, faces: &[FaceSignal]) -> Composition {
        let span = span!(Level::DEBUG, "compose", faces = faces.len());
        let _guard = span.enter();

        let mut canvas = base.clone();
        if faces.is_empty() {
            warn!("No face detected");
            return Composition {
                image: canvas,
                outcome: Outcome::NoFaceDetected,
                placements: Vec::new(),
            };
        }

        let (width, height) = canvas.dimensions();
        let canvas_area = width as u64 * height as u64;
        let mut placements = Vec::with_capacity(faces.len());
        let mut fallbacks = 0;
        for (idx, face) in faces.iter().enumerate() {
            let classification = classify(face);
            trace!("Face #{idx}: {classification:?}");

            let draw = placement::draw_rect(&face.bounding_box, self.scale);
            if draw.is_empty() {
                warn!("Skipping face #{idx}, emoji would be drawn at {draw:?}");
                continue;
            }
            let Some(visible) = draw.clip_to(width, height) else {
                warn!("Skipping face #{idx}, emoji at {draw:?} is off the canvas");
                continue;
            };

            let asset = match classification {
                Classification::Category(c) => self.assets.lookup(c),
                Classification::InsufficientData => {
                    debug!("Face #{idx} is missing expression signals, using fallback");
                    fallbacks += 1;
                    self.fallback
                }
            };

            if draw.area() <= canvas_area * MAX_TARGET_TO_CANVAS {
                let emoji = asset.scaled_to(draw.w, draw.h);
                imageops::overlay(&mut canvas, &emoji, draw.x, draw.y);
            } else {
                debug!("Face #{idx} target {draw:?} dwarfs the canvas, sampling {visible:?}");
                let emoji = sample_visible(asset, &draw, &visible);
                imageops::overlay(&mut canvas, &emoji, visible.x, visible.y);
            }
            debug!("Drew face #{idx} at {draw:?}");

            placements.push(Placement {
                face: idx,
                classification,
                draw,
            });
        }

        if self.trace {
            outline::draw_face_bounds(&mut canvas, faces);
        }

        Composition {
            image: canvas,
            outcome: Outcome::Composed {
                drawn: placements.len(),
                fallbacks,
            },
            placements,
        }
    }

    /// Composes any decoded image, returning it in the input's color type.
    ///
    /// Drawing happens in 8-bit RGBA.
    pub fn compose_dynamic(
        &self,
        base: &DynamicImage,
        faces: &[FaceSignal],
    ) -> Composition<DynamicImage> {
        if faces.is_empty() {
            warn!("No face detected");
            return Composition {
                image: base.clone(),
                outcome: Outcome::NoFaceDetected,
                placements: Vec::new(),
            };
        }

        let color = base.color();
        self.compose(&base.to_rgba8(), faces)
            .map_image(|img| into_color(img, color))
    }
}

/// Resamples only the part of `target` covered by `visible`.
fn sample_visible(asset: &EmojiAsset, target: &DrawRect, visible: &DrawRect) -> RgbaImage {
    let dx = (visible.x - target.x) as f32;
    let dy = (visible.y - target.y) as f32;

    RgbaImage::from_fn(visible.w, visible.h, |x, y| {
        let u = (dx + x as f32 + 0.5) / target.w as f32;
        let v = (dy + y as f32 + 0.5) / target.h as f32;
        imageops::sample_bilinear(asset.image(), u, v).unwrap_or(Rgba([0, 0, 0, 0]))
    })
}

fn into_color(img: RgbaImage, color: ColorType) -> DynamicImage {
    let img = DynamicImage::ImageRgba8(img);
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(img.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(img.to_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(img.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(img.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(img.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(img.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(img.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(img.to_rgba32f()),
        _ => img,
    }
}

/// Composes with a scale of 1 and no tracing.
pub fn compose(
    base: &RgbaImage,
    faces: &[FaceSignal],
    assets: &impl AssetLookup,
    fallback: &EmojiAsset,
) -> Composition {
    Compositor::new(assets, fallback).compose(base, faces)
}
